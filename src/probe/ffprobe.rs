use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::config::ProbeSettings;

use super::{CoverArt, MediaProbe, ProbeError, ProbeOutput, clean_tag};

/// Reads tags through `ffprobe` and the cover through `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe: PathBuf,
    ffmpeg: PathBuf,
    covers: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    /// Key case depends on the container (`title` in ID3, `TITLE` in Vorbis).
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

impl FfprobeFormat {
    fn tag(&self, key: &str) -> Option<String> {
        self.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| clean_tag(v))
    }
}

/// Title and artist from `ffprobe -print_format json -show_format` output.
pub(crate) fn parse_format_tags(json: &str) -> Result<ProbeOutput, ProbeError> {
    let out: FfprobeOutput = serde_json::from_str(json)?;
    let format = out.format.unwrap_or_default();
    Ok(ProbeOutput {
        title: format.tag("title"),
        artist: format.tag("artist"),
        cover: None,
    })
}

impl FfprobeProbe {
    pub fn new(ffprobe: impl Into<PathBuf>, ffmpeg: impl Into<PathBuf>, covers: bool) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            ffmpeg: ffmpeg.into(),
            covers,
        }
    }

    pub fn from_settings(settings: &ProbeSettings) -> Self {
        Self::new(
            &settings.ffprobe_path,
            &settings.ffmpeg_path,
            settings.embed_covers,
        )
    }

    /// Whether `ffprobe -version` runs successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffprobe)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn read_tags(&self, path: &Path) -> Result<ProbeOutput, ProbeError> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: self.ffprobe.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Exit {
                program: self.ffprobe.display().to_string(),
                status: output.status.to_string(),
            });
        }

        parse_format_tags(&String::from_utf8_lossy(&output.stdout))
    }

    /// Copy the attached picture stream to stdout. Files without one make
    /// ffmpeg fail or print nothing; both mean "no cover".
    fn read_cover(&self, path: &Path) -> Option<CoverArt> {
        let output = Command::new(&self.ffmpeg)
            .args(["-v", "quiet", "-i"])
            .arg(path)
            .args(["-an", "-c:v", "copy", "-f", "image2pipe", "-"])
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() && !out.stdout.is_empty() => {
                Some(CoverArt::from_bytes(out.stdout))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), "ffmpeg not runnable for cover: {e}");
                None
            }
        }
    }
}

impl MediaProbe for FfprobeProbe {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError> {
        let mut out = self.read_tags(path)?;
        if self.covers {
            out.cover = self.read_cover(path);
        }
        Ok(out)
    }
}
