//! Metadata extraction for the build step.
//!
//! A [`MediaProbe`] reads title, artist and cover art from one audio file.
//! [`extract`] applies the filename and placeholder fallbacks on top of it and
//! yields a [`TrackRecord`] ready to be written as a catalog line.

mod extract;
mod ffprobe;
mod tags;

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::config::{ProbeBackend, ProbeSettings};

pub use extract::{TrackRecord, extract, extract_all};
pub use ffprobe::FfprobeProbe;
pub use tags::TagProbe;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Exit { program: String, status: String },
    #[error("unreadable ffprobe output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tag read failed: {0}")]
    Tags(#[from] lofty::error::LoftyError),
}

/// Embedded cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl CoverArt {
    /// Wrap raw image bytes, guessing the MIME type from the magic number.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime = sniff_image_mime(&bytes).to_string();
        Self { mime, bytes }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// MIME type for common image signatures; JPEG when unknown.
pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"BM") {
        "image/bmp"
    } else {
        "image/jpeg"
    }
}

/// What a probe found. Absent fields are filled in by [`extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutput {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub cover: Option<CoverArt>,
}

pub trait MediaProbe {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;
    fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError>;
}

/// Pick the backend named in `settings`. `auto` prefers ffprobe when the
/// binary runs and falls back to the in-process tag reader.
pub fn select_probe(settings: &ProbeSettings) -> Box<dyn MediaProbe> {
    match settings.backend {
        ProbeBackend::Ffprobe => Box::new(FfprobeProbe::from_settings(settings)),
        ProbeBackend::Tags => Box::new(TagProbe::new(settings.embed_covers)),
        ProbeBackend::Auto => {
            let ff = FfprobeProbe::from_settings(settings);
            if ff.is_available() {
                Box::new(ff)
            } else {
                tracing::info!(
                    ffprobe = %settings.ffprobe_path,
                    "ffprobe not runnable; reading tags in-process"
                );
                Box::new(TagProbe::new(settings.embed_covers))
            }
        }
    }
}

/// Trimmed, non-empty tag value.
pub(crate) fn clean_tag(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}
