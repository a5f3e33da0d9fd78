use std::path::Path;

use lofty::picture::{Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;

use super::{CoverArt, MediaProbe, ProbeError, ProbeOutput, clean_tag, sniff_image_mime};

/// In-process tag reader, used when ffprobe is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct TagProbe {
    covers: bool,
}

impl TagProbe {
    pub fn new(covers: bool) -> Self {
        Self { covers }
    }
}

fn cover_from_picture(picture: &Picture) -> CoverArt {
    let bytes = picture.data().to_vec();
    let mime = picture
        .mime_type()
        .map(|m| m.as_str().to_string())
        .filter(|m| m.starts_with("image/"))
        .unwrap_or_else(|| sniff_image_mime(&bytes).to_string());
    CoverArt { mime, bytes }
}

impl MediaProbe for TagProbe {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError> {
        let tagged = Probe::open(path)?.read()?;

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            tracing::debug!(path = %path.display(), "no tags found");
            return Ok(ProbeOutput::default());
        };

        let cover = if self.covers {
            let pictures = tag.pictures();
            pictures
                .iter()
                .find(|p| p.pic_type() == PictureType::CoverFront)
                .or_else(|| pictures.first())
                .map(cover_from_picture)
        } else {
            None
        };

        Ok(ProbeOutput {
            title: tag.title().as_deref().and_then(clean_tag),
            artist: tag.artist().as_deref().and_then(clean_tag),
            cover,
        })
    }
}
