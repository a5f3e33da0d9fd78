use std::collections::HashSet;

use crate::catalog::record::format_record;
use crate::config::ProbeSettings;
use crate::library::SourceFile;

use super::{CoverArt, MediaProbe};

/// One catalog entry as written by the build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub filename: String,
    pub title: String,
    pub artist: String,
    pub cover: Option<CoverArt>,
}

impl TrackRecord {
    /// The `(filename=title=artist=imagedata)` line for this track.
    pub fn record_line(&self) -> String {
        let cover = self.cover.as_ref().map(CoverArt::data_uri);
        format_record(&self.filename, &self.title, &self.artist, cover.as_deref())
    }
}

/// Probe one file and fill in whatever the probe could not provide.
///
/// Returns `None` only when the file name cannot be written into a record.
pub fn extract(
    file: &SourceFile,
    probe: &dyn MediaProbe,
    settings: &ProbeSettings,
) -> Option<TrackRecord> {
    if !file.is_record_safe() {
        tracing::warn!(
            file = %file.path.display(),
            "skipping file: name contains '=', ')' or a line break"
        );
        return None;
    }

    let found = match probe.probe(&file.path) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(
                file = %file.path.display(),
                probe = probe.name(),
                "metadata probe failed, using file name: {e}"
            );
            Default::default()
        }
    };

    Some(TrackRecord {
        filename: file.file_name.clone(),
        title: found.title.unwrap_or_else(|| file.stem().to_string()),
        artist: found
            .artist
            .unwrap_or_else(|| settings.placeholder_artist.clone()),
        cover: if settings.embed_covers {
            found.cover
        } else {
            None
        },
    })
}

/// Extract every file in order. The site streams by bare file name, so a
/// name seen twice (from different subdirectories) keeps its first file.
pub fn extract_all(
    files: &[SourceFile],
    probe: &dyn MediaProbe,
    settings: &ProbeSettings,
) -> Vec<TrackRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(files.len());

    for file in files {
        if !seen.insert(file.file_name.as_str()) {
            tracing::warn!(
                file = %file.path.display(),
                "skipping duplicate file name"
            );
            continue;
        }
        if let Some(record) = extract(file, probe, settings) {
            tracing::debug!(file = %record.filename, title = %record.title, "extracted");
            records.push(record);
        }
    }

    tracing::info!(
        tracks = records.len(),
        scanned = files.len(),
        probe = probe.name(),
        "metadata extracted"
    );
    records
}
