use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::Catalog;
use super::record::parse_records;

#[derive(Debug, Error)]
#[error("could not fetch {resource}: {reason}")]
pub struct FetchError {
    pub resource: String,
    pub reason: String,
}

/// Source of the count and data resources (a site directory, a test fixture).
pub trait ResourceFetcher {
    fn fetch_text(&self, resource: &str) -> Result<String, FetchError>;
}

/// Reads resources from a generated site directory.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceFetcher for DirFetcher {
    fn fetch_text(&self, resource: &str) -> Result<String, FetchError> {
        let path = self.root.join(resource);
        fs::read_to_string(&path).map_err(|e| FetchError {
            resource: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The count or data resource could not be fetched, or the count is not a number.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("no valid tracks in catalog data (count reported {reported})")]
    NoValidTracks { reported: usize },
}

impl CatalogError {
    /// Short message for the error panel.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable(_) => "Could not load the track list. Try again later.",
            Self::EmptyCatalog => "No tracks have been published yet.",
            Self::NoValidTracks { .. } => "The track list could not be read.",
        }
    }
}

/// Parse the count resource: ASCII digits only, surrounding whitespace
/// allowed. Signs are rejected the same way the page rejects them.
pub fn parse_count(text: &str) -> Option<usize> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Fetch the count, then the data, and build the catalog.
pub fn load_catalog(
    fetcher: &dyn ResourceFetcher,
    count_resource: &str,
    data_resource: &str,
) -> Result<Catalog, CatalogError> {
    let count_text = fetcher
        .fetch_text(count_resource)
        .map_err(|e| CatalogError::CatalogUnavailable(e.to_string()))?;
    let reported = parse_count(&count_text).ok_or_else(|| {
        CatalogError::CatalogUnavailable(format!(
            "{count_resource} is not a number: {:?}",
            count_text.trim()
        ))
    })?;
    if reported == 0 {
        return Err(CatalogError::EmptyCatalog);
    }

    let data = fetcher
        .fetch_text(data_resource)
        .map_err(|e| CatalogError::CatalogUnavailable(e.to_string()))?;

    let tracks = parse_records(&data);
    if tracks.is_empty() {
        return Err(CatalogError::NoValidTracks { reported });
    }
    if tracks.len() != reported {
        tracing::info!(
            reported,
            parsed = tracks.len(),
            "track count differs from parsed records"
        );
    }

    Ok(Catalog::new(tracks))
}
