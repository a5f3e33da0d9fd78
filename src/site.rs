//! Static site generation: the metadata resources plus the player page.

mod render;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, DirFetcher, load_catalog};
use crate::config::{Settings, SiteSettings};
use crate::probe::TrackRecord;

pub use render::{PageConfig, apply_embedded_config, render_index};

const PLAYER_JS: &str = include_str!("../assets/player.js");
const PLAYER_CSS: &str = include_str!("../assets/player.css");

pub const INDEX_FILE: &str = "index.html";
pub const SCRIPT_FILE: &str = "player.js";
pub const STYLE_FILE: &str = "player.css";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode page configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// What [`write_site`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub tracks: usize,
    pub files: Vec<PathBuf>,
}

/// The data resource: one record per line, newline terminated.
pub fn render_data(records: &[TrackRecord]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(&r.record_line());
        out.push('\n');
    }
    out
}

fn write_file(path: PathBuf, contents: &str, files: &mut Vec<PathBuf>) -> Result<(), SiteError> {
    fs::write(&path, contents).map_err(|source| SiteError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote");
    files.push(path);
    Ok(())
}

/// Write the catalog resources and page assets into `out_dir`, creating it
/// if needed. Existing files with the same names are replaced.
pub fn write_site(
    out_dir: &Path,
    records: &[TrackRecord],
    settings: &Settings,
) -> Result<SiteSummary, SiteError> {
    fs::create_dir_all(out_dir).map_err(|source| SiteError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let site = &settings.site;
    let page = PageConfig::from_settings(settings);
    let mut files = Vec::new();

    // Data before count; readers fetch the count first.
    write_file(
        out_dir.join(&site.data_file),
        &render_data(records),
        &mut files,
    )?;
    write_file(
        out_dir.join(&site.count_file),
        &format!("{}\n", records.len()),
        &mut files,
    )?;
    write_file(out_dir.join(INDEX_FILE), &render_index(&page)?, &mut files)?;
    write_file(out_dir.join(SCRIPT_FILE), PLAYER_JS, &mut files)?;
    write_file(out_dir.join(STYLE_FILE), PLAYER_CSS, &mut files)?;

    tracing::info!(
        dir = %out_dir.display(),
        tracks = records.len(),
        variant = site.variant.as_str(),
        "site written"
    );

    Ok(SiteSummary {
        tracks: records.len(),
        files,
    })
}

/// Settings for an already generated site: `base` overlaid with the
/// configuration embedded in its `index.html`, when there is one.
pub fn read_site_settings(dir: &Path, base: &Settings) -> Settings {
    let mut settings = base.clone();
    let index = dir.join(INDEX_FILE);
    match fs::read_to_string(&index) {
        Ok(html) => match apply_embedded_config(&html, &mut settings) {
            Ok(true) => tracing::debug!(page = %index.display(), "using embedded page config"),
            Ok(false) => tracing::debug!(page = %index.display(), "page has no config block"),
            Err(e) => tracing::warn!(page = %index.display(), "ignoring unreadable page config: {e}"),
        },
        Err(e) => tracing::debug!(page = %index.display(), "no page to read config from: {e}"),
    }
    settings
}

/// Load a generated site back through the catalog loader, the way the page
/// does on startup.
pub fn load_site_catalog(dir: &Path, site: &SiteSettings) -> Result<Catalog, CatalogError> {
    let fetcher = DirFetcher::new(dir);
    load_catalog(&fetcher, &site.count_file, &site.data_file)
}

#[cfg(test)]
mod tests;
