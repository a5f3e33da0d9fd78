use std::path::Path;

use anyhow::{Result, bail};

use crate::config::Settings;
use crate::site::{load_site_catalog, read_site_settings};

/// Load a generated site the way the page does and summarize it.
pub fn run(site_dir: &Path, base: &Settings) -> Result<()> {
    let settings = read_site_settings(site_dir, base);
    let catalog = match load_site_catalog(site_dir, &settings.site) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(site = %site_dir.display(), "{e}");
            bail!("{}", e.user_message());
        }
    };

    let artists = catalog.artists();
    let covers = catalog
        .tracks()
        .iter()
        .filter(|t| t.cover_image.is_some())
        .count();
    tracing::info!(
        tracks = catalog.len(),
        artists = artists.len(),
        covers,
        "catalog loaded"
    );
    println!(
        "{}: {} tracks by {} artists ({} with cover art), {} variant",
        site_dir.display(),
        catalog.len(),
        artists.len(),
        covers,
        settings.site.variant.as_str()
    );
    Ok(())
}
