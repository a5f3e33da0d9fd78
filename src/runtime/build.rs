use anyhow::{Context, Result, bail};

use crate::cli::BuildArgs;
use crate::config::Settings;
use crate::library::scan;
use crate::probe::{extract_all, select_probe};
use crate::site::write_site;

/// Scan, probe and write the site.
pub fn run(args: &BuildArgs, mut settings: Settings) -> Result<()> {
    args.apply(&mut settings);
    if let Err(msg) = settings.validate() {
        bail!("invalid build settings: {msg}");
    }
    if !args.music.is_dir() {
        bail!("music directory {} does not exist", args.music.display());
    }

    let files = scan(&args.music, &settings.library);
    if files.is_empty() {
        tracing::warn!(dir = %args.music.display(), "no audio files found; the site will report an empty catalog");
    }

    let probe = select_probe(&settings.probe);
    let records = extract_all(&files, probe.as_ref(), &settings.probe);

    let summary = write_site(&args.output, &records, &settings)
        .with_context(|| format!("cannot write site to {}", args.output.display()))?;

    println!(
        "{} tracks -> {} ({} variant, audio from {})",
        summary.tracks,
        args.output.display(),
        settings.site.variant.as_str(),
        settings.site.audio_base_url
    );
    Ok(())
}
