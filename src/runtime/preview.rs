use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioMedia;
use crate::config::{Settings, default_state_dir};
use crate::player::{Session, SessionOptions};
use crate::prefs::{JsonFileStore, MemoryStore, PrefStore, Preferences};
use crate::site::{load_site_catalog, read_site_settings};

use super::event_loop::{self, EventLoopState};

const PREFS_FILE: &str = "prefs.json";
const QUIT_FADE: Duration = Duration::from_millis(300);

/// Where the preview reads audio from: `--music`, else the site's relative
/// audio base URL resolved under the site directory.
pub fn music_root(site_dir: &Path, music: Option<&Path>, audio_base_url: &str) -> Result<PathBuf> {
    if let Some(dir) = music {
        return Ok(dir.to_path_buf());
    }
    if audio_base_url.contains("://") {
        bail!("the site streams from {audio_base_url}; pass --music <DIR> to preview it locally");
    }
    Ok(site_dir.join(audio_base_url.trim_matches('/')))
}

pub fn run(site_dir: &Path, music: Option<&Path>, base: &Settings) -> Result<()> {
    let settings = read_site_settings(site_dir, base);
    let catalog = load_site_catalog(site_dir, &settings.site)
        .map_err(|e| anyhow!("{} ({e})", e.user_message()))
        .with_context(|| format!("cannot preview {}", site_dir.display()))?;

    let root = music_root(site_dir, music, &settings.site.audio_base_url)?;
    if !root.is_dir() {
        bail!("audio directory {} does not exist", root.display());
    }
    tracing::info!(
        site = %site_dir.display(),
        music = %root.display(),
        tracks = catalog.len(),
        variant = settings.site.variant.as_str(),
        "starting preview"
    );

    let media = RodioMedia::open(root.clone()).context("cannot open the audio output device")?;
    let namespace = settings.site.namespace();
    let options = SessionOptions::from_settings(&settings);

    match default_state_dir() {
        Some(dir) => {
            let store = JsonFileStore::open(dir.join(PREFS_FILE))
                .with_context(|| format!("cannot read preferences under {}", dir.display()))?;
            let session = Session::new(catalog, media, Preferences::new(store, namespace), options);
            run_session(session, site_dir, &settings)
        }
        None => {
            tracing::warn!("no state directory; preferences will not persist");
            let store = MemoryStore::default();
            let session = Session::new(catalog, media, Preferences::new(store, namespace), options);
            run_session(session, site_dir, &settings)
        }
    }
}

fn run_session<S: PrefStore>(
    session: Session<RodioMedia, S>,
    site_dir: &Path,
    settings: &Settings,
) -> Result<()> {
    let mut app = App::new(session, settings);
    app.site_label = Some(format!("{} ({})", settings.site.title, site_dir.display()));
    app.session.start();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, settings, &mut app, &mut state);

    app.session.media_mut().fade_out(QUIT_FADE);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result.context("terminal event loop failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_music_dir_wins() {
        let root = music_root(Path::new("public"), Some(Path::new("/srv/music")), "songs").unwrap();
        assert_eq!(root, PathBuf::from("/srv/music"));
    }

    #[test]
    fn relative_base_url_resolves_under_site() {
        let root = music_root(Path::new("public"), None, "songs/").unwrap();
        assert_eq!(root, PathBuf::from("public/songs"));
    }

    #[test]
    fn remote_base_url_needs_music_dir() {
        let err = music_root(Path::new("public"), None, "https://cdn.example/songs").unwrap_err();
        assert!(err.to_string().contains("--music"));
    }
}
