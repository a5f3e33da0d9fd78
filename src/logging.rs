//! `tracing` subscriber setup.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "sitecast.log";

/// Decoder crates log every odd frame; keep them quiet.
const QUIET: &str = "symphonia=error,symphonia_core=error,symphonia_bundle_mp3=error,lofty=error";

fn filter(debug: bool) -> EnvFilter {
    // RUST_LOG wins over --debug.
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if debug { "debug" } else { "info" };
        EnvFilter::new(format!("{level},{QUIET}"))
    })
}

/// Log file for the preview: under the state directory, else the system
/// temp directory.
pub fn preview_log_path(state_dir: Option<PathBuf>) -> PathBuf {
    state_dir.unwrap_or_else(std::env::temp_dir).join(LOG_FILE)
}

/// Compact logs on stderr, for the non-interactive commands.
pub fn init_stderr(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Append logs to `path` so the terminal UI stays clean. Falls back to no
/// logging when the file cannot be opened.
pub fn init_file(debug: bool, path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("sitecast: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_logs_under_state_dir() {
        let path = preview_log_path(Some(PathBuf::from("/var/lib/sitecast")));
        assert_eq!(path, PathBuf::from("/var/lib/sitecast/sitecast.log"));
    }

    #[test]
    fn preview_logs_to_temp_dir_without_state_dir() {
        let path = preview_log_path(None);
        assert_eq!(path, std::env::temp_dir().join("sitecast.log"));
    }
}
