use crate::config;

/// Load settings, falling back to defaults when the file or environment is
/// unusable. Config is optional and never stops a command.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                tracing::warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            tracing::warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
