use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_sitecast_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SITECAST_CONFIG_PATH", "/tmp/sitecast-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/sitecast-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("sitecast")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("sitecast")
            .join("config.toml")
    );
}

#[test]
fn default_state_dir_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/sitecast")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[site]
title = "Late Night Radio"
variant = "radio"
audio_base_url = "https://raw.example.org/me/music/main/songs"
data_file = "tracks.txt"

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false

[probe]
backend = "lofty"
placeholder_artist = "Anonymous"
embed_covers = false

[playback]
shuffle = true
repeat = "repeat_one"
volume = 0.4
error_skip_delay_ms = 250

[controls]
seek_step_percent = 10

[ui]
follow_playback = false
header_text = "hello"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SITECAST_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SITECAST__PLAYBACK__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.site.title, "Late Night Radio");
    assert_eq!(s.site.variant, SiteVariant::Radio);
    assert_eq!(s.site.data_file, "tracks.txt");
    assert_eq!(s.site.count_file, "count.txt");
    assert_eq!(s.site.namespace(), "sitecast-radio");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.probe.backend, ProbeBackend::Tags);
    assert_eq!(s.probe.placeholder_artist, "Anonymous");
    assert!(!s.probe.embed_covers);
    assert!(s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::RepeatOne);
    assert!((s.playback.volume - 0.4).abs() < f32::EPSILON);
    assert_eq!(s.playback.error_skip_delay_ms, 250);
    assert_eq!(s.controls.seek_step_percent, 10);
    assert!(!s.ui.follow_playback);
    assert_eq!(s.ui.header_text, "hello");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
error_skip_delay_ms = 1000
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SITECAST_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SITECAST__PLAYBACK__ERROR_SKIP_DELAY_MS", "5");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.error_skip_delay_ms, 5);
}

#[test]
fn validate_rejects_out_of_range_volume_and_empty_base_url() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.volume = 1.5;
    assert!(s.validate().is_err());

    s.playback.volume = 0.5;
    s.site.audio_base_url = "   ".to_string();
    assert!(s.validate().is_err());
}

#[test]
fn explicit_storage_namespace_wins_over_variant_default() {
    let mut site = SiteSettings::default();
    assert_eq!(site.namespace(), "sitecast");
    site.storage_namespace = " my-site ".to_string();
    assert_eq!(site.namespace(), "my-site");
}

#[test]
fn effective_settings_render_as_toml() {
    let text = Settings::default().to_toml().unwrap();
    assert!(text.contains("[site]"));
    assert!(text.contains("variant = \"standard\""));
    assert!(text.contains("repeat = \"off\""));
}
