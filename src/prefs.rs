//! Typed access to the player's durable preferences.
//!
//! Every key lives under a per-site namespace (`<namespace>.<key>`), the same
//! layout the generated page uses for `localStorage`.

mod store;

pub use store::{JsonFileStore, MemoryStore, PrefStore, StoreError};

use crate::player::RepeatMode;

pub const VOLUME: &str = "volume";
pub const DARK_MODE: &str = "darkMode";
pub const ENABLED_ARTISTS: &str = "enabledArtists";
pub const SHUFFLE: &str = "shuffle";
pub const REPEAT_MODE: &str = "repeatMode";
pub const FILTER_PANEL_VISIBLE: &str = "filterPanelVisible";

/// Settings repository handed to the session.
///
/// Reads return `None` for missing or unparsable values so callers fall back
/// to configured defaults. Write failures are logged and swallowed.
#[derive(Debug)]
pub struct Preferences<S: PrefStore> {
    store: S,
    namespace: String,
}

impl<S: PrefStore> Preferences<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn key(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    fn read(&self, name: &str) -> Option<String> {
        self.store.get(&self.key(name))
    }

    fn write(&mut self, name: &str, value: &str) {
        let key = self.key(name);
        if let Err(e) = self.store.set(&key, value) {
            tracing::warn!(key, "failed to persist preference: {e}");
        }
    }

    fn read_bool(&self, name: &str) -> Option<bool> {
        match self.read(name)?.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn volume(&self) -> Option<f32> {
        self.read(VOLUME)?
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.write(VOLUME, &volume.to_string());
    }

    pub fn dark_mode(&self) -> Option<bool> {
        self.read_bool(DARK_MODE)
    }

    pub fn set_dark_mode(&mut self, on: bool) {
        self.write(DARK_MODE, if on { "true" } else { "false" });
    }

    pub fn enabled_artists(&self) -> Option<Vec<String>> {
        serde_json::from_str(&self.read(ENABLED_ARTISTS)?).ok()
    }

    pub fn set_enabled_artists<'a>(&mut self, artists: impl IntoIterator<Item = &'a String>) {
        let list: Vec<&String> = artists.into_iter().collect();
        match serde_json::to_string(&list) {
            Ok(json) => self.write(ENABLED_ARTISTS, &json),
            Err(e) => tracing::warn!("failed to encode enabled artists: {e}"),
        }
    }

    pub fn shuffle(&self) -> Option<bool> {
        self.read_bool(SHUFFLE)
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.write(SHUFFLE, if on { "true" } else { "false" });
    }

    pub fn repeat_mode(&self) -> Option<RepeatMode> {
        RepeatMode::parse(&self.read(REPEAT_MODE)?)
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.write(REPEAT_MODE, mode.as_str());
    }

    pub fn filter_panel_visible(&self) -> Option<bool> {
        self.read_bool(FILTER_PANEL_VISIBLE)
    }

    pub fn set_filter_panel_visible(&mut self, visible: bool) {
        self.write(FILTER_PANEL_VISIBLE, if visible { "true" } else { "false" });
    }
}
