use serde::{Deserialize, Serialize};

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/sitecast/config.toml` or `~/.config/sitecast/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (applied by the runtime for a single invocation)
/// 2) Environment variables (prefix `SITECAST__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub site: SiteSettings,
    pub library: LibrarySettings,
    pub probe: ProbeSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteVariant {
    /// Plain player over the whole catalog.
    #[default]
    Standard,
    /// Artist-filtered player that reshuffles when the queue runs out.
    #[serde(alias = "radio-mode")]
    Radio,
}

impl SiteVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Radio => "radio",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Page title shown in the header and `<title>`.
    pub title: String,
    pub variant: SiteVariant,
    /// Base URL the browser streams raw audio from; the percent-encoded
    /// filename is appended after a `/`.
    ///
    /// Example: `https://raw.githubusercontent.com/user/music/main/songs`
    pub audio_base_url: String,
    /// Prefix for durable preference keys. Empty = derive from the variant
    /// (`sitecast` or `sitecast-radio`).
    pub storage_namespace: String,
    /// Name of the metadata record file inside the site directory.
    pub data_file: String,
    /// Name of the track-count file inside the site directory.
    pub count_file: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "sitecast".to_string(),
            variant: SiteVariant::Standard,
            audio_base_url: "songs".to_string(),
            storage_namespace: String::new(),
            data_file: "data.txt".to_string(),
            count_file: "count.txt".to_string(),
        }
    }
}

impl SiteSettings {
    /// Namespace used for preference keys, falling back to one per variant.
    pub fn namespace(&self) -> String {
        let ns = self.storage_namespace.trim();
        if !ns.is_empty() {
            return ns.to_string();
        }
        match self.variant {
            SiteVariant::Standard => "sitecast".to_string(),
            SiteVariant::Radio => "sitecast-radio".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeBackend {
    /// Use ffprobe when it can be executed, otherwise read tags in-process.
    #[default]
    Auto,
    Ffprobe,
    #[serde(alias = "lofty")]
    Tags,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub backend: ProbeBackend,
    pub ffprobe_path: String,
    /// Used to pull embedded cover art out of the file.
    pub ffmpeg_path: String,
    /// Artist written when a file carries no artist tag.
    pub placeholder_artist: String,
    /// Embed cover images as data URIs; `false` writes `none` for every track.
    pub embed_covers: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            backend: ProbeBackend::Auto,
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            placeholder_artist: "Unknown Artist".to_string(),
            embed_covers: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled when no preference is stored.
    pub shuffle: bool,
    /// Default repeat mode when no preference is stored.
    pub repeat: RepeatSetting,
    /// Default volume (0.0 - 1.0) when no preference is stored.
    pub volume: f32,
    /// Delay before skipping past a track that failed to load (milliseconds).
    pub error_skip_delay_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatSetting::Off,
            volume: 1.0,
            error_skip_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatSetting {
    #[serde(alias = "none", alias = "no-repeat")]
    Off,
    #[serde(
        alias = "repeatone",
        alias = "repeat_one",
        alias = "one",
        alias = "loop-one"
    )]
    RepeatOne,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Percentage of the track to scrub when pressing `H` / `L`.
    pub seek_step_percent: u8,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_percent: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box of the preview.
    pub header_text: String,
    /// Whether the cursor starts in "follow playback" mode.
    pub follow_playback: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ now streaming ~ ".to_string(),
            follow_playback: true,
        }
    }
}
