//! Small value types shared by the sequencer, the session and media backends.

use std::time::Duration;

use crate::config::RepeatSetting;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Advance to the next queue entry when a track ends.
    #[default]
    Off,
    /// Restart the current track when it ends.
    One,
}

impl RepeatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
        }
    }

    /// Parse a stored repeat mode; the page writes `off` / `one`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "off" | "none" => Some(Self::Off),
            "one" | "repeat-one" => Some(Self::One),
            _ => None,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(setting: RepeatSetting) -> Self {
        match setting {
            RepeatSetting::Off => Self::Off,
            RepeatSetting::RepeatOne => Self::One,
        }
    }
}

/// Why the session is in the error state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    /// The media backend could not load the current source. The session skips
    /// forward after the configured delay.
    TrackLoad(String),
    /// The backend refused to start playback. Waits for another user gesture.
    PlaybackStart(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Error(ErrorReason),
}

impl PlaybackState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Error(ErrorReason::TrackLoad(_)) => "Track failed, skipping",
            Self::Error(ErrorReason::PlaybackStart(_)) => "Press play to start",
        }
    }
}

/// Notifications a media backend reports back to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The current source can start playing.
    Ready { duration: Option<Duration> },
    /// The current source played to its end.
    Ended,
    /// The current source failed to load or decode.
    Error(String),
}

/// What the session asks the media backend to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    /// Remote URL the published page streams from.
    pub url: String,
    /// Bare file name, for backends that resolve a local copy.
    pub filename: String,
}
