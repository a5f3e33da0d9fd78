use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

use super::types::{MediaEvent, MediaSource};

/// Characters left as-is in a URL path segment: the set `encodeURIComponent`
/// keeps, so the page and the preview build the same URL.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackStartError {
    #[error("no media source is loaded")]
    NoSource,
    #[error("playback was refused: {0}")]
    Refused(String),
}

/// The single media resource a session plays through.
///
/// Loading is asynchronous from the session's point of view: `load` only
/// replaces the source, and the outcome arrives later as a [`MediaEvent`]
/// from `poll_event`. Loading a new source discards the previous one along
/// with any of its pending events.
pub trait MediaBackend {
    fn load(&mut self, source: &MediaSource);
    fn play(&mut self) -> Result<(), PlaybackStartError>;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn duration(&self) -> Option<Duration>;
    fn position(&self) -> Duration;
    fn poll_event(&mut self) -> Option<MediaEvent>;
}

/// Build the streaming URL for `filename` under `base_url`.
pub fn track_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(filename, PATH_SEGMENT)
    )
}

pub fn media_source(base_url: &str, filename: &str) -> MediaSource {
    MediaSource {
        url: track_url(base_url, filename),
        filename: filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_url_encodes_the_filename_segment() {
        assert_eq!(
            track_url("https://raw.example.org/u/r/main/songs/", "My Song #1.mp3"),
            "https://raw.example.org/u/r/main/songs/My%20Song%20%231.mp3"
        );
        assert_eq!(track_url("songs", "a-b_c.~.ogg"), "songs/a-b_c.~.ogg");
        assert_eq!(track_url("songs", "é.mp3"), "songs/%C3%A9.mp3");
    }

    #[test]
    fn track_url_leaves_the_page_unreserved_marks_alone() {
        assert_eq!(
            track_url("songs", "it's (live)!*.mp3"),
            "songs/it's%20(live)!*.mp3"
        );
        assert_eq!(track_url("songs//", "a+b&c;d.mp3"), "songs/a%2Bb%26c%3Bd.mp3");
    }
}
