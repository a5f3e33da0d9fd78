use std::collections::VecDeque;
use std::time::Duration;

use super::{MediaBackend, MediaEvent, MediaSource, PlaybackStartError};

/// Scripted media backend: records what the session asks of it.
#[derive(Default)]
pub(crate) struct FakeMedia {
    pub loaded: Vec<MediaSource>,
    pub events: VecDeque<MediaEvent>,
    pub playing: bool,
    pub refuse_play: bool,
    pub volume: f32,
    pub seeks: Vec<Duration>,
    pub position: Duration,
}

impl MediaBackend for FakeMedia {
    fn load(&mut self, source: &MediaSource) {
        self.loaded.push(source.clone());
        self.events.clear();
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn play(&mut self) -> Result<(), PlaybackStartError> {
        if self.refuse_play {
            return Err(PlaybackStartError::Refused("autoplay blocked".into()));
        }
        if self.loaded.is_empty() {
            return Err(PlaybackStartError::NoSource);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) {
        self.seeks.push(position);
        self.position = position;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.events.pop_front()
    }
}
