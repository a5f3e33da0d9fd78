//! Local `rodio` output for the preview player.
//!
//! [`RodioMedia`] plays files from a music directory by the same file names
//! the published site streams. It is polled: decode outcomes and end of track
//! are queued as [`MediaEvent`]s and handed out by `poll_event`.

mod sink;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::player::{MediaBackend, MediaEvent, MediaSource, PlaybackStartError};

pub use sink::OpenError;
use sink::create_sink_at;

pub struct RodioMedia {
    stream: OutputStream,
    root: PathBuf,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    duration: Option<Duration>,
    /// Where the current sink started in the file (non-zero after a seek).
    offset: Duration,
    volume: f32,
    playing: bool,
    events: VecDeque<MediaEvent>,
}

impl RodioMedia {
    /// Open the default output device and serve files from `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, rodio::StreamError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio prints to stderr when the stream drops, which garbles the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            root: root.into(),
            sink: None,
            path: None,
            duration: None,
            offset: Duration::ZERO,
            volume: 1.0,
            playing: false,
            events: VecDeque::new(),
        })
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.playing = false;
    }

    /// Fade the current track out over `fade` and stop it.
    pub fn fade_out(&mut self, fade: Duration) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if self.playing && !fade.is_zero() {
            let steps: u32 = 20;
            let step = (fade / steps).max(Duration::from_millis(1));
            for n in 1..=steps {
                let t = n as f32 / steps as f32;
                sink.set_volume(self.volume * (1.0 - t));
                thread::sleep(step);
            }
        }
        self.drop_sink();
    }
}

/// Map a streamed file name back onto the music directory.
pub(crate) fn resolve(root: &Path, filename: &str) -> Option<PathBuf> {
    let rel = Path::new(filename);
    // The site serves a flat directory; refuse anything that walks out of it.
    if rel.components().count() != 1 || rel.is_absolute() {
        return None;
    }
    Some(root.join(rel))
}

impl MediaBackend for RodioMedia {
    fn load(&mut self, source: &MediaSource) {
        self.drop_sink();
        self.events.clear();
        self.duration = None;
        self.offset = Duration::ZERO;

        let Some(path) = resolve(&self.root, &source.filename) else {
            self.path = None;
            self.events.push_back(MediaEvent::Error(format!(
                "{} is not a plain file name",
                source.filename
            )));
            return;
        };

        match create_sink_at(&self.stream, &path, Duration::ZERO) {
            Ok((sink, total)) => {
                sink.set_volume(self.volume);
                self.sink = Some(sink);
                self.duration = total;
                self.events.push_back(MediaEvent::Ready { duration: total });
            }
            Err(e) => self.events.push_back(MediaEvent::Error(e.to_string())),
        }
        self.path = Some(path);
    }

    fn play(&mut self) -> Result<(), PlaybackStartError> {
        let Some(sink) = self.sink.as_ref() else {
            return Err(PlaybackStartError::NoSource);
        };
        sink.play();
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        if self.sink.is_none() {
            return;
        }
        // Rebuild the sink and skip into the file.
        match create_sink_at(&self.stream, &path, position) {
            Ok((sink, _)) => {
                if let Some(old) = self.sink.replace(sink) {
                    old.stop();
                }
                self.offset = position;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(self.volume);
                    if self.playing {
                        s.play();
                    }
                }
            }
            Err(e) => tracing::warn!("seek failed: {e}"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.offset + s.get_pos())
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        if self.playing && self.sink.as_ref().is_some_and(Sink::empty) {
            self.playing = false;
            self.events.push_back(MediaEvent::Ended);
        }
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests;
