//! The playback session: one catalog, one play queue, one media resource.
//!
//! ```text
//! Idle -> Loading -> Ready -> Playing <-> Paused
//!            \__________________\__________/
//!                         v
//!                   Error(reason)
//! ```
//!
//! Everything runs on the caller's loop. Media outcomes arrive through
//! [`Session::pump`] (or [`Session::handle_media_event`]); the delayed skip
//! after a load failure fires from [`Session::tick`].

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::{Catalog, Track};
use crate::config::{Settings, SiteVariant};
use crate::prefs::{PrefStore, Preferences};

use super::filter::ArtistFilter;
use super::media::{MediaBackend, media_source};
use super::sequencer::{Sequencer, TrackEnd};
use super::types::{ErrorReason, MediaEvent, PlaybackState, RepeatMode};

/// Session defaults that apply when no preference has been stored yet.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub audio_base_url: String,
    /// Radio variant: artist filter enabled, queue always shuffled.
    pub radio: bool,
    pub error_skip_delay: Duration,
    pub default_volume: f32,
    pub default_shuffle: bool,
    pub default_repeat: RepeatMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            audio_base_url: "songs".to_string(),
            radio: false,
            error_skip_delay: Duration::from_secs(1),
            default_volume: 1.0,
            default_shuffle: false,
            default_repeat: RepeatMode::Off,
        }
    }
}

impl SessionOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let playback = &settings.playback;
        Self {
            audio_base_url: settings.site.audio_base_url.clone(),
            radio: settings.site.variant == SiteVariant::Radio,
            error_skip_delay: Duration::from_millis(playback.error_skip_delay_ms),
            default_volume: playback.volume,
            default_shuffle: playback.shuffle,
            default_repeat: playback.repeat.into(),
        }
    }
}

pub struct Session<M: MediaBackend, S: PrefStore> {
    catalog: Catalog,
    sequencer: Sequencer,
    filter: Option<ArtistFilter>,
    media: M,
    prefs: Preferences<S>,
    rng: StdRng,
    options: SessionOptions,

    state: PlaybackState,
    volume: f32,
    position: Duration,
    duration: Option<Duration>,

    user_interacted: bool,
    loads: u64,
    play_on_ready: bool,
    skip_at: Option<Instant>,
}

impl<M: MediaBackend, S: PrefStore> Session<M, S> {
    pub fn new(catalog: Catalog, media: M, prefs: Preferences<S>, options: SessionOptions) -> Self {
        Self::with_rng(catalog, media, prefs, options, StdRng::from_os_rng())
    }

    /// Like [`Session::new`] with a caller-provided random source.
    pub fn with_rng(
        catalog: Catalog,
        mut media: M,
        prefs: Preferences<S>,
        options: SessionOptions,
        mut rng: StdRng,
    ) -> Self {
        let volume = prefs
            .volume()
            .unwrap_or(options.default_volume)
            .clamp(0.0, 1.0);
        let repeat = prefs.repeat_mode().unwrap_or(options.default_repeat);

        let (filter, shuffle, eligible) = if options.radio {
            let filter = ArtistFilter::restore(catalog.artists(), prefs.enabled_artists());
            let eligible = catalog.indices_for_artists(filter.enabled());
            (Some(filter), true, eligible)
        } else {
            let shuffle = prefs.shuffle().unwrap_or(options.default_shuffle);
            (None, shuffle, catalog.all_indices())
        };

        let sequencer = Sequencer::new(eligible, shuffle, repeat, &mut rng);
        media.set_volume(volume);

        Self {
            catalog,
            sequencer,
            filter,
            media,
            prefs,
            rng,
            options,
            state: PlaybackState::Idle,
            volume,
            position: Duration::ZERO,
            duration: None,
            user_interacted: false,
            loads: 0,
            play_on_ready: false,
            skip_at: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn filter(&self) -> Option<&ArtistFilter> {
        self.filter.as_ref()
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn prefs(&self) -> &Preferences<S> {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut Preferences<S> {
        &mut self.prefs
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_radio(&self) -> bool {
        self.filter.is_some()
    }

    /// Catalog index and track at the current queue position.
    pub fn current_track(&self) -> Option<(usize, &Track)> {
        let idx = self.sequencer.current()?;
        self.catalog.get(idx).map(|t| (idx, t))
    }

    /// Load the first queued track. Playback starts once it is ready only if
    /// the user has interacted by then.
    pub fn start(&mut self) {
        if self.sequencer.is_empty() {
            tracing::warn!("play queue is empty; nothing to load");
            return;
        }
        self.load_current(false);
    }

    /// Point the media resource at the track at queue `position`.
    pub fn load_track(&mut self, position: usize, play: bool) {
        let Some(&idx) = self.sequencer.queue().get(position) else {
            return;
        };
        self.sequencer.jump_to(idx);
        self.load_current(play);
    }

    fn load_current(&mut self, play: bool) {
        let Some((idx, track)) = self.current_track() else {
            return;
        };
        let source = media_source(&self.options.audio_base_url, &track.filename);
        tracing::debug!(index = idx, url = %source.url, "loading track");

        self.media.load(&source);
        self.position = Duration::ZERO;
        self.duration = None;
        self.skip_at = None;
        self.loads += 1;
        self.play_on_ready = play;
        self.state = PlaybackState::Loading;
    }

    fn start_playback(&mut self) {
        match self.media.play() {
            Ok(()) => self.state = PlaybackState::Playing,
            Err(e) => {
                tracing::debug!("playback start refused: {e}");
                self.state = PlaybackState::Error(ErrorReason::PlaybackStart(e.to_string()));
            }
        }
    }

    /// Whether a track change should keep playing.
    fn playback_intended(&self) -> bool {
        match &self.state {
            PlaybackState::Playing => true,
            PlaybackState::Loading => self.play_on_ready,
            PlaybackState::Error(ErrorReason::TrackLoad(_)) => true,
            _ => false,
        }
    }

    pub fn handle_media_event(&mut self, event: MediaEvent, now: Instant) {
        match event {
            MediaEvent::Ready { duration } => {
                if self.state != PlaybackState::Loading {
                    return;
                }
                self.state = PlaybackState::Ready;
                self.duration = duration;
                let first_track = self.loads == 1;
                if self.play_on_ready || (first_track && self.user_interacted) {
                    self.play_on_ready = false;
                    self.start_playback();
                }
            }
            MediaEvent::Ended => {
                if self.state != PlaybackState::Playing {
                    return;
                }
                match self.sequencer.on_track_end(&mut self.rng) {
                    Some(TrackEnd::Restart(idx)) => {
                        tracing::debug!(index = idx, "repeating track");
                        self.load_current(true);
                    }
                    Some(TrackEnd::Advance(_)) => self.load_current(true),
                    None => self.state = PlaybackState::Idle,
                }
            }
            MediaEvent::Error(reason) => {
                if matches!(self.state, PlaybackState::Idle | PlaybackState::Error(_)) {
                    return;
                }
                let track = self
                    .current_track()
                    .map(|(_, t)| t.filename.clone())
                    .unwrap_or_default();
                tracing::warn!(track, "track failed to load: {reason}");
                self.state = PlaybackState::Error(ErrorReason::TrackLoad(reason));
                self.skip_at = Some(now + self.options.error_skip_delay);
            }
        }
    }

    /// Fire the pending skip once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        let Some(at) = self.skip_at else {
            return;
        };
        if now < at {
            return;
        }
        self.skip_at = None;
        if self.sequencer.next(&mut self.rng).is_some() {
            self.load_current(true);
        }
    }

    /// Drain media events, refresh the position and run timers.
    pub fn pump(&mut self, now: Instant) {
        while let Some(event) = self.media.poll_event() {
            self.handle_media_event(event, now);
        }
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            self.position = self.media.position();
        }
        self.tick(now);
    }

    pub fn toggle_play(&mut self) {
        self.user_interacted = true;
        match self.state {
            PlaybackState::Ready
            | PlaybackState::Paused
            | PlaybackState::Error(ErrorReason::PlaybackStart(_)) => self.start_playback(),
            PlaybackState::Playing => {
                self.media.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Loading => self.play_on_ready = !self.play_on_ready,
            PlaybackState::Idle => {
                if !self.sequencer.is_empty() {
                    self.load_current(true);
                }
            }
            PlaybackState::Error(ErrorReason::TrackLoad(_)) => {}
        }
    }

    pub fn next(&mut self) {
        self.user_interacted = true;
        if self.sequencer.next(&mut self.rng).is_some() {
            self.load_current(true);
        }
    }

    pub fn previous(&mut self) {
        self.user_interacted = true;
        if self.sequencer.previous().is_some() {
            self.load_current(true);
        }
    }

    /// Play a specific catalog entry, if it is part of the current queue.
    pub fn play_catalog_index(&mut self, catalog_index: usize) -> bool {
        self.user_interacted = true;
        let Some(position) = self.sequencer.queue().iter().position(|&i| i == catalog_index) else {
            return false;
        };
        self.load_track(position, true);
        true
    }

    /// Seek to `fraction` of the track. Ignored until the duration is known.
    pub fn seek(&mut self, fraction: f64) -> bool {
        let Some(duration) = self.duration else {
            return false;
        };
        if !fraction.is_finite() {
            return false;
        }
        let target = duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.media.seek(target);
        self.position = target;
        true
    }

    /// Relative seek; `delta` is a fraction of the track length.
    pub fn seek_by_fraction(&mut self, delta: f64) -> bool {
        let Some(duration) = self.duration else {
            return false;
        };
        if duration.is_zero() {
            return false;
        }
        let current = self.position.as_secs_f64() / duration.as_secs_f64();
        self.seek(current + delta)
    }

    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(self.volume);
        self.prefs.set_volume(self.volume);
    }

    /// Flip shuffle. The radio variant is always shuffled, so this is a
    /// no-op there. Returns whether the mode changed.
    pub fn toggle_shuffle(&mut self) -> bool {
        if self.is_radio() {
            return false;
        }
        let on = !self.sequencer.shuffle();
        self.sequencer.set_shuffle(on, &mut self.rng);
        self.prefs.set_shuffle(on);
        true
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.sequencer.set_repeat(mode);
        self.prefs.set_repeat_mode(mode);
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.sequencer.repeat().cycle();
        self.set_repeat(mode);
        mode
    }

    pub fn toggle_artist(&mut self, artist: &str) -> bool {
        let changed = self.filter.as_mut().is_some_and(|f| f.toggle(artist));
        if changed {
            self.apply_filter();
        }
        changed
    }

    pub fn select_all_artists(&mut self) -> bool {
        let changed = self.filter.as_mut().is_some_and(ArtistFilter::select_all);
        if changed {
            self.apply_filter();
        }
        changed
    }

    pub fn select_no_artists(&mut self) -> bool {
        let changed = self.filter.as_mut().is_some_and(ArtistFilter::select_none);
        if changed {
            self.apply_filter();
        }
        changed
    }

    fn apply_filter(&mut self) {
        let Some(filter) = self.filter.as_ref() else {
            return;
        };
        let eligible = self.catalog.indices_for_artists(filter.enabled());
        self.prefs.set_enabled_artists(filter.enabled());
        tracing::debug!(tracks = eligible.len(), "artist filter changed");

        let play = self.playback_intended();
        self.sequencer.rebuild(eligible, &mut self.rng);
        if self.state != PlaybackState::Idle {
            self.load_current(play);
        }
    }
}
