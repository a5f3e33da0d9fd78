//! `App` wraps a [`Session`] with what only the terminal needs: a list cursor,
//! the follow-playback flag, the artist panel and dark mode.

use crate::config::Settings;
use crate::player::{MediaBackend, Session};
use crate::prefs::PrefStore;

/// Which list receives cursor keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tracks,
    Artists,
}

pub struct App<M: MediaBackend, S: PrefStore> {
    pub session: Session<M, S>,
    /// Catalog index under the track cursor.
    pub selected: usize,
    pub follow_playback: bool,
    pub artist_panel: bool,
    pub artist_cursor: usize,
    pub focus: Focus,
    pub dark_mode: bool,
    pub info_window: bool,
    pub header_text: String,
    pub site_label: Option<String>,
    seek_step: f64,
    volume_step: f32,
}

impl<M: MediaBackend, S: PrefStore> App<M, S> {
    pub fn new(session: Session<M, S>, settings: &Settings) -> Self {
        let dark_mode = session.prefs().dark_mode().unwrap_or(false);
        let artist_panel =
            session.is_radio() && session.prefs().filter_panel_visible().unwrap_or(false);
        let selected = session.current_track().map_or(0, |(i, _)| i);

        Self {
            session,
            selected,
            follow_playback: settings.ui.follow_playback,
            artist_panel,
            artist_cursor: 0,
            focus: Focus::Tracks,
            dark_mode,
            info_window: false,
            header_text: settings.ui.header_text.clone(),
            site_label: None,
            seek_step: f64::from(settings.controls.seek_step_percent) / 100.0,
            volume_step: settings.controls.volume_step,
        }
    }

    /// Catalog indices shown in the track list: everything, or in the radio
    /// variant only tracks by enabled artists.
    pub fn visible_indices(&self) -> Vec<usize> {
        let catalog = self.session.catalog();
        match self.session.filter() {
            Some(f) => catalog.indices_for_artists(f.enabled()),
            None => catalog.all_indices(),
        }
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
        self.sync_follow();
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the cursor onto the current track when following playback.
    pub fn sync_follow(&mut self) {
        if !self.follow_playback {
            return;
        }
        if let Some((idx, _)) = self.session.current_track() {
            self.selected = idx;
        }
    }

    /// Keep the cursor on a visible track after the list changed.
    pub fn ensure_selected_visible(&mut self) {
        let visible = self.visible_indices();
        if !visible.contains(&self.selected) {
            self.selected = visible.first().copied().unwrap_or(0);
        }
    }

    pub fn cursor_down(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(p) => visible[(p + 1) % visible.len()],
            None => visible[0],
        };
    }

    pub fn cursor_up(&mut self) {
        let visible = self.visible_indices();
        let Some(&last) = visible.last() else {
            return;
        };
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(0) | None => last,
            Some(p) => visible[p - 1],
        };
    }

    pub fn cursor_top(&mut self) {
        if let Some(&first) = self.visible_indices().first() {
            self.selected = first;
        }
    }

    pub fn cursor_bottom(&mut self) {
        if let Some(&last) = self.visible_indices().last() {
            self.selected = last;
        }
    }

    pub fn play_selected(&mut self) {
        if self.session.play_catalog_index(self.selected) {
            self.follow_playback = true;
        }
    }

    pub fn toggle_play(&mut self) {
        self.session.toggle_play();
    }

    pub fn next(&mut self) {
        self.session.next();
        self.sync_follow();
    }

    pub fn previous(&mut self) {
        self.session.previous();
        self.sync_follow();
    }

    pub fn seek_forward(&mut self) {
        self.session.seek_by_fraction(self.seek_step);
    }

    pub fn seek_back(&mut self) {
        self.session.seek_by_fraction(-self.seek_step);
    }

    pub fn volume_up(&mut self) {
        let v = self.session.volume() + self.volume_step;
        self.session.set_volume(v);
    }

    pub fn volume_down(&mut self) {
        let v = self.session.volume() - self.volume_step;
        self.session.set_volume(v);
    }

    pub fn toggle_shuffle(&mut self) {
        if self.session.toggle_shuffle() {
            self.sync_follow();
        }
    }

    pub fn cycle_repeat(&mut self) {
        self.session.cycle_repeat();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.session.prefs_mut().set_dark_mode(self.dark_mode);
    }

    pub fn toggle_info_window(&mut self) {
        self.info_window = !self.info_window;
    }

    /// Show or hide the artist panel (radio only). Hiding it returns focus to
    /// the track list.
    pub fn toggle_artist_panel(&mut self) {
        if !self.session.is_radio() {
            return;
        }
        self.artist_panel = !self.artist_panel;
        self.session
            .prefs_mut()
            .set_filter_panel_visible(self.artist_panel);
        self.focus = if self.artist_panel {
            Focus::Artists
        } else {
            Focus::Tracks
        };
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tracks if self.artist_panel => Focus::Artists,
            _ => Focus::Tracks,
        };
    }

    fn artist_count(&self) -> usize {
        self.session.filter().map_or(0, |f| f.artists().len())
    }

    pub fn artist_cursor_down(&mut self) {
        let n = self.artist_count();
        if n > 0 {
            self.artist_cursor = (self.artist_cursor + 1) % n;
        }
    }

    pub fn artist_cursor_up(&mut self) {
        let n = self.artist_count();
        if n > 0 {
            self.artist_cursor = (self.artist_cursor + n - 1) % n;
        }
    }

    /// Artist name under the panel cursor.
    pub fn artist_at_cursor(&self) -> Option<&str> {
        self.session
            .filter()
            .and_then(|f| f.artists().get(self.artist_cursor))
            .map(String::as_str)
    }

    /// Toggle the artist under the cursor. Returns whether the filter changed.
    pub fn toggle_artist_at_cursor(&mut self) -> bool {
        let Some(artist) = self.artist_at_cursor().map(str::to_string) else {
            return false;
        };
        let changed = self.session.toggle_artist(&artist);
        self.after_filter_change(changed);
        changed
    }

    pub fn select_all_artists(&mut self) -> bool {
        let changed = self.session.select_all_artists();
        self.after_filter_change(changed);
        changed
    }

    pub fn select_no_artists(&mut self) -> bool {
        let changed = self.session.select_no_artists();
        self.after_filter_change(changed);
        changed
    }

    fn after_filter_change(&mut self, changed: bool) {
        if changed {
            self.ensure_selected_visible();
            self.sync_follow();
        }
    }
}
