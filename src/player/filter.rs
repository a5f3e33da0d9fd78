//! Radio-variant artist filter. At least one artist always stays enabled so
//! the derived queue can never be empty.

use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct ArtistFilter {
    /// Every distinct artist, in catalog order.
    artists: Vec<String>,
    enabled: BTreeSet<String>,
}

impl ArtistFilter {
    /// All `artists` enabled.
    pub fn new(artists: Vec<String>) -> Self {
        let enabled = artists.iter().cloned().collect();
        Self { artists, enabled }
    }

    /// Re-apply a saved selection. Unknown names are dropped; if nothing
    /// survives, every artist is enabled.
    pub fn restore(artists: Vec<String>, saved: Option<Vec<String>>) -> Self {
        let mut filter = Self::new(artists);
        if let Some(saved) = saved {
            let kept: BTreeSet<String> = saved
                .into_iter()
                .filter(|a| filter.artists.contains(a))
                .collect();
            if !kept.is_empty() {
                filter.enabled = kept;
            }
        }
        filter
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn enabled(&self) -> &BTreeSet<String> {
        &self.enabled
    }

    pub fn is_enabled(&self, artist: &str) -> bool {
        self.enabled.contains(artist)
    }

    /// Flip one artist. Disabling the last enabled artist is refused.
    /// Returns whether the selection changed.
    pub fn toggle(&mut self, artist: &str) -> bool {
        if !self.artists.iter().any(|a| a == artist) {
            return false;
        }
        if self.enabled.contains(artist) {
            if self.enabled.len() <= 1 {
                tracing::debug!(artist, "refusing to disable the last enabled artist");
                return false;
            }
            self.enabled.remove(artist);
        } else {
            self.enabled.insert(artist.to_string());
        }
        true
    }

    pub fn select_all(&mut self) -> bool {
        let all: BTreeSet<String> = self.artists.iter().cloned().collect();
        if all == self.enabled {
            return false;
        }
        self.enabled = all;
        true
    }

    /// Narrow to the first artist in catalog order.
    pub fn select_none(&mut self) -> bool {
        let Some(first) = self.artists.first() else {
            return false;
        };
        if self.enabled.len() == 1 && self.enabled.contains(first) {
            return false;
        }
        self.enabled = BTreeSet::from([first.clone()]);
        true
    }
}
