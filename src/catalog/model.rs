use std::collections::{BTreeSet, HashSet};

/// One published track. Identity is its position in the [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub filename: String,
    pub title: String,
    pub artist: String,
    /// `data:` URI of the embedded cover, if the file had one.
    pub cover_image: Option<String>,
}

/// The tracks known to a session, in publication order.
///
/// Built once from the fetched metadata and never mutated; play orders are
/// derived from it as vectors of indices.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Distinct artist names in order of first appearance.
    pub fn artists(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.tracks
            .iter()
            .filter(|t| seen.insert(t.artist.as_str()))
            .map(|t| t.artist.clone())
            .collect()
    }

    /// Catalog indices whose artist is in `enabled`, ascending.
    pub fn indices_for_artists(&self, enabled: &BTreeSet<String>) -> Vec<usize> {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| enabled.contains(&t.artist))
            .map(|(i, _)| i)
            .collect()
    }

    /// All catalog indices, ascending.
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.tracks.len()).collect()
    }
}
