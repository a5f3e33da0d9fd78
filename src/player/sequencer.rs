//! Play-order bookkeeping: which catalog index comes next or before.
//!
//! The queue holds catalog indices. In linear mode it is ascending; in
//! shuffle mode it is a uniform random permutation of the same indices.
//! Stepping past either end wraps around, and a shuffled queue gets a fresh
//! permutation each time it wraps forward.

use rand::Rng;
use rand::seq::SliceRandom;

use super::types::RepeatMode;

/// What to do when the current track finishes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackEnd {
    /// Play the same catalog index again from the start.
    Restart(usize),
    /// Move on to this catalog index.
    Advance(usize),
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    queue: Vec<usize>,
    pos: usize,
    shuffle: bool,
    repeat: RepeatMode,
}

impl Sequencer {
    pub fn new<R: Rng + ?Sized>(
        eligible: Vec<usize>,
        shuffle: bool,
        repeat: RepeatMode,
        rng: &mut R,
    ) -> Self {
        let mut seq = Self {
            queue: Vec::new(),
            pos: 0,
            shuffle,
            repeat,
        };
        seq.rebuild(eligible, rng);
        seq
    }

    pub fn queue(&self) -> &[usize] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Current position within the queue.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Catalog index at the current position.
    pub fn current(&self) -> Option<usize> {
        self.queue.get(self.pos).copied()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Replace the queue with `eligible` (ordered per the shuffle flag) and
    /// restart at position 0.
    pub fn rebuild<R: Rng + ?Sized>(&mut self, mut eligible: Vec<usize>, rng: &mut R) {
        if self.shuffle {
            eligible.shuffle(rng);
        } else {
            eligible.sort_unstable();
        }
        self.queue = eligible;
        self.pos = 0;
    }

    /// Switch ordering. Turning shuffle on draws a new permutation; either way
    /// the current track keeps playing at its position in the new order.
    pub fn set_shuffle<R: Rng + ?Sized>(&mut self, on: bool, rng: &mut R) {
        let current = self.current();
        self.shuffle = on;
        if on {
            self.queue.shuffle(rng);
        } else {
            self.queue.sort_unstable();
        }
        self.pos = current
            .and_then(|c| self.queue.iter().position(|&i| i == c))
            .unwrap_or(0);
    }

    /// Step forward, wrapping at the end. Wrapping a shuffled queue
    /// re-permutes it first.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.queue.is_empty() {
            return None;
        }
        if self.pos + 1 >= self.queue.len() {
            if self.shuffle {
                self.queue.shuffle(rng);
            }
            self.pos = 0;
        } else {
            self.pos += 1;
        }
        self.current()
    }

    /// Step back, wrapping from the first position to the last.
    pub fn previous(&mut self) -> Option<usize> {
        if self.queue.is_empty() {
            return None;
        }
        self.pos = (self.pos + self.queue.len() - 1) % self.queue.len();
        self.current()
    }

    /// Decide what follows a finished track under the repeat policy.
    pub fn on_track_end<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TrackEnd> {
        match self.repeat {
            RepeatMode::One => self.current().map(TrackEnd::Restart),
            RepeatMode::Off => self.next(rng).map(TrackEnd::Advance),
        }
    }

    /// Move to `catalog_index` if it is queued. Returns whether it was.
    pub fn jump_to(&mut self, catalog_index: usize) -> bool {
        match self.queue.iter().position(|&i| i == catalog_index) {
            Some(p) => {
                self.pos = p;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn linear(n: usize) -> Sequencer {
        Sequencer::new((0..n).collect(), false, RepeatMode::Off, &mut rng())
    }

    #[test]
    fn linear_next_then_previous_returns_to_start() {
        let mut r = rng();
        for n in 1..=6 {
            for start in 0..n {
                let mut seq = linear(n);
                assert!(seq.jump_to(start));
                seq.next(&mut r);
                assert_eq!(seq.previous(), Some(start), "n={n} start={start}");
            }
        }
    }

    #[test]
    fn linear_wraps_both_ways() {
        let mut r = rng();
        let mut seq = linear(3);
        assert_eq!(seq.previous(), Some(2));
        assert_eq!(seq.next(&mut r), Some(0));
        assert_eq!(seq.next(&mut r), Some(1));
        assert_eq!(seq.next(&mut r), Some(2));
        assert_eq!(seq.next(&mut r), Some(0));
    }

    #[test]
    fn shuffled_queue_is_a_permutation() {
        let mut r = rng();
        for n in [1usize, 2, 5, 40] {
            let mut seq = Sequencer::new((0..n).collect(), true, RepeatMode::Off, &mut r);
            let mut seen = seq.queue().to_vec();
            seen.sort_unstable();
            assert_eq!(seen, (0..n).collect::<Vec<_>>());

            // A wrap draws a fresh order over the same set.
            for _ in 0..n {
                seq.next(&mut r);
            }
            assert_eq!(seq.position(), 0);
            let mut again = seq.queue().to_vec();
            again.sort_unstable();
            assert_eq!(again, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn forward_wrap_draws_a_new_shuffle() {
        let n = 12;
        let mut r = rng();
        let mut seq = Sequencer::new((0..n).collect(), true, RepeatMode::Off, &mut r);
        let before = seq.queue().to_vec();

        // Stepping inside the queue leaves the rng untouched, so the wrap
        // consumes it exactly like a shuffle of `before` would.
        let mut expected = before.clone();
        expected.shuffle(&mut r.clone());
        assert_ne!(expected, before);

        for _ in 0..n - 1 {
            seq.next(&mut r);
            assert_eq!(seq.queue(), before.as_slice());
        }
        seq.next(&mut r);
        assert_eq!(seq.position(), 0);
        assert_eq!(seq.queue(), expected.as_slice());
    }

    #[test]
    fn linear_wrap_keeps_order() {
        let mut r = rng();
        let mut seq = linear(4);
        for _ in 0..4 {
            seq.next(&mut r);
        }
        assert_eq!(seq.position(), 0);
        assert_eq!(seq.queue(), &[0, 1, 2, 3]);
    }

    #[test]
    fn toggling_shuffle_keeps_current_track() {
        let mut r = rng();
        let mut seq = linear(10);
        seq.jump_to(4);
        seq.set_shuffle(true, &mut r);
        assert_eq!(seq.current(), Some(4));
        seq.set_shuffle(false, &mut r);
        assert_eq!(seq.current(), Some(4));
        assert_eq!(seq.position(), 4);
        assert_eq!(seq.queue(), (0..10).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn repeat_one_restarts_current() {
        let mut r = rng();
        let mut seq = linear(3);
        seq.jump_to(1);
        seq.set_repeat(RepeatMode::One);
        assert_eq!(seq.on_track_end(&mut r), Some(TrackEnd::Restart(1)));
        assert_eq!(seq.current(), Some(1));

        seq.set_repeat(RepeatMode::Off);
        assert_eq!(seq.on_track_end(&mut r), Some(TrackEnd::Advance(2)));
    }

    #[test]
    fn rebuild_restricts_and_resets_position() {
        let mut r = rng();
        let mut seq = linear(5);
        seq.jump_to(3);
        seq.rebuild(vec![4, 1], &mut r);
        assert_eq!(seq.queue(), &[1, 4]);
        assert_eq!(seq.position(), 0);
        assert!(!seq.jump_to(3));
    }

    #[test]
    fn empty_queue_has_no_moves() {
        let mut r = rng();
        let mut seq = Sequencer::new(Vec::new(), false, RepeatMode::Off, &mut r);
        assert_eq!(seq.current(), None);
        assert_eq!(seq.next(&mut r), None);
        assert_eq!(seq.previous(), None);
        assert_eq!(seq.on_track_end(&mut r), None);
    }
}
