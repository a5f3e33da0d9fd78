//! Player core: play-order sequencing, the radio artist filter and the
//! playback session state machine, independent of any concrete media output.

mod filter;
mod media;
mod sequencer;
mod session;
mod types;

pub use filter::ArtistFilter;
pub use media::{MediaBackend, PlaybackStartError, media_source, track_url};
pub use sequencer::{Sequencer, TrackEnd};
pub use session::{Session, SessionOptions};
pub use types::{ErrorReason, MediaEvent, MediaSource, PlaybackState, RepeatMode};

#[cfg(test)]
pub(crate) mod testing;
