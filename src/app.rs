//! Preview application model: the playback session plus cursor and panel
//! state for the terminal UI.

mod model;

pub use model::*;
