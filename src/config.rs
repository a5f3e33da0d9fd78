//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used by the build, check and
//! preview commands, plus helpers to locate config and state on disk.

mod load;
mod schema;

pub use load::default_state_dir;
pub use schema::*;

#[cfg(test)]
mod tests;
