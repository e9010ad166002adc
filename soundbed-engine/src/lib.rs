//! # Soundbed Engine
//!
//! Clip-group playback dispatch with looping soundbeds and persisted mixer
//! volumes.
//!
//! **Purpose:** Select clip variants at random per trigger, keep at most
//! one looping instance per group with replace-on-restart semantics,
//! reschedule loops as their clips run out, and persist/restore per-group
//! mixer volume levels.
//!
//! **Architecture:** Decoding, mixing, and spatialization stay with the
//! host; the engine drives them through the `AudioBackend` and
//! `MixerControl` seams and runs its timers on tokio.

pub mod backend;
pub mod config;
pub mod error;
pub mod mixer;
pub mod playback;
pub mod registry;
pub mod state;
pub mod volume;

pub use error::{Error, Result};
pub use playback::{PlaybackEngine, PlaybackInstance};
pub use state::SharedState;
pub use volume::VolumeStore;
