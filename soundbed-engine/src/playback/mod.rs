//! Playback dispatch and loop scheduling
//!
//! **Module Structure:**
//! - `engine.rs`: play requests, loop registration, replace-on-restart
//! - `scheduler.rs`: deferred retirement and loop-cycle timer tasks

mod engine;
mod scheduler;

pub use engine::{PlaybackEngine, PlaybackInstance};
