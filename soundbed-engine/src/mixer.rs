//! Mixer control seam and volume conversion
//!
//! User-facing volume is linear (0.0-1.0); the mixer takes decibels. The
//! conversion is `20 * log10(v)` with a -80 dB floor for v <= 0, since the
//! log of zero has no finite value and -80 dB is below audibility on any
//! consumer output chain.

use tracing::debug;

/// Floor applied to the decibel conversion for zero/negative volume
pub const MIN_DB: f32 = -80.0;

/// Addressable gain controls on the host's audio routing graph
pub trait MixerControl: Send + Sync {
    /// Set a mixer parameter to a decibel value.
    fn set_parameter(&self, param: &str, db: f32);
}

/// Convert a linear volume (0.0-1.0) to a mixer decibel value
///
/// `db_gain(1.0) == 0.0`, `db_gain(0.5)` is about -6.02, and anything at or
/// below zero maps to [`MIN_DB`].
pub fn db_gain(volume: f32) -> f32 {
    if volume <= 0.0 {
        return MIN_DB;
    }
    20.0 * volume.log10()
}

/// Mixer that only logs parameter writes
pub struct LogMixer;

impl MixerControl for LogMixer {
    fn set_parameter(&self, param: &str, db: f32) {
        debug!(param = %param, db, "set mixer parameter");
    }
}
