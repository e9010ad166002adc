//! Audio backend seam
//!
//! The engine never decodes or mixes audio itself. It drives an
//! `AudioBackend` implementation through three primitives: start a clip on
//! a mixer route, anchor the resulting source in space, and dispose of a
//! source. The embedding host supplies the real implementation; the
//! shipped `LogBackend` only traces, for smoke runs and tests.

use crate::error::Result;
use crate::registry::ClipRef;
use tracing::debug;
use uuid::Uuid;

/// Opaque handle to one live playback source inside the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(Uuid);

impl SourceId {
    /// Mint a fresh source id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Spatial anchor for a playback source
///
/// Spatialization math itself belongs to the host; the engine only passes
/// the anchor through.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// Fixed world position
    Position([f32; 3]),
    /// Follow a moving host object, addressed by the host's id scheme
    Follow(String),
}

/// Playback primitives the engine requires from the host audio system
pub trait AudioBackend: Send + Sync {
    /// Start audible output of `clip` routed to `route`, returning a handle
    /// to the live source.
    fn start(&self, clip: &ClipRef, route: &str) -> Result<SourceId>;

    /// Attach a spatial anchor to a live source.
    fn set_anchor(&self, source: SourceId, anchor: Anchor) -> Result<()>;

    /// Stop and release a source.
    ///
    /// Must be idempotent: disposing a source that already ended (or was
    /// never started) is a no-op, not an error.
    fn dispose(&self, source: SourceId);
}

/// Backend that only logs, producing no audio
///
/// Used by the smoke-player binary and available to embedders for dry runs.
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn start(&self, clip: &ClipRef, route: &str) -> Result<SourceId> {
        let source = SourceId::new();
        debug!(
            clip = %clip.name,
            route = %route,
            source = %source,
            duration_ms = clip.duration.as_millis() as u64,
            "start source"
        );
        Ok(source)
    }

    fn set_anchor(&self, source: SourceId, anchor: Anchor) -> Result<()> {
        debug!(source = %source, ?anchor, "anchor source");
        Ok(())
    }

    fn dispose(&self, source: SourceId) {
        debug!(source = %source, "dispose source");
    }
}
