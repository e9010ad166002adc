//! Shared test helpers
//!
//! Recording fakes for the audio backend and mixer control seams plus
//! small builders for registries and engines.

#![allow(dead_code)]

use soundbed_engine::backend::{Anchor, AudioBackend, SourceId};
use soundbed_engine::mixer::MixerControl;
use soundbed_engine::registry::{ClipGroup, ClipGroupRegistry, ClipRef};
use soundbed_engine::state::SharedState;
use soundbed_engine::{Error, PlaybackEngine};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded backend start call
#[derive(Debug, Clone)]
pub struct StartedSource {
    pub source: SourceId,
    pub clip: String,
    pub route: String,
}

/// Backend fake that records every call and tracks live sources
#[derive(Default)]
pub struct RecordingBackend {
    starts: Mutex<Vec<StartedSource>>,
    live: Mutex<HashSet<SourceId>>,
    anchors: Mutex<Vec<(SourceId, Anchor)>>,
    /// When set, every start call fails (error injection)
    fail_starts: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn start_count(&self) -> usize {
        self.starts.lock().unwrap().len()
    }

    pub fn starts(&self) -> Vec<StartedSource> {
        self.starts.lock().unwrap().clone()
    }

    pub fn started_clips(&self) -> Vec<String> {
        self.starts.lock().unwrap().iter().map(|s| s.clip.clone()).collect()
    }

    /// Sources started but not yet disposed
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn is_live(&self, source: SourceId) -> bool {
        self.live.lock().unwrap().contains(&source)
    }

    pub fn anchors(&self) -> Vec<(SourceId, Anchor)> {
        self.anchors.lock().unwrap().clone()
    }

    /// Make every subsequent start call fail
    pub fn fail_starts(&self, fail: bool) {
        self.fail_starts.store(fail, Ordering::SeqCst);
    }
}

impl AudioBackend for RecordingBackend {
    fn start(&self, clip: &ClipRef, route: &str) -> soundbed_engine::Result<SourceId> {
        if self.fail_starts.load(Ordering::SeqCst) {
            return Err(Error::Backend("injected start failure".to_string()));
        }
        let source = SourceId::new();
        self.starts.lock().unwrap().push(StartedSource {
            source,
            clip: clip.name.clone(),
            route: route.to_string(),
        });
        self.live.lock().unwrap().insert(source);
        Ok(source)
    }

    fn set_anchor(&self, source: SourceId, anchor: Anchor) -> soundbed_engine::Result<()> {
        self.anchors.lock().unwrap().push((source, anchor));
        Ok(())
    }

    fn dispose(&self, source: SourceId) {
        // Idempotent by contract; removing an absent source is a no-op
        self.live.lock().unwrap().remove(&source);
    }
}

/// Mixer fake recording every parameter write
#[derive(Default)]
pub struct RecordingMixer {
    calls: Mutex<Vec<(String, f32)>>,
}

impl RecordingMixer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Most recent value written to a parameter
    pub fn last_value(&self, param: &str) -> Option<f32> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == param)
            .map(|(_, db)| *db)
    }
}

impl MixerControl for RecordingMixer {
    fn set_parameter(&self, param: &str, db: f32) {
        self.calls.lock().unwrap().push((param.to_string(), db));
    }
}

pub fn clip(name: &str, duration_ms: u64) -> ClipRef {
    ClipRef {
        name: name.to_string(),
        duration: Duration::from_millis(duration_ms),
    }
}

pub fn group(id: &str, route: &str, clips: Vec<ClipRef>) -> ClipGroup {
    ClipGroup {
        id: id.to_string(),
        route: route.to_string(),
        clips,
    }
}

/// Build an engine over the given groups with recording collaborators
pub fn engine_with(
    groups: Vec<ClipGroup>,
) -> (PlaybackEngine, Arc<RecordingBackend>, Arc<SharedState>) {
    let backend = RecordingBackend::new();
    let state = Arc::new(SharedState::new());
    let registry = ClipGroupRegistry::new(groups).unwrap();
    let engine = PlaybackEngine::new(
        registry,
        Arc::clone(&backend) as Arc<dyn AudioBackend>,
        Arc::clone(&state),
    );
    (engine, backend, state)
}
