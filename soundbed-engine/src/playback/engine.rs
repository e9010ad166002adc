//! Playback engine - clip group dispatch and loop state
//!
//! One-shot requests create a source, hand it a retirement timer, and
//! forget it. Looping requests register the new instance in the loop map
//! with replace semantics: retiring the prior instance and registering the
//! new one happen under a single write guard, so no reader of the map can
//! observe zero or two live instances for a group.

use crate::backend::{Anchor, AudioBackend, SourceId};
use crate::error::{Error, Result};
use crate::registry::{ClipGroup, ClipGroupRegistry, ClipRef};
use crate::state::SharedState;
use chrono::Utc;
use soundbed_common::events::AudioEvent;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use uuid::Uuid;

use super::scheduler;

/// One playback request's live instance
#[derive(Debug, Clone)]
pub struct PlaybackInstance {
    /// Instance UUID
    pub id: Uuid,
    /// Clip group the instance was drawn from
    pub group_id: String,
    /// The selected clip variant
    pub clip: ClipRef,
    /// Mixer route the instance is playing on
    pub route: String,
    /// True for looping instances tracked in the loop map
    pub looping: bool,
    /// Backend source handle
    pub source: SourceId,
}

/// A looping group's current registration
pub(crate) struct ActiveLoop {
    /// Instance currently producing audio for the group
    pub(crate) instance: PlaybackInstance,
    /// Pending cycle timer; aborted on stop or replace
    pub(crate) timer: JoinHandle<()>,
}

/// Shared engine internals, reachable from scheduler tasks
pub(crate) struct EngineInner {
    pub(crate) registry: ClipGroupRegistry,
    pub(crate) backend: Arc<dyn AudioBackend>,
    pub(crate) state: Arc<SharedState>,
    /// Loop map: at most one registration per group id
    pub(crate) loops: RwLock<HashMap<String, ActiveLoop>>,
}

impl EngineInner {
    fn lookup(&self, group_id: &str) -> Result<&ClipGroup> {
        self.registry.lookup(group_id).ok_or_else(|| {
            error!("Tried to play from unknown clip group: {}", group_id);
            Error::GroupNotFound(group_id.to_string())
        })
    }

    /// Start one looping cycle: pick a variant, start the source, arm the
    /// cycle timer.
    ///
    /// Caller must hold the `loops` write guard and insert the returned
    /// registration before releasing it; the armed timer re-checks the map
    /// at fire time and stands down if the registration is gone.
    pub(crate) fn start_cycle(self: &Arc<Self>, group_id: &str, route: &str) -> Result<ActiveLoop> {
        let group = self.lookup(group_id)?;
        let clip = group.choose_clip().clone();
        let source = self.backend.start(&clip, route)?;
        let instance = PlaybackInstance {
            id: Uuid::new_v4(),
            group_id: group_id.to_string(),
            clip: clip.clone(),
            route: route.to_string(),
            looping: true,
            source,
        };
        let timer = scheduler::spawn_cycle_timer(
            Arc::clone(self),
            group_id.to_string(),
            instance.id,
            source,
            clip.duration,
        );
        Ok(ActiveLoop { instance, timer })
    }
}

/// Playback engine - dispatches one-shot and looping clip group requests
pub struct PlaybackEngine {
    inner: Arc<EngineInner>,
}

impl Clone for PlaybackEngine {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PlaybackEngine {
    /// Create a new playback engine over a validated registry
    pub fn new(
        registry: ClipGroupRegistry,
        backend: Arc<dyn AudioBackend>,
        state: Arc<SharedState>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                registry,
                backend,
                state,
                loops: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Play a single clip one time from a clip group
    pub async fn play_one_shot(&self, group_id: &str) -> Result<PlaybackInstance> {
        self.play_one_shot_inner(group_id, None).await
    }

    /// Play a single clip one time, centered at a fixed position
    pub async fn play_one_shot_at(
        &self,
        group_id: &str,
        position: [f32; 3],
    ) -> Result<PlaybackInstance> {
        self.play_one_shot_inner(group_id, Some(Anchor::Position(position)))
            .await
    }

    /// Play a single clip one time, following a moving host object
    pub async fn play_one_shot_following(
        &self,
        group_id: &str,
        target: &str,
    ) -> Result<PlaybackInstance> {
        self.play_one_shot_inner(group_id, Some(Anchor::Follow(target.to_string())))
            .await
    }

    /// Play a looping clip from a clip group
    ///
    /// If the group is already looping, its current instance is retired in
    /// the same step that registers the new one.
    pub async fn play_looping(&self, group_id: &str) -> Result<PlaybackInstance> {
        self.play_looping_inner(group_id, None).await
    }

    /// Play a looping clip, centered at a fixed position
    pub async fn play_looping_at(
        &self,
        group_id: &str,
        position: [f32; 3],
    ) -> Result<PlaybackInstance> {
        self.play_looping_inner(group_id, Some(Anchor::Position(position)))
            .await
    }

    /// Play a looping clip, following a moving host object
    pub async fn play_looping_following(
        &self,
        group_id: &str,
        target: &str,
    ) -> Result<PlaybackInstance> {
        self.play_looping_inner(group_id, Some(Anchor::Follow(target.to_string())))
            .await
    }

    /// Determine if a group is currently looping
    pub async fn is_looping(&self, group_id: &str) -> bool {
        self.inner.loops.read().await.contains_key(group_id)
    }

    /// Ids of all currently looping groups
    pub async fn looping_groups(&self) -> Vec<String> {
        self.inner.loops.read().await.keys().cloned().collect()
    }

    /// Stop a looping clip group
    ///
    /// Retires the registered instance and aborts its pending cycle timer.
    /// No-op if the group is not looping.
    pub async fn stop_looping(&self, group_id: &str) {
        let mut loops = self.inner.loops.write().await;
        if let Some(active) = loops.remove(group_id) {
            drop(loops);
            active.timer.abort();
            self.inner.backend.dispose(active.instance.source);
            self.inner.state.broadcast_event(AudioEvent::LoopStopped {
                group_id: group_id.to_string(),
                instance_id: active.instance.id,
                timestamp: Utc::now(),
            });
            debug!(group = %group_id, instance = %active.instance.id, "stopped looping group");
        }
    }

    async fn play_one_shot_inner(
        &self,
        group_id: &str,
        anchor: Option<Anchor>,
    ) -> Result<PlaybackInstance> {
        let inner = &self.inner;
        let group = inner.lookup(group_id)?;
        let clip = group.choose_clip().clone();
        let route = group.route.clone();

        let source = inner.backend.start(&clip, &route)?;
        let timer = scheduler::spawn_retirement(Arc::clone(inner), source, clip.duration);

        if let Some(anchor) = anchor {
            if let Err(e) = inner.backend.set_anchor(source, anchor) {
                timer.abort();
                inner.backend.dispose(source);
                return Err(e);
            }
        }

        let instance = PlaybackInstance {
            id: Uuid::new_v4(),
            group_id: group_id.to_string(),
            clip,
            route,
            looping: false,
            source,
        };

        inner.state.broadcast_event(AudioEvent::OneShotStarted {
            group_id: instance.group_id.clone(),
            clip: instance.clip.name.clone(),
            instance_id: instance.id,
            timestamp: Utc::now(),
        });
        debug!(
            group = %group_id,
            clip = %instance.clip.name,
            instance = %instance.id,
            "one-shot started"
        );

        Ok(instance)
    }

    async fn play_looping_inner(
        &self,
        group_id: &str,
        anchor: Option<Anchor>,
    ) -> Result<PlaybackInstance> {
        let inner = &self.inner;
        // Public entry points always start from the registry route; only
        // scheduler cycles inherit a registration's current route.
        let route = inner.lookup(group_id)?.route.clone();

        let mut loops = inner.loops.write().await;
        let active = inner.start_cycle(group_id, &route)?;

        if let Some(anchor) = anchor {
            if let Err(e) = inner.backend.set_anchor(active.instance.source, anchor) {
                active.timer.abort();
                inner.backend.dispose(active.instance.source);
                return Err(e);
            }
        }

        let instance = active.instance.clone();
        let previous = loops.insert(group_id.to_string(), active);
        drop(loops);

        if let Some(previous) = previous {
            previous.timer.abort();
            inner.backend.dispose(previous.instance.source);
            debug!(
                group = %group_id,
                retired = %previous.instance.id,
                "looping group restarted, prior instance retired"
            );
        }

        inner.state.broadcast_event(AudioEvent::LoopStarted {
            group_id: instance.group_id.clone(),
            clip: instance.clip.name.clone(),
            instance_id: instance.id,
            timestamp: Utc::now(),
        });
        debug!(
            group = %group_id,
            clip = %instance.clip.name,
            instance = %instance.id,
            "looping group started"
        );

        Ok(instance)
    }
}
