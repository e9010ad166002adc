//! Timer tasks driving deferred disposal and loop rescheduling
//!
//! Every playback instance gets one spawned task that sleeps for the
//! clip's duration. One-shots simply retire their source when it fires.
//! Looping instances consult the loop map at fire time - never a flag
//! captured at spawn time - so a `stop_looping` issued while the timer
//! slept wins, and an aborted task can never revive a stopped group.

use crate::backend::SourceId;
use crate::playback::engine::EngineInner;
use chrono::Utc;
use soundbed_common::events::AudioEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error};
use uuid::Uuid;

/// Arm the cycle timer for a looping instance
///
/// When the clip's duration elapses, either the group is still registered
/// with this instance (reschedule: start a fresh cycle, swap it in under
/// the same write guard, then retire the expired source) or it is not
/// (retire the expired source only - the map was already cleared or
/// superseded).
pub(crate) fn spawn_cycle_timer(
    inner: Arc<EngineInner>,
    group_id: String,
    instance_id: Uuid,
    source: SourceId,
    wait: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(wait).await;

        let mut loops = inner.loops.write().await;

        // Fire-time check against the live map. The registration may have
        // been removed (stop_looping) or replaced (explicit restart) while
        // this task slept.
        let inherited_route = match loops.get(&group_id) {
            Some(active) if active.instance.id == instance_id => {
                Some(active.instance.route.clone())
            }
            _ => None,
        };

        match inherited_route {
            Some(route) => match inner.start_cycle(&group_id, &route) {
                Ok(next) => {
                    let next_id = next.instance.id;
                    let next_clip = next.instance.clip.name.clone();
                    // The entry replaced here is this task's own
                    // registration; dropping its handle is harmless.
                    loops.insert(group_id.clone(), next);
                    drop(loops);
                    inner.backend.dispose(source);
                    inner.state.broadcast_event(AudioEvent::LoopCycled {
                        group_id: group_id.clone(),
                        clip: next_clip,
                        previous_instance_id: instance_id,
                        instance_id: next_id,
                        timestamp: Utc::now(),
                    });
                    debug!(group = %group_id, instance = %next_id, "loop cycled");
                }
                Err(e) => {
                    // Loop ends rather than crashing; the group can be
                    // restarted by a later play request.
                    error!(group = %group_id, "Failed to restart looping group: {}", e);
                    loops.remove(&group_id);
                    drop(loops);
                    inner.backend.dispose(source);
                }
            },
            None => {
                drop(loops);
                inner.backend.dispose(source);
                debug!(group = %group_id, instance = %instance_id, "expired loop instance retired");
            }
        }
    })
}

/// Arm the retirement timer for a one-shot instance
///
/// Disposal is deferred, never immediate-and-blocking; disposing a source
/// the backend already released is a no-op by the backend contract.
pub(crate) fn spawn_retirement(
    inner: Arc<EngineInner>,
    source: SourceId,
    wait: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(wait).await;
        inner.backend.dispose(source);
    })
}
