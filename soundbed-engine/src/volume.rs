//! Volume store - persisted mixer volume levels
//!
//! Each volume group maps one user-facing linear level (0.0-1.0) onto a
//! set of mixer parameters. Levels are restored from the preference
//! database on initialise (full volume when never persisted) and written
//! back on every change, then applied to the mixer in decibels.

use crate::error::{Error, Result};
use crate::mixer::{db_gain, MixerControl};
use crate::state::SharedState;
use chrono::Utc;
use serde::Deserialize;
use soundbed_common::db::settings;
use soundbed_common::events::AudioEvent;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Static configuration of one volume group
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeGroupConfig {
    /// Unique group id, also the persistence key suffix
    pub id: String,
    /// Mixer parameters driven by this group's level
    pub mixer_params: Vec<String>,
}

/// Runtime state of one volume group
struct VolumeGroup {
    mixer_params: Vec<String>,
    volume: f32,
}

/// Persists and restores named linear volume levels and applies them to
/// mixer parameter targets
pub struct VolumeStore {
    db: SqlitePool,
    mixer: Arc<dyn MixerControl>,
    state: Arc<SharedState>,
    groups: RwLock<HashMap<String, VolumeGroup>>,
}

impl VolumeStore {
    /// Create a volume store over the configured groups
    ///
    /// Levels start at full volume until `initialise` restores persisted
    /// values.
    pub fn new(
        configs: Vec<VolumeGroupConfig>,
        db: SqlitePool,
        mixer: Arc<dyn MixerControl>,
        state: Arc<SharedState>,
    ) -> Self {
        let groups = configs
            .into_iter()
            .map(|config| {
                (
                    config.id,
                    VolumeGroup {
                        mixer_params: config.mixer_params,
                        volume: 1.0,
                    },
                )
            })
            .collect();
        Self {
            db,
            mixer,
            state,
            groups: RwLock::new(groups),
        }
    }

    /// Restore persisted levels and push them to the mixer
    ///
    /// Groups without a persisted value stay at 1.0; the preference row is
    /// only created once a caller changes the level explicitly.
    pub async fn initialise(&self) -> Result<()> {
        let mut groups = self.groups.write().await;
        for (id, group) in groups.iter_mut() {
            let volume = settings::get_volume_group_level(&self.db, id)
                .await?
                .unwrap_or(1.0);
            group.volume = volume;
            let db_value = db_gain(volume);
            for param in &group.mixer_params {
                self.mixer.set_parameter(param, db_value);
            }
            info!(group = %id, volume, db = db_value, "volume group initialised");
        }
        Ok(())
    }

    /// Set a group's linear level (clamped to 0.0-1.0)
    ///
    /// Updates memory, persists the level, then reapplies every mixer
    /// parameter of the group. Unknown ids leave the mixer untouched.
    pub async fn set_volume_level(&self, id: &str, value: f32) -> Result<()> {
        let value = value.clamp(0.0, 1.0);

        let mut groups = self.groups.write().await;
        let group = match groups.get_mut(id) {
            Some(group) => group,
            None => {
                error!("Invalid volume group: {}", id);
                return Err(Error::UnknownVolumeGroup(id.to_string()));
            }
        };
        group.volume = value;
        let params = group.mixer_params.clone();
        drop(groups);

        settings::set_volume_group_level(&self.db, id, value).await?;

        let db_value = db_gain(value);
        for param in &params {
            self.mixer.set_parameter(param, db_value);
        }

        self.state.broadcast_event(AudioEvent::VolumeChanged {
            group_id: id.to_string(),
            volume: value,
            db: db_value,
            timestamp: Utc::now(),
        });
        debug!(group = %id, volume = value, db = db_value, "volume level changed");

        Ok(())
    }

    /// Current linear level of a group, if configured
    pub async fn volume(&self, id: &str) -> Option<f32> {
        self.groups.read().await.get(id).map(|group| group.volume)
    }

    /// Ids of all configured volume groups
    pub async fn group_ids(&self) -> Vec<String> {
        self.groups.read().await.keys().cloned().collect()
    }
}
