//! Event types for the soundbed event system
//!
//! Events are broadcast by the playback engine and volume store via a
//! `tokio::sync::broadcast` channel and can be serialized for transport to
//! an embedding host (logging overlays, debug consoles, telemetry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Soundbed event types
///
/// All engine-observable happenings use this central enum for type safety
/// and exhaustive matching in subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A one-shot playback instance started
    OneShotStarted {
        /// Clip group the instance was drawn from
        group_id: String,
        /// Name of the selected clip variant
        clip: String,
        /// Playback instance UUID
        instance_id: Uuid,
        /// When playback started
        timestamp: DateTime<Utc>,
    },

    /// A looping group started (or was restarted by an explicit play call)
    ///
    /// Triggers:
    /// - Subscribers tracking which soundbeds are active
    LoopStarted {
        /// Clip group that is now looping
        group_id: String,
        /// Name of the selected clip variant
        clip: String,
        /// Playback instance UUID now registered for the group
        instance_id: Uuid,
        /// When playback started
        timestamp: DateTime<Utc>,
    },

    /// A looping group rolled over to its next cycle
    ///
    /// Emitted each time an expiring instance is replaced by a fresh one.
    /// The new cycle may carry a different clip variant than the last.
    LoopCycled {
        /// Clip group that cycled
        group_id: String,
        /// Name of the newly selected clip variant
        clip: String,
        /// Instance that just finished its run
        previous_instance_id: Uuid,
        /// Instance registered for the new cycle
        instance_id: Uuid,
        /// When the cycle swap happened
        timestamp: DateTime<Utc>,
    },

    /// A looping group was stopped
    LoopStopped {
        /// Clip group that stopped
        group_id: String,
        /// Instance that was retired
        instance_id: Uuid,
        /// When the stop was processed
        timestamp: DateTime<Utc>,
    },

    /// A volume group level changed
    ///
    /// Triggers:
    /// - UI: move the matching slider on remote views
    VolumeChanged {
        /// Volume group whose level changed
        group_id: String,
        /// New linear level (0.0-1.0)
        volume: f32,
        /// Decibel value applied to the mixer parameters
        db: f32,
        /// When the change was applied
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tag() {
        let event = AudioEvent::VolumeChanged {
            group_id: "music".to_string(),
            volume: 0.5,
            db: -6.02,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"VolumeChanged\""));
        assert!(json.contains("\"music\""));
    }

    #[test]
    fn test_event_roundtrip() {
        let instance_id = Uuid::new_v4();
        let event = AudioEvent::LoopStarted {
            group_id: "ambience".to_string(),
            clip: "wind_low".to_string(),
            instance_id,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: AudioEvent = serde_json::from_str(&json).unwrap();

        match back {
            AudioEvent::LoopStarted { group_id, clip, instance_id: id, .. } => {
                assert_eq!(group_id, "ambience");
                assert_eq!(clip, "wind_low");
                assert_eq!(id, instance_id);
            }
            other => panic!("Expected LoopStarted, got {:?}", other),
        }
    }
}
