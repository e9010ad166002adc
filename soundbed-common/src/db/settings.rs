//! Settings database access
//!
//! Read/write settings from the settings table (key-value store).
//! All settings are global/system-wide (not user-specific).

use crate::error::{Error, Result};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Key prefix for persisted volume group levels
pub const VOLUME_GROUP_KEY_PREFIX: &str = "VolumeGroupLevel_";

/// Get a persisted volume group level (0.0-1.0)
///
/// Returns None when the group has never been persisted; callers fall back
/// to full volume in that case.
pub async fn get_volume_group_level(db: &SqlitePool, group_id: &str) -> Result<Option<f32>> {
    let key = volume_group_key(group_id);
    match get_setting::<f32>(db, &key).await? {
        Some(level) => Ok(Some(level.clamp(0.0, 1.0))),
        None => Ok(None),
    }
}

/// Persist a volume group level (0.0-1.0)
pub async fn set_volume_group_level(db: &SqlitePool, group_id: &str, level: f32) -> Result<()> {
    let clamped = level.clamp(0.0, 1.0);
    set_setting(db, &volume_group_key(group_id), clamped).await
}

/// Settings key for a volume group
fn volume_group_key(group_id: &str) -> String {
    format!("{}{}", VOLUME_GROUP_KEY_PREFIX, group_id)
}

/// Generic setting getter
///
/// Returns None if key doesn't exist in database.
/// Parses value from string using FromStr trait.
pub async fn get_setting<T: FromStr>(db: &SqlitePool, key: &str) -> Result<Option<T>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    match value {
        Some(s) => match s.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(Error::Config(format!(
                "Failed to parse setting '{}' value: {}",
                key, s
            ))),
        },
        None => Ok(None),
    }
}

/// Generic setting setter
///
/// Inserts or updates setting in database.
pub async fn set_setting<T: ToString>(db: &SqlitePool, key: &str, value: T) -> Result<()> {
    let value_str = value.to_string();

    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value_str)
    .execute(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    #[tokio::test]
    async fn test_volume_group_level_roundtrip() {
        let db = init_memory_database().await.unwrap();

        // Absent until persisted
        let level = get_volume_group_level(&db, "music").await.unwrap();
        assert_eq!(level, None);

        set_volume_group_level(&db, "music", 0.25).await.unwrap();
        let level = get_volume_group_level(&db, "music").await.unwrap();
        assert_eq!(level, Some(0.25));

        // Level should be clamped on write
        set_volume_group_level(&db, "music", 1.5).await.unwrap();
        let level = get_volume_group_level(&db, "music").await.unwrap();
        assert_eq!(level, Some(1.0));

        set_volume_group_level(&db, "music", -0.5).await.unwrap();
        let level = get_volume_group_level(&db, "music").await.unwrap();
        assert_eq!(level, Some(0.0));
    }

    #[tokio::test]
    async fn test_volume_group_keys_are_namespaced() {
        let db = init_memory_database().await.unwrap();

        set_volume_group_level(&db, "music", 0.3).await.unwrap();
        set_volume_group_level(&db, "sfx", 0.9).await.unwrap();

        let raw: Option<f32> = get_setting(&db, "VolumeGroupLevel_music").await.unwrap();
        assert_eq!(raw, Some(0.3));
        let raw: Option<f32> = get_setting(&db, "VolumeGroupLevel_sfx").await.unwrap();
        assert_eq!(raw, Some(0.9));
    }

    #[tokio::test]
    async fn test_generic_setting_get_set() {
        let db = init_memory_database().await.unwrap();

        // Set an integer setting
        set_setting(&db, "test_int", 42).await.unwrap();
        let value: Option<i32> = get_setting(&db, "test_int").await.unwrap();
        assert_eq!(value, Some(42));

        // Set a string setting
        set_setting(&db, "test_str", "hello".to_string())
            .await
            .unwrap();
        let value: Option<String> = get_setting(&db, "test_str").await.unwrap();
        assert_eq!(value, Some("hello".to_string()));

        // Non-existent key should return None
        let value: Option<String> = get_setting(&db, "nonexistent").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_setting_update() {
        let db = init_memory_database().await.unwrap();

        // Set initial value
        set_setting(&db, "test_key", "value1".to_string())
            .await
            .unwrap();
        let value: Option<String> = get_setting(&db, "test_key").await.unwrap();
        assert_eq!(value, Some("value1".to_string()));

        // Update value (should use UPSERT)
        set_setting(&db, "test_key", "value2".to_string())
            .await
            .unwrap();
        let value: Option<String> = get_setting(&db, "test_key").await.unwrap();
        assert_eq!(value, Some("value2".to_string()));
    }

    #[tokio::test]
    async fn test_unparseable_setting_is_config_error() {
        let db = init_memory_database().await.unwrap();

        set_setting(&db, "test_key", "not-a-number".to_string())
            .await
            .unwrap();
        let result: Result<Option<f32>> = get_setting(&db, "test_key").await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
