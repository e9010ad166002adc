//! Preference store
//!
//! Sqlite-backed key-value persistence for user-facing audio preferences.

pub mod init;
pub mod settings;

pub use init::{init_database, init_memory_database};
