//! Audio manifest loading
//!
//! Clip groups and volume groups are declared in a TOML manifest standing
//! in for the host's parsed asset definitions:
//!
//! ```toml
//! [[clip_groups]]
//! id = "footsteps"
//! route = "SfxBus"
//! clips = [
//!     { name = "step_gravel_1", duration_s = 0.8 },
//!     { name = "step_gravel_2", duration_s = 0.75 },
//! ]
//!
//! [[volume_groups]]
//! id = "sfx"
//! mixer_params = ["SfxVol"]
//! ```

use crate::error::{Error, Result};
use crate::registry::{ClipGroup, ClipGroupRegistry, ClipRef};
use crate::volume::VolumeGroupConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Parsed audio manifest
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// Clip group declarations
    #[serde(default)]
    pub clip_groups: Vec<ClipGroupDef>,
    /// Volume group declarations
    #[serde(default)]
    pub volume_groups: Vec<VolumeGroupConfig>,
}

/// Clip group declaration
#[derive(Debug, Deserialize)]
pub struct ClipGroupDef {
    pub id: String,
    pub route: String,
    pub clips: Vec<ClipDef>,
}

/// Clip declaration with its decoded duration in seconds
#[derive(Debug, Deserialize)]
pub struct ClipDef {
    pub name: String,
    pub duration_s: f64,
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse manifest TOML
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse manifest: {}", e)))
}

impl Manifest {
    /// Validate the manifest and build the registry plus volume configs
    ///
    /// Fails fast on empty clip groups, non-positive durations, duplicate
    /// ids, and volume groups without mixer parameters, so play-time code
    /// never sees an invalid group.
    pub fn build(self) -> Result<(ClipGroupRegistry, Vec<VolumeGroupConfig>)> {
        let mut groups = Vec::with_capacity(self.clip_groups.len());
        for def in self.clip_groups {
            let mut clips = Vec::with_capacity(def.clips.len());
            for clip in def.clips {
                if !clip.duration_s.is_finite() || clip.duration_s <= 0.0 {
                    return Err(Error::Config(format!(
                        "Clip '{}' in group '{}' has invalid duration: {}",
                        clip.name, def.id, clip.duration_s
                    )));
                }
                clips.push(ClipRef {
                    name: clip.name,
                    duration: Duration::from_secs_f64(clip.duration_s),
                });
            }
            groups.push(ClipGroup {
                id: def.id,
                route: def.route,
                clips,
            });
        }
        let registry = ClipGroupRegistry::new(groups)?;

        let mut seen = HashSet::new();
        for group in &self.volume_groups {
            if group.mixer_params.is_empty() {
                return Err(Error::Config(format!(
                    "Volume group '{}' has no mixer params",
                    group.id
                )));
            }
            if !seen.insert(group.id.clone()) {
                return Err(Error::Config(format!(
                    "Duplicate volume group id: {}",
                    group.id
                )));
            }
        }

        Ok((registry, self.volume_groups))
    }
}
