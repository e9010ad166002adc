//! Clip group registry
//!
//! Static configuration mapping group ids to their interchangeable clip
//! variants and mixer route. Read-only after construction; every play
//! trigger draws one variant uniformly at random.

use crate::error::{Error, Result};
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;

/// Handle to a decoded audio asset with a known duration
#[derive(Debug, Clone)]
pub struct ClipRef {
    /// Asset name, unique within its group
    pub name: String,
    /// Playback duration of the decoded asset
    pub duration: Duration,
}

/// A named bucket of interchangeable clips sharing one mixer route
#[derive(Debug, Clone)]
pub struct ClipGroup {
    /// Unique group id
    pub id: String,
    /// Mixer route all instances of this group are sent to
    pub route: String,
    /// Clip variants, non-empty
    pub clips: Vec<ClipRef>,
}

impl ClipGroup {
    /// Draw one clip variant uniformly at random
    ///
    /// Construction guarantees `clips` is non-empty, so the draw cannot go
    /// out of range. Consecutive draws may return different variants.
    pub fn choose_clip(&self) -> &ClipRef {
        let idx = rand::thread_rng().gen_range(0..self.clips.len());
        &self.clips[idx]
    }
}

/// Registry of clip groups, keyed by group id
pub struct ClipGroupRegistry {
    groups: HashMap<String, ClipGroup>,
}

impl ClipGroupRegistry {
    /// Build a registry, validating every group
    ///
    /// Rejects empty groups and duplicate ids at load time so a play
    /// request can never select from a zero-clip group.
    pub fn new(groups: Vec<ClipGroup>) -> Result<Self> {
        let mut map = HashMap::with_capacity(groups.len());
        for group in groups {
            if group.clips.is_empty() {
                return Err(Error::EmptyGroup(group.id));
            }
            if map.contains_key(&group.id) {
                return Err(Error::Config(format!(
                    "Duplicate clip group id: {}",
                    group.id
                )));
            }
            map.insert(group.id.clone(), group);
        }
        Ok(Self { groups: map })
    }

    /// Look up a clip group by id
    pub fn lookup(&self, group_id: &str) -> Option<&ClipGroup> {
        self.groups.get(group_id)
    }

    /// Number of registered groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no groups are registered
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate registered group ids
    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}
