//! Manager configuration.

use serde::{Deserialize, Serialize};

/// Sizing hints and lifecycle policy for [`crate::AnimationManager`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity of each property's composition chain.
    pub chain_capacity: usize,

    /// Maximum events retained per tick; further events are dropped.
    pub max_events_per_tick: usize,

    /// Remove instances from their chain once they stop.
    pub detach_stopped: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_capacity: 4,
            max_events_per_tick: 1024,
            detach_stopped: true,
        }
    }
}
