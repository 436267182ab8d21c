//! Per-tick results of [`crate::AnimationManager::update`].
//!
//! Property values are written straight into the properties; outputs only
//! report which chains were written and the lifecycle events of the tick.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::ids::{ChainId, InstanceId};
use crate::time::AnimationTime;

/// One property written this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub chain: ChainId,
    /// Instances that contributed to the written value.
    pub contributors: usize,
}

/// Lifecycle signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationEvent {
    /// The instance left `Scheduled` and produced its first value.
    Started { instance: InstanceId },
    /// The instance ran past its duration (filling or stopped).
    Completed {
        instance: InstanceId,
        time: AnimationTime,
    },
    /// The instance was stopped and will not contribute again.
    Stopped { instance: InstanceId },
    /// The instance failed to evaluate and was stopped; the rest of its
    /// chain was still composed and written.
    Failed {
        instance: InstanceId,
        chain: ChainId,
        error: AnimationError,
    },
    /// The chain's property has no instances left and was cleared.
    PropertyReleased { chain: ChainId },
}

/// Outputs returned by `AnimationManager::update()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<AnimationEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: AnimationEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
