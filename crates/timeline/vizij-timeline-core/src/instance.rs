//! Animation instances: the runtime cursor of one playing animation and the
//! weighted blend of its value into a property's composed value.

use std::fmt;

use crate::animation::SharedAnimation;
use crate::error::AnimationError;
use crate::ids::InstanceId;
use crate::time::AnimationTime;
use crate::timing::AnimationState;
use crate::value::AnimationValue;
use crate::Result;

/// Playback state of a shared animation.
///
/// The instance owns the time cursor; the animation itself stays immutable and
/// may back many instances at once.
pub struct AnimationInstance<T: AnimationValue> {
    id: InstanceId,
    animation: SharedAnimation<T>,
    time: Option<AnimationTime>,
    weight: f32,
    speed: f64,
    is_paused: bool,
    is_stopped: bool,
    last_state: AnimationState,
}

impl<T: AnimationValue> fmt::Debug for AnimationInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationInstance")
            .field("id", &self.id)
            .field("time", &self.time)
            .field("weight", &self.weight)
            .field("speed", &self.speed)
            .field("is_paused", &self.is_paused)
            .field("is_stopped", &self.is_stopped)
            .finish_non_exhaustive()
    }
}

impl<T: AnimationValue> AnimationInstance<T> {
    /// A new, not yet started instance with full weight and unit speed.
    pub fn new(id: InstanceId, animation: SharedAnimation<T>) -> Self {
        Self {
            id,
            animation,
            time: None,
            weight: 1.0,
            speed: 1.0,
            is_paused: false,
            is_stopped: false,
            last_state: AnimationState::Scheduled,
        }
    }

    #[inline]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn animation(&self) -> &SharedAnimation<T> {
        &self.animation
    }

    /// `None` until the instance is started.
    #[inline]
    pub fn time(&self) -> Option<AnimationTime> {
        self.time
    }

    pub fn set_time(&mut self, time: Option<AnimationTime>) {
        self.time = time;
    }

    /// Put the cursor at zero. Restarting a stopped instance is allowed.
    pub fn start(&mut self) {
        self.time = Some(AnimationTime::ZERO);
        self.is_stopped = false;
        self.last_state = AnimationState::Scheduled;
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Weight must lie in `[0, 1]`; NaN is rejected.
    pub fn set_weight(&mut self, weight: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(AnimationError::WeightOutOfRange { weight });
        }
        self.weight = weight;
        Ok(())
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Playback rate of the cursor; finite and non-negative.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(AnimationError::InvalidSpeed {
                speed: speed as f32,
            });
        }
        self.speed = speed;
        Ok(())
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn pause(&mut self) {
        self.is_paused = true;
    }

    pub fn resume(&mut self) {
        self.is_paused = false;
    }

    /// Stop for good; the instance contributes nothing afterwards.
    pub fn stop(&mut self) {
        self.is_stopped = true;
    }

    /// True after an explicit [`AnimationInstance::stop`].
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    #[inline]
    pub fn is_additive(&self) -> bool {
        self.animation.is_additive()
    }

    pub fn state(&self) -> AnimationState {
        if self.is_stopped {
            return AnimationState::Stopped;
        }
        match self.time {
            None => AnimationState::Scheduled,
            Some(time) => self.animation.state(time),
        }
    }

    /// Move the cursor by `dt` scaled by speed. Returns the state before and
    /// after this step (the "before" state is the one seen by the previous
    /// step, so explicit starts and stops are reported once).
    pub fn advance(&mut self, dt: AnimationTime) -> (AnimationState, AnimationState) {
        if !self.is_paused && !self.is_stopped {
            if let Some(time) = self.time {
                self.time = Some(time + dt.mul_f64(self.speed));
            }
        }
        let previous = self.last_state;
        self.last_state = self.state();
        (previous, self.last_state)
    }

    /// Unweighted value at the current time, or `None` when not producing.
    pub fn raw_value(&self, current: &T, base: &T) -> Result<Option<T>> {
        let Some(time) = self.time else {
            return Ok(None);
        };
        if !self.state().is_producing() {
            return Ok(None);
        }
        self.animation.get_value(time, current, base).map(Some)
    }

    /// Blend this instance into `current`.
    ///
    /// `current` is the value composed so far (and the default source of the
    /// animation), `base` the property's base value (the default target).
    pub fn compose(&self, current: &T, base: &T) -> Result<T> {
        let Some(raw) = self.raw_value(current, base)? else {
            return Ok(current.clone());
        };
        let weight = self.weight;
        if self.is_additive() {
            if weight == 0.0 {
                return Ok(current.clone());
            }
            if weight == 1.0 {
                return Ok(current.add(&raw));
            }
            return Ok(current.add(&raw.multiply(weight)));
        }
        if weight == 0.0 {
            return Ok(current.clone());
        }
        if weight == 1.0 {
            return Ok(raw);
        }
        Ok(current.interpolate(&raw, weight))
    }
}
