//! The `Animation` trait shared by every leaf, composite and clip.
//!
//! An animation is a timeline: it knows its natural duration and fill
//! behavior, and from those the default methods derive its state and the local
//! time to evaluate at any global time. Variants only implement
//! [`Animation::value_at`].

use std::rc::Rc;

use crate::time::AnimationTime;
use crate::timing::{AnimationState, FillBehavior};
use crate::value::AnimationValue;
use crate::Result;

/// Animations are immutable during playback and may be referenced by many
/// clips and instances at once.
pub type SharedAnimation<T> = Rc<dyn Animation<T>>;

pub trait Animation<T: AnimationValue> {
    /// What to report once the total duration has elapsed.
    fn fill_behavior(&self) -> FillBehavior;

    /// When true the evaluated value is added to the property's current value
    /// instead of replacing it.
    fn is_additive(&self) -> bool {
        false
    }

    /// Natural length of the animation (may be `AnimationTime::MAX`).
    fn total_duration(&self) -> AnimationTime;

    /// Playback state at `time`.
    fn state(&self, time: AnimationTime) -> AnimationState {
        if time < AnimationTime::ZERO {
            return AnimationState::Scheduled;
        }
        if time > self.total_duration() {
            return match self.fill_behavior() {
                FillBehavior::Hold => AnimationState::Filling,
                FillBehavior::Stop => AnimationState::Stopped,
            };
        }
        AnimationState::Active
    }

    /// Local time to evaluate at, or `None` when the animation is inactive.
    ///
    /// Fails when the timing configuration itself is invalid (e.g. a clip
    /// window whose start lies after its end).
    fn animation_time(&self, time: AnimationTime) -> Result<Option<AnimationTime>> {
        Ok(match self.state(time) {
            AnimationState::Scheduled | AnimationState::Stopped => None,
            AnimationState::Active => Some(time),
            AnimationState::Filling => Some(self.total_duration()),
        })
    }

    /// Evaluate at a global `time`. Inactive animations yield `default_source`.
    fn get_value(
        &self,
        time: AnimationTime,
        default_source: &T,
        default_target: &T,
    ) -> Result<T> {
        match self.animation_time(time)? {
            Some(local) => self.value_at(local, default_source, default_target),
            None => Ok(default_source.clone()),
        }
    }

    /// Evaluate at a local time inside `[0, total_duration]`.
    ///
    /// `default_source`/`default_target` stand in for values the animation
    /// does not define itself (e.g. a From-only animation's target).
    fn value_at(
        &self,
        time: AnimationTime,
        default_source: &T,
        default_target: &T,
    ) -> Result<T>;
}
