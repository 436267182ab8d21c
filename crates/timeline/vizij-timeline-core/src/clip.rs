//! Animation clips: play a window of another animation with delay, speed,
//! looping and fill behavior.
//!
//! Outer time `t` maps to the wrapped animation's time as follows:
//! 1. `t - delay < 0` is inactive;
//! 2. elapsed = `(t - delay) * speed`, clamped to the duration when holding;
//! 3. position = `clip_start + clip_offset + elapsed`, mapped into
//!    `[clip_start, clip_end]` by the loop behavior (optionally reversed);
//! 4. with `CycleOffset` every completed cycle adds the change over one cycle.

use std::fmt;
use std::rc::Rc;

use crate::animation::{Animation, SharedAnimation};
use crate::error::AnimationError;
use crate::time::AnimationTime;
use crate::timing::{loop_parameter, AnimationState, FillBehavior, LoopBehavior};
use crate::value::AnimationValue;
use crate::Result;

/// A timeline window over a shared animation.
#[derive(Clone)]
pub struct AnimationClip<T: AnimationValue> {
    animation: SharedAnimation<T>,
    pub delay: AnimationTime,
    speed: f64,
    /// Start of the played window; `None` = 0.
    pub clip_start: Option<AnimationTime>,
    /// End of the played window; `None` = the wrapped animation's duration.
    pub clip_end: Option<AnimationTime>,
    /// Shift of the playback start inside the window.
    pub clip_offset: AnimationTime,
    pub is_clip_reversed: bool,
    pub loop_behavior: LoopBehavior,
    pub fill_behavior: FillBehavior,
    duration: Option<AnimationTime>,
}

impl<T: AnimationValue> fmt::Debug for AnimationClip<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationClip")
            .field("delay", &self.delay)
            .field("speed", &self.speed)
            .field("clip_start", &self.clip_start)
            .field("clip_end", &self.clip_end)
            .field("clip_offset", &self.clip_offset)
            .field("is_clip_reversed", &self.is_clip_reversed)
            .field("loop_behavior", &self.loop_behavior)
            .field("fill_behavior", &self.fill_behavior)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl<T: AnimationValue> AnimationClip<T> {
    pub fn new(animation: SharedAnimation<T>) -> Self {
        Self {
            animation,
            delay: AnimationTime::ZERO,
            speed: 1.0,
            clip_start: None,
            clip_end: None,
            clip_offset: AnimationTime::ZERO,
            is_clip_reversed: false,
            loop_behavior: LoopBehavior::Constant,
            fill_behavior: FillBehavior::Hold,
            duration: None,
        }
    }

    /// Wrap an owned animation.
    pub fn wrap(animation: impl Animation<T> + 'static) -> Self {
        Self::new(Rc::new(animation))
    }

    pub fn animation(&self) -> &SharedAnimation<T> {
        &self.animation
    }

    pub fn with_delay(mut self, delay: AnimationTime) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Result<Self> {
        self.set_speed(speed)?;
        Ok(self)
    }

    pub fn with_window(mut self, start: AnimationTime, end: AnimationTime) -> Self {
        self.clip_start = Some(start);
        self.clip_end = Some(end);
        self
    }

    pub fn with_offset(mut self, offset: AnimationTime) -> Self {
        self.clip_offset = offset;
        self
    }

    pub fn reversed(mut self, is_clip_reversed: bool) -> Self {
        self.is_clip_reversed = is_clip_reversed;
        self
    }

    pub fn with_loop_behavior(mut self, loop_behavior: LoopBehavior) -> Self {
        self.loop_behavior = loop_behavior;
        self
    }

    pub fn with_fill_behavior(mut self, fill_behavior: FillBehavior) -> Self {
        self.fill_behavior = fill_behavior;
        self
    }

    pub fn with_duration(mut self, duration: Option<AnimationTime>) -> Result<Self> {
        self.set_duration(duration)?;
        Ok(self)
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Speed must be finite and non-negative.
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
    pub fn duration(&self) -> Option<AnimationTime> {
        self.duration
    }

    /// Playback length in local (pre-speed) time. `Some(AnimationTime::MAX)`
    /// plays forever; `None` derives it from the window and loop behavior.
    pub fn set_duration(&mut self, duration: Option<AnimationTime>) -> Result<()> {
        if let Some(d) = duration {
            if d < AnimationTime::ZERO {
                return Err(AnimationError::NegativeDuration { ticks: d.ticks() });
            }
        }
        self.duration = duration;
        Ok(())
    }

    fn window(&self) -> (AnimationTime, AnimationTime) {
        let start = self.clip_start.unwrap_or(AnimationTime::ZERO);
        let end = self
            .clip_end
            .unwrap_or_else(|| self.animation.total_duration());
        (start, end)
    }

    fn checked_window(&self) -> Result<(AnimationTime, AnimationTime)> {
        let (start, end) = self.window();
        if start > end {
            return Err(AnimationError::InvalidClipWindow {
                start_ticks: start.ticks(),
                end_ticks: end.ticks(),
            });
        }
        Ok((start, end))
    }

    /// Local elapsed time is clamped to this once the clip has run out.
    fn playback_limit(&self, window_length: AnimationTime) -> Option<AnimationTime> {
        match self.duration {
            Some(AnimationTime::MAX) => None,
            Some(d) => Some(d),
            None if self.loop_behavior.repeats() => None,
            None => Some(window_length),
        }
    }

    /// Wrapped-animation time and elapsed cycle count at outer `time`, or
    /// `None` while inactive.
    fn map_time(&self, time: AnimationTime) -> Result<Option<(AnimationTime, i64)>> {
        if !self.state(time).is_producing() {
            return Ok(None);
        }
        let (start, end) = self.checked_window()?;

        let mut elapsed = (time - self.delay).mul_f64(self.speed);
        if let Some(limit) = self.playback_limit(end - start) {
            if elapsed > limit {
                elapsed = limit;
            }
        }

        let position = start + self.clip_offset + elapsed;
        let (mut local, cycles) = loop_parameter(position, start, end, self.loop_behavior);
        if self.is_clip_reversed {
            local = end - (local - start);
        }
        Ok(Some((local, cycles)))
    }

    fn evaluate(&self, time: AnimationTime, source: &T, target: &T) -> Result<T> {
        let Some((local, cycles)) = self.map_time(time)? else {
            return Ok(source.clone());
        };
        let value = self.animation.get_value(local, source, target)?;
        if self.loop_behavior != LoopBehavior::CycleOffset || cycles == 0 {
            return Ok(value);
        }

        let (start, end) = self.window();
        let (first, last) = if self.is_clip_reversed {
            (end, start)
        } else {
            (start, end)
        };
        let first = self.animation.get_value(first, source, target)?;
        let last = self.animation.get_value(last, source, target)?;
        let per_cycle = first.inverse().add(&last);
        let offset = per_cycle.multiply(cycles as f32);
        first.recycle();
        last.recycle();
        Ok(value.add(&offset))
    }
}

impl<T: AnimationValue> Animation<T> for AnimationClip<T> {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.animation.is_additive()
    }

    fn total_duration(&self) -> AnimationTime {
        if self.speed == 0.0 {
            return AnimationTime::MAX;
        }
        let length = match self.duration {
            Some(AnimationTime::MAX) => return AnimationTime::MAX,
            Some(d) => d,
            None if self.loop_behavior.repeats() => return AnimationTime::MAX,
            None => {
                let (start, end) = self.window();
                if start > end {
                    AnimationTime::ZERO
                } else {
                    end - start
                }
            }
        };
        self.delay + length.div_f64(self.speed)
    }

    fn state(&self, time: AnimationTime) -> AnimationState {
        if time < self.delay {
            return AnimationState::Scheduled;
        }
        if time > self.total_duration() {
            return match self.fill_behavior {
                FillBehavior::Hold => AnimationState::Filling,
                FillBehavior::Stop => AnimationState::Stopped,
            };
        }
        AnimationState::Active
    }

    fn animation_time(&self, time: AnimationTime) -> Result<Option<AnimationTime>> {
        Ok(self.map_time(time)?.map(|(local, _)| local))
    }

    fn get_value(&self, time: AnimationTime, source: &T, target: &T) -> Result<T> {
        self.evaluate(time, source, target)
    }

    /// Clips have no separate local timeline; this is [`Animation::get_value`].
    fn value_at(&self, time: AnimationTime, source: &T, target: &T) -> Result<T> {
        self.evaluate(time, source, target)
    }
}
