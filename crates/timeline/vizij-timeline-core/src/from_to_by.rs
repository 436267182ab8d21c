//! From/To/By animation: a single eased segment between two resolved values.

use std::fmt;
use std::rc::Rc;

use crate::animation::Animation;
use crate::easing::EasingFunction;
use crate::error::AnimationError;
use crate::time::AnimationTime;
use crate::timing::FillBehavior;
use crate::value::AnimationValue;
use crate::Result;

/// Animates from a source to a target value over `duration`.
///
/// The effective (source, target) pair is resolved from whichever of
/// `from`/`to`/`by` are set, in this priority:
///
/// | set        | source           | target            |
/// |------------|------------------|-------------------|
/// | from, to   | from             | to                |
/// | from, by   | from             | from + by         |
/// | from       | from             | default target    |
/// | to         | default source   | to                |
/// | by         | default source   | default source + by |
/// | (none)     | default source   | default target    |
#[derive(Clone)]
pub struct FromToByAnimation<T: AnimationValue> {
    pub from: Option<T>,
    pub to: Option<T>,
    pub by: Option<T>,
    duration: AnimationTime,
    pub easing: Option<Rc<dyn EasingFunction>>,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl<T: AnimationValue> fmt::Debug for FromToByAnimation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromToByAnimation")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("by", &self.by)
            .field("duration", &self.duration)
            .field("eased", &self.easing.is_some())
            .field("fill_behavior", &self.fill_behavior)
            .field("is_additive", &self.is_additive)
            .finish()
    }
}

impl<T: AnimationValue> Default for FromToByAnimation<T> {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            by: None,
            duration: AnimationTime::from_secs(1),
            easing: None,
            fill_behavior: FillBehavior::Hold,
            is_additive: false,
        }
    }
}

impl<T: AnimationValue> FromToByAnimation<T> {
    /// One second, no values set, hold at the end.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from(mut self, from: T) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: T) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_by(mut self, by: T) -> Self {
        self.by = Some(by);
        self
    }

    pub fn with_duration(mut self, duration: AnimationTime) -> Result<Self> {
        self.set_duration(duration)?;
        Ok(self)
    }

    pub fn with_easing(mut self, easing: impl EasingFunction + 'static) -> Self {
        self.easing = Some(Rc::new(easing));
        self
    }

    pub fn with_fill_behavior(mut self, fill_behavior: FillBehavior) -> Self {
        self.fill_behavior = fill_behavior;
        self
    }

    pub fn additive(mut self, is_additive: bool) -> Self {
        self.is_additive = is_additive;
        self
    }

    #[inline]
    pub fn duration(&self) -> AnimationTime {
        self.duration
    }

    /// Fails for negative durations; the previous value is kept.
    pub fn set_duration(&mut self, duration: AnimationTime) -> Result<()> {
        if duration < AnimationTime::ZERO {
            return Err(AnimationError::NegativeDuration {
                ticks: duration.ticks(),
            });
        }
        self.duration = duration;
        Ok(())
    }

    fn resolve(&self, default_source: &T, default_target: &T) -> (T, T) {
        match (&self.from, &self.to, &self.by) {
            (Some(from), Some(to), _) => (from.clone(), to.clone()),
            (Some(from), None, Some(by)) => (from.clone(), from.add(by)),
            (Some(from), None, None) => (from.clone(), default_target.clone()),
            (None, Some(to), _) => (default_source.clone(), to.clone()),
            (None, None, Some(by)) => (default_source.clone(), default_source.add(by)),
            (None, None, None) => (default_source.clone(), default_target.clone()),
        }
    }

    /// Normalized progress in [0, 1] before easing.
    fn normalized_time(&self, time: AnimationTime) -> f32 {
        if self.duration == AnimationTime::ZERO {
            return 1.0;
        }
        if self.duration == AnimationTime::MAX {
            return 0.0;
        }
        (time.ratio(self.duration) as f32).clamp(0.0, 1.0)
    }
}

impl<T: AnimationValue> Animation<T> for FromToByAnimation<T> {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        self.duration
    }

    fn value_at(
        &self,
        time: AnimationTime,
        default_source: &T,
        default_target: &T,
    ) -> Result<T> {
        let (source, target) = self.resolve(default_source, default_target);
        let mut parameter = self.normalized_time(time);
        if let Some(easing) = &self.easing {
            parameter = easing.ease(parameter);
        }
        if parameter == 0.0 {
            return Ok(source);
        }
        if parameter == 1.0 {
            return Ok(target);
        }
        Ok(source.interpolate(&target, parameter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_duration_is_rejected() {
        let mut anim = FromToByAnimation::<f32>::new();
        let err = anim
            .set_duration(AnimationTime::from_secs(-1))
            .unwrap_err();
        assert!(matches!(err, AnimationError::NegativeDuration { .. }));
        assert_eq!(anim.duration(), AnimationTime::from_secs(1));
    }

    #[test]
    fn resolution_priority() {
        let src = 1.0f32;
        let dst = 2.0f32;
        let base = FromToByAnimation::<f32>::new();
        assert_eq!(base.resolve(&src, &dst), (1.0, 2.0));
        assert_eq!(base.clone().with_by(5.0).resolve(&src, &dst), (1.0, 6.0));
        assert_eq!(base.clone().with_to(9.0).resolve(&src, &dst), (1.0, 9.0));
        assert_eq!(
            base.clone().with_to(9.0).with_by(5.0).resolve(&src, &dst),
            (1.0, 9.0)
        );
        assert_eq!(base.clone().with_from(3.0).resolve(&src, &dst), (3.0, 2.0));
        assert_eq!(
            base.clone().with_from(3.0).with_by(5.0).resolve(&src, &dst),
            (3.0, 8.0)
        );
        assert_eq!(
            base.with_from(3.0).with_to(4.0).with_by(5.0).resolve(&src, &dst),
            (3.0, 4.0)
        );
    }

    #[test]
    fn zero_and_infinite_durations() {
        let jump = FromToByAnimation::new()
            .with_from(0.0f32)
            .with_to(10.0)
            .with_duration(AnimationTime::ZERO)
            .unwrap();
        assert_eq!(jump.value_at(AnimationTime::ZERO, &0.0, &0.0).unwrap(), 10.0);

        let never = FromToByAnimation::new()
            .with_from(0.0f32)
            .with_to(10.0)
            .with_duration(AnimationTime::MAX)
            .unwrap();
        assert_eq!(
            never.value_at(AnimationTime::from_secs(1000), &0.0, &0.0).unwrap(),
            0.0
        );
    }
}
