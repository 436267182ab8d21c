//! Animations that sample a curve.
//!
//! The curve parameter is measured in seconds: local time `t` samples the curve
//! at `start_parameter + t`. A NaN start parameter means 0 and a NaN end
//! parameter means the last key's parameter.

use std::marker::PhantomData;

use crate::animation::Animation;
use crate::curve::{Curve, Curve2F, PiecewiseCurve, SplinePoint};
use crate::error::AnimationError;
use crate::time::AnimationTime;
use crate::timing::FillBehavior;
use crate::value::AnimationValue;
use crate::Result;

/// Played parameter range shared by both curve animations.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ParameterRange {
    start: f32,
    end: f32,
}

impl ParameterRange {
    fn resolve<P: SplinePoint, C: Curve<P>>(start: f32, end: f32, curve: &C) -> Option<Self> {
        let last = curve.last_parameter()?;
        Some(Self {
            start: if start.is_nan() { 0.0 } else { start },
            end: if end.is_nan() { last } else { end },
        })
    }

    fn validate(self) -> Result<Self> {
        if self.start > self.end {
            return Err(AnimationError::InvalidParameterRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(self)
    }

    fn duration(&self) -> AnimationTime {
        if self.start > self.end {
            return AnimationTime::ZERO;
        }
        AnimationTime::from_seconds(f64::from(self.end) - f64::from(self.start))
            .unwrap_or(AnimationTime::MAX)
    }

    fn sample(&self, time: AnimationTime) -> f32 {
        (f64::from(self.start) + time.as_seconds()) as f32
    }
}

/// Scalar animation driven by a function curve; the value is the curve's Y.
#[derive(Clone, Debug)]
pub struct AnimationCurve<C = Curve2F> {
    pub curve: C,
    pub start_parameter: f32,
    pub end_parameter: f32,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl<C: Curve<[f32; 2]>> AnimationCurve<C> {
    pub fn new(curve: C) -> Self {
        Self {
            curve,
            start_parameter: f32::NAN,
            end_parameter: f32::NAN,
            fill_behavior: FillBehavior::Hold,
            is_additive: false,
        }
    }

    pub fn with_range(mut self, start_parameter: f32, end_parameter: f32) -> Self {
        self.start_parameter = start_parameter;
        self.end_parameter = end_parameter;
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

    fn range(&self) -> Option<ParameterRange> {
        ParameterRange::resolve::<[f32; 2], C>(
            self.start_parameter,
            self.end_parameter,
            &self.curve,
        )
    }
}

impl<C: Curve<[f32; 2]>> Animation<f32> for AnimationCurve<C> {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        self.range()
            .map(|r| r.duration())
            .unwrap_or(AnimationTime::ZERO)
    }

    fn value_at(
        &self,
        time: AnimationTime,
        default_source: &f32,
        _default_target: &f32,
    ) -> Result<f32> {
        let Some(range) = self.range() else {
            return Ok(*default_source);
        };
        let range = range.validate()?;
        Ok(self.curve.point_at(range.sample(time))[1])
    }
}

/// Moves along a path, returning either the point or the tangent.
#[derive(Clone, Debug)]
pub struct PathAnimation<P, C = PiecewiseCurve<P>> {
    pub path: C,
    pub start_parameter: f32,
    pub end_parameter: f32,
    /// Report the path tangent instead of the position.
    pub returns_tangent: bool,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
    _point: PhantomData<P>,
}

impl<P, C> PathAnimation<P, C>
where
    P: SplinePoint + AnimationValue,
    C: Curve<P>,
{
    pub fn new(path: C) -> Self {
        Self {
            path,
            start_parameter: f32::NAN,
            end_parameter: f32::NAN,
            returns_tangent: false,
            fill_behavior: FillBehavior::Hold,
            is_additive: false,
            _point: PhantomData,
        }
    }

    pub fn with_range(mut self, start_parameter: f32, end_parameter: f32) -> Self {
        self.start_parameter = start_parameter;
        self.end_parameter = end_parameter;
        self
    }

    pub fn returning_tangent(mut self, returns_tangent: bool) -> Self {
        self.returns_tangent = returns_tangent;
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

    fn range(&self) -> Option<ParameterRange> {
        ParameterRange::resolve::<P, C>(self.start_parameter, self.end_parameter, &self.path)
    }
}

impl<P, C> Animation<P> for PathAnimation<P, C>
where
    P: SplinePoint + AnimationValue,
    C: Curve<P>,
{
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        self.range()
            .map(|r| r.duration())
            .unwrap_or(AnimationTime::ZERO)
    }

    fn value_at(&self, time: AnimationTime, default_source: &P, _default_target: &P) -> Result<P> {
        let Some(range) = self.range() else {
            return Ok(default_source.clone());
        };
        let parameter = range.validate()?.sample(time);
        if self.returns_tangent {
            Ok(self.path.tangent_at(parameter))
        } else {
            Ok(self.path.point_at(parameter))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::SplineInterpolation;

    #[test]
    fn natural_range_covers_the_curve() {
        let curve = Curve2F::from_xy(&[[0.0, 0.0], [2.0, 4.0]], SplineInterpolation::Linear);
        let anim = AnimationCurve::new(curve);
        assert_eq!(anim.total_duration(), AnimationTime::from_secs(2));
        let v = anim
            .value_at(AnimationTime::from_secs(1), &0.0, &0.0)
            .unwrap();
        assert!((v - 2.0).abs() < 1e-6);
    }

    #[test]
    fn inverted_range_fails_on_evaluation() {
        let curve = Curve2F::from_xy(&[[0.0, 0.0], [2.0, 4.0]], SplineInterpolation::Linear);
        let anim = AnimationCurve::new(curve).with_range(1.5, 0.5);
        assert_eq!(anim.total_duration(), AnimationTime::ZERO);
        let err = anim.value_at(AnimationTime::ZERO, &0.0, &0.0).unwrap_err();
        assert!(matches!(err, AnimationError::InvalidParameterRange { .. }));
    }

    #[test]
    fn empty_path_yields_default_source() {
        let anim = PathAnimation::<[f32; 3]>::new(PiecewiseCurve::new());
        assert_eq!(anim.total_duration(), AnimationTime::ZERO);
        let v = anim
            .value_at(AnimationTime::ZERO, &[1.0, 2.0, 3.0], &[0.0; 3])
            .unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);
    }
}
