//! Piecewise spline curves and paths.
//!
//! A curve is a list of keys sorted by parameter. Each key carries the
//! interpolation used for the segment that starts at it. Outside the key range
//! a curve is constant (first/last point, zero tangent).

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::interp::functions::{add_array, lerp_array, lerp_f32, scale_array};
use crate::timing::find_key_index;

/// Point types a spline can be built from.
pub trait SplinePoint: Copy + Debug + PartialEq + 'static {
    fn zero() -> Self;
    fn lerp(&self, other: &Self, t: f32) -> Self;
    fn sum(&self, other: &Self) -> Self;
    fn scale(&self, factor: f32) -> Self;
}

impl SplinePoint for f32 {
    fn zero() -> Self {
        0.0
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        lerp_f32(*self, *other, t)
    }

    fn sum(&self, other: &Self) -> Self {
        self + other
    }

    fn scale(&self, factor: f32) -> Self {
        self * factor
    }
}

impl<const N: usize> SplinePoint for [f32; N] {
    fn zero() -> Self {
        [0.0; N]
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        lerp_array(self, other, t)
    }

    fn sum(&self, other: &Self) -> Self {
        add_array(self, other)
    }

    fn scale(&self, factor: f32) -> Self {
        scale_array(self, factor)
    }
}

/// Read-only view of a parametric curve.
pub trait Curve<P: SplinePoint> {
    fn point_at(&self, parameter: f32) -> P;

    /// Derivative with respect to the parameter.
    fn tangent_at(&self, parameter: f32) -> P;

    fn key_count(&self) -> usize;

    fn key_parameter(&self, index: usize) -> Option<f32>;

    fn last_parameter(&self) -> Option<f32> {
        match self.key_count() {
            0 => None,
            n => self.key_parameter(n - 1),
        }
    }
}

/// Segment interpolation, stored on the key that starts the segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplineInterpolation {
    /// Hold the left key's point.
    StepLeft,
    /// Left point for the first half of the segment, right point after.
    StepCentered,
    /// Jump to the right key's point.
    StepRight,
    #[default]
    Linear,
    /// Uniform Catmull-Rom through the neighbouring keys.
    CatmullRom,
    /// Cubic Hermite using the keys' explicit tangents.
    Hermite,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey<P> {
    pub parameter: f32,
    pub point: P,
    pub interpolation: SplineInterpolation,
    /// Incoming tangent (Hermite only), in point units per parameter unit.
    pub tangent_in: P,
    /// Outgoing tangent (Hermite only).
    pub tangent_out: P,
}

impl<P: SplinePoint> CurveKey<P> {
    pub fn new(parameter: f32, point: P, interpolation: SplineInterpolation) -> Self {
        Self {
            parameter,
            point,
            interpolation,
            tangent_in: P::zero(),
            tangent_out: P::zero(),
        }
    }

    pub fn with_tangents(mut self, tangent_in: P, tangent_out: P) -> Self {
        self.tangent_in = tangent_in;
        self.tangent_out = tangent_out;
        self
    }
}

/// Curve made of independently interpolated segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseCurve<P> {
    keys: Vec<CurveKey<P>>,
}

/// Scalar curve: parameter on x, value on y.
pub type Curve2F = PiecewiseCurve<[f32; 2]>;
pub type Path2F = PiecewiseCurve<[f32; 2]>;
pub type Path3F = PiecewiseCurve<[f32; 3]>;

impl<P> Default for PiecewiseCurve<P> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl Curve2F {
    /// Build a function curve through `(x, y)` points; x is the parameter.
    pub fn from_xy(points: &[[f32; 2]], interpolation: SplineInterpolation) -> Self {
        let mut curve = Self::default();
        for p in points {
            curve.push(CurveKey::new(p[0], *p, interpolation));
        }
        curve
    }
}

impl<P: SplinePoint> PiecewiseCurve<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: CurveKey<P>) {
        self.keys.push(key);
    }

    pub fn keys(&self) -> &[CurveKey<P>] {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut Vec<CurveKey<P>> {
        &mut self.keys
    }

    /// Stable sort by parameter. NaN parameters sort last.
    pub fn sort(&mut self) {
        self.keys
            .sort_by(|a, b| a.parameter.total_cmp(&b.parameter));
    }

    /// Segment containing `parameter` and the local position in it, or the
    /// clamped key when the parameter is outside the key range.
    fn locate(&self, parameter: f32) -> Locate {
        let n = self.keys.len();
        if n == 0 {
            return Locate::Empty;
        }
        if n == 1 || parameter.is_nan() || parameter <= self.keys[0].parameter {
            return Locate::Key(0);
        }
        if parameter >= self.keys[n - 1].parameter {
            return Locate::Key(n - 1);
        }
        let i = find_key_index(&self.keys, parameter, |k| k.parameter).unwrap_or(0);
        if i + 1 >= n {
            return Locate::Key(n - 1);
        }
        let span = self.keys[i + 1].parameter - self.keys[i].parameter;
        if span <= 0.0 {
            return Locate::Key(i);
        }
        Locate::Segment {
            index: i,
            u: (parameter - self.keys[i].parameter) / span,
            span,
        }
    }

    /// Tangents at both ends of segment `i`, in point units per unit `u`.
    fn segment_tangents(&self, i: usize, span: f32) -> (P, P) {
        let k0 = &self.keys[i];
        let k1 = &self.keys[i + 1];
        match k0.interpolation {
            SplineInterpolation::Hermite => {
                (k0.tangent_out.scale(span), k1.tangent_in.scale(span))
            }
            _ => {
                // Missing neighbours are mirrored across the segment ends.
                let before = match i.checked_sub(1) {
                    Some(j) => self.keys[j].point,
                    None => k0.point.scale(2.0).sum(&k1.point.scale(-1.0)),
                };
                let after = match self.keys.get(i + 2) {
                    Some(k) => k.point,
                    None => k1.point.scale(2.0).sum(&k0.point.scale(-1.0)),
                };
                (
                    k1.point.sum(&before.scale(-1.0)).scale(0.5),
                    after.sum(&k0.point.scale(-1.0)).scale(0.5),
                )
            }
        }
    }
}

enum Locate {
    Empty,
    Key(usize),
    Segment { index: usize, u: f32, span: f32 },
}

fn hermite<P: SplinePoint>(p0: P, m0: P, p1: P, m1: P, u: f32) -> P {
    let u2 = u * u;
    let u3 = u2 * u;
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;
    p0.scale(h00)
        .sum(&m0.scale(h10))
        .sum(&p1.scale(h01))
        .sum(&m1.scale(h11))
}

fn hermite_derivative<P: SplinePoint>(p0: P, m0: P, p1: P, m1: P, u: f32) -> P {
    let u2 = u * u;
    let d00 = 6.0 * u2 - 6.0 * u;
    let d10 = 3.0 * u2 - 4.0 * u + 1.0;
    let d01 = -6.0 * u2 + 6.0 * u;
    let d11 = 3.0 * u2 - 2.0 * u;
    p0.scale(d00)
        .sum(&m0.scale(d10))
        .sum(&p1.scale(d01))
        .sum(&m1.scale(d11))
}

impl<P: SplinePoint> Curve<P> for PiecewiseCurve<P> {
    fn point_at(&self, parameter: f32) -> P {
        let (i, u, span) = match self.locate(parameter) {
            Locate::Empty => return P::zero(),
            Locate::Key(k) => return self.keys[k].point,
            Locate::Segment { index, u, span } => (index, u, span),
        };
        let k0 = &self.keys[i];
        let k1 = &self.keys[i + 1];
        match k0.interpolation {
            SplineInterpolation::StepLeft => k0.point,
            SplineInterpolation::StepRight => k1.point,
            SplineInterpolation::StepCentered => {
                if u < 0.5 {
                    k0.point
                } else {
                    k1.point
                }
            }
            SplineInterpolation::Linear => k0.point.lerp(&k1.point, u),
            SplineInterpolation::CatmullRom | SplineInterpolation::Hermite => {
                let (m0, m1) = self.segment_tangents(i, span);
                hermite(k0.point, m0, k1.point, m1, u)
            }
        }
    }

    fn tangent_at(&self, parameter: f32) -> P {
        let (i, u, span) = match self.locate(parameter) {
            Locate::Segment { index, u, span } => (index, u, span),
            _ => return P::zero(),
        };
        let k0 = &self.keys[i];
        let k1 = &self.keys[i + 1];
        match k0.interpolation {
            SplineInterpolation::StepLeft
            | SplineInterpolation::StepCentered
            | SplineInterpolation::StepRight => P::zero(),
            SplineInterpolation::Linear => k1.point.sum(&k0.point.scale(-1.0)).scale(1.0 / span),
            SplineInterpolation::CatmullRom | SplineInterpolation::Hermite => {
                let (m0, m1) = self.segment_tangents(i, span);
                hermite_derivative(k0.point, m0, k1.point, m1, u).scale(1.0 / span)
            }
        }
    }

    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn key_parameter(&self, index: usize) -> Option<f32> {
        self.keys.get(index).map(|k| k.parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn empty_curve_is_zero() {
        let curve = Path3F::new();
        assert_eq!(curve.point_at(1.0), [0.0; 3]);
        assert_eq!(curve.tangent_at(1.0), [0.0; 3]);
        assert_eq!(curve.last_parameter(), None);
    }

    #[test]
    fn step_variants() {
        let mk = |i| Curve2F::from_xy(&[[0.0, 0.0], [2.0, 10.0]], i);
        assert_eq!(mk(SplineInterpolation::StepLeft).point_at(1.5)[1], 0.0);
        assert_eq!(mk(SplineInterpolation::StepRight).point_at(0.5)[1], 10.0);
        assert_eq!(mk(SplineInterpolation::StepCentered).point_at(0.9)[1], 0.0);
        assert_eq!(mk(SplineInterpolation::StepCentered).point_at(1.1)[1], 10.0);
    }

    #[test]
    fn catmull_rom_passes_through_keys_and_matches_straight_lines() {
        let curve = Curve2F::from_xy(
            &[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
            SplineInterpolation::CatmullRom,
        );
        assert!(approx(curve.point_at(1.0)[1], 1.0));
        assert!(approx(curve.point_at(1.5)[1], 1.5));
        assert!(approx(curve.tangent_at(1.5)[1], 1.0));
    }

    #[test]
    fn hermite_uses_key_tangents() {
        let mut curve = PiecewiseCurve::<f32>::new();
        curve.push(CurveKey::new(0.0, 0.0, SplineInterpolation::Hermite).with_tangents(0.0, 0.0));
        curve.push(CurveKey::new(1.0, 1.0, SplineInterpolation::Hermite).with_tangents(0.0, 0.0));
        // smoothstep
        assert!(approx(curve.point_at(0.5), 0.5));
        assert!(approx(curve.point_at(0.25), 0.15625));
        assert!(approx(curve.tangent_at(1e-7), 0.0));
    }

    #[test]
    fn constant_outside_range() {
        let curve = Curve2F::from_xy(&[[1.0, 5.0], [2.0, 7.0]], SplineInterpolation::Linear);
        assert_eq!(curve.point_at(-3.0), [1.0, 5.0]);
        assert_eq!(curve.point_at(9.0), [2.0, 7.0]);
        assert_eq!(curve.tangent_at(9.0), [0.0, 0.0]);
        assert_eq!(curve.last_parameter(), Some(2.0));
    }
}
