//! Easing functions: pure remaps of normalized time used by From/To/By
//! animations.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Remaps normalized time. Must be pure; inputs are normally in [0, 1].
pub trait EasingFunction {
    fn ease(&self, normalized_time: f32) -> f32;
}

impl<F> EasingFunction for F
where
    F: Fn(f32) -> f32,
{
    fn ease(&self, normalized_time: f32) -> f32 {
        self(normalized_time)
    }
}

/// Built-in easing curves.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
    /// CSS-style cubic bezier timing with control points (x1, y1) and (x2, y2).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl EasingFunction for Easing {
    fn ease(&self, t: f32) -> f32 {
        match *self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 1.0 - t;
                    1.0 - 4.0 * u * u * u
                }
            }
            Easing::SineIn => 1.0 - (t * PI * 0.5).cos(),
            Easing::SineOut => (t * PI * 0.5).sin(),
            Easing::SineInOut => 0.5 * (1.0 - (t * PI).cos()),
            Easing::CubicBezier { x1, y1, x2, y2 } => bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x bezier by binary search, then evaluate y.
fn bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        let all = [
            Easing::Linear,
            Easing::QuadraticIn,
            Easing::QuadraticOut,
            Easing::QuadraticInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
            Easing::SineIn,
            Easing::SineOut,
            Easing::SineInOut,
            Easing::CubicBezier {
                x1: 0.42,
                y1: 0.0,
                x2: 0.58,
                y2: 1.0,
            },
        ];
        for easing in all {
            assert!(easing.ease(0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn ease_in_lags_linear() {
        assert!(Easing::QuadraticIn.ease(0.5) < 0.5);
        assert!(Easing::CubicOut.ease(0.5) > 0.5);
    }

    #[test]
    fn closures_are_easing_functions() {
        let square = |t: f32| t * t;
        assert_eq!(square.ease(0.5), 0.25);
    }
}
