//! Value traits: the per-type operation table that keeps the animation core
//! generic over what it animates.
//!
//! Implemented for `f32`, `[f32; N]` vectors, [`Quat`] rotations and
//! [`SrtTransform`] scale/rotation/translation aggregates.
//!
//! `add(a, b)` always means "apply `b` after `a`". For vectors that is the
//! plain sum; for rotations it is the product `b * a`, which does not commute.
//! Cycle-offset looping and additive blending both depend on this order.

use serde::{Deserialize, Serialize};

use crate::interp::functions::{
    add_array, lerp_array, lerp_f32, quat_from_axis_angle, quat_inverse, quat_mul, quat_pow,
    rotate_vec3, scale_array, slerp_quat,
};

/// Operation table for an animatable value type.
pub trait AnimationValue: Clone + std::fmt::Debug + PartialEq + 'static {
    /// Identity under [`AnimationValue::add`].
    fn identity() -> Self;

    /// A zero/identity value with the same shape as `reference`.
    fn create(reference: &Self) -> Self {
        let _ = reference;
        Self::identity()
    }

    /// Hand a value back once it is no longer needed. Built-in types own no
    /// pooled resources, so this only drops the value.
    fn recycle(self) {}

    /// Interpolate from `self` towards `target`. `parameter` is not clamped.
    fn interpolate(&self, target: &Self, parameter: f32) -> Self;

    /// `other` applied after `self`.
    fn add(&self, other: &Self) -> Self;

    /// Scale by a factor (rotations scale their angle).
    fn multiply(&self, factor: f32) -> Self;

    /// Inverse under [`AnimationValue::add`].
    fn inverse(&self) -> Self;
}

impl AnimationValue for f32 {
    fn identity() -> Self {
        0.0
    }

    fn interpolate(&self, target: &Self, parameter: f32) -> Self {
        lerp_f32(*self, *target, parameter)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn multiply(&self, factor: f32) -> Self {
        self * factor
    }

    fn inverse(&self) -> Self {
        -self
    }
}

impl<const N: usize> AnimationValue for [f32; N] {
    fn identity() -> Self {
        [0.0; N]
    }

    fn interpolate(&self, target: &Self, parameter: f32) -> Self {
        lerp_array(self, target, parameter)
    }

    fn add(&self, other: &Self) -> Self {
        add_array(self, other)
    }

    fn multiply(&self, factor: f32) -> Self {
        scale_array(self, factor)
    }

    fn inverse(&self) -> Self {
        scale_array(self, -1.0)
    }
}

/// Rotation quaternion stored as `[x, y, z, w]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat(pub [f32; 4]);

impl Quat {
    pub const IDENTITY: Self = Self([0.0, 0.0, 0.0, 1.0]);

    #[inline]
    pub const fn from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }

    /// Rotation about a unit axis by `angle` radians.
    #[inline]
    pub fn from_axis_angle(axis: [f32; 3], angle: f32) -> Self {
        Self(quat_from_axis_angle(axis, angle))
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.0[2]
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.0[3]
    }

    /// Rotate a vector by this (unit) quaternion.
    #[inline]
    pub fn rotate(&self, v: [f32; 3]) -> [f32; 3] {
        rotate_vec3(self.0, v)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AnimationValue for Quat {
    fn identity() -> Self {
        Self::IDENTITY
    }

    fn interpolate(&self, target: &Self, parameter: f32) -> Self {
        Self(slerp_quat(self.0, target.0, parameter))
    }

    fn add(&self, other: &Self) -> Self {
        Self(quat_mul(other.0, self.0))
    }

    fn multiply(&self, factor: f32) -> Self {
        Self(quat_pow(self.0, factor))
    }

    fn inverse(&self) -> Self {
        Self(quat_inverse(self.0))
    }
}

/// Scale, rotation and translation applied in that order to a point:
/// `p' = rotation * (scale * p) + translation`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SrtTransform {
    pub scale: [f32; 3],
    pub rotation: Quat,
    pub translation: [f32; 3],
}

impl SrtTransform {
    pub const IDENTITY: Self = Self {
        scale: [1.0; 3],
        rotation: Quat::IDENTITY,
        translation: [0.0; 3],
    };

    pub fn new(scale: [f32; 3], rotation: Quat, translation: [f32; 3]) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    /// Transform a point.
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let scaled = [
            p[0] * self.scale[0],
            p[1] * self.scale[1],
            p[2] * self.scale[2],
        ];
        add_array(&self.rotation.rotate(scaled), &self.translation)
    }
}

impl Default for SrtTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn mul3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

impl AnimationValue for SrtTransform {
    fn identity() -> Self {
        Self::IDENTITY
    }

    fn interpolate(&self, target: &Self, parameter: f32) -> Self {
        Self {
            scale: lerp_array(&self.scale, &target.scale, parameter),
            rotation: self.rotation.interpolate(&target.rotation, parameter),
            translation: lerp_array(&self.translation, &target.translation, parameter),
        }
    }

    /// `other` applied after `self`. Exact for uniform scales; non-uniform
    /// scales are combined component-wise.
    fn add(&self, other: &Self) -> Self {
        let moved = other
            .rotation
            .rotate(mul3(other.scale, self.translation));
        Self {
            scale: mul3(other.scale, self.scale),
            rotation: self.rotation.add(&other.rotation),
            translation: add_array(&moved, &other.translation),
        }
    }

    fn multiply(&self, factor: f32) -> Self {
        let pow = |s: f32| s.signum() * s.abs().powf(factor);
        Self {
            scale: [pow(self.scale[0]), pow(self.scale[1]), pow(self.scale[2])],
            rotation: self.rotation.multiply(factor),
            translation: scale_array(&self.translation, factor),
        }
    }

    fn inverse(&self) -> Self {
        let recip = |s: f32| if s == 0.0 { 0.0 } else { s.recip() };
        let scale = [
            recip(self.scale[0]),
            recip(self.scale[1]),
            recip(self.scale[2]),
        ];
        let rotation = self.rotation.inverse();
        let back = rotation.rotate(self.translation);
        Self {
            scale,
            rotation,
            translation: scale_array(&mul3(scale, back), -1.0),
        }
    }
}
