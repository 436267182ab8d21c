//! Interpolation helpers:
//! - component-wise lerp for scalars and fixed-size vectors
//! - quaternion NLERP and SLERP with shortest-arc correction
//! - quaternion product, inverse, power and vector rotation
//!
//! None of these panic for parameters outside [0, 1]; lerp extrapolates.

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Lerp for fixed-size arrays
#[inline]
pub fn lerp_array<const N: usize>(a: &[f32; N], b: &[f32; N], t: f32) -> [f32; N] {
    let mut out = [0.0f32; N];
    for i in 0..N {
        out[i] = lerp_f32(a[i], b[i], t);
    }
    out
}

#[inline]
pub fn add_array<const N: usize>(a: &[f32; N], b: &[f32; N]) -> [f32; N] {
    let mut out = [0.0f32; N];
    for i in 0..N {
        out[i] = a[i] + b[i];
    }
    out
}

#[inline]
pub fn scale_array<const N: usize>(a: &[f32; N], s: f32) -> [f32; N] {
    let mut out = [0.0f32; N];
    for i in 0..N {
        out[i] = a[i] * s;
    }
    out
}

#[inline]
pub fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion; a zero quaternion becomes the identity.
#[inline]
pub fn normalize4(q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        [q[0] * inv_len, q[1] * inv_len, q[2] * inv_len, q[3] * inv_len]
    } else {
        [0.0, 0.0, 0.0, 1.0]
    }
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    normalize4(lerp_array(&a, &b, t))
}

/// Slerp between two rotations with shortest-arc correction.
/// Nearly parallel inputs fall back to NLERP.
pub fn slerp_quat(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let qa = normalize4(a);
    let mut qb = normalize4(b);

    let mut dot = dot4(qa, qb);
    if dot < 0.0 {
        qb = [-qb[0], -qb[1], -qb[2], -qb[3]];
        dot = -dot;
    }

    const DOT_THRESHOLD: f32 = 0.9995;
    if dot > DOT_THRESHOLD {
        return nlerp_quat(qa, qb, t);
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();
    let s0 = (theta_0 - theta).sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;

    [
        s0 * qa[0] + s1 * qb[0],
        s0 * qa[1] + s1 * qb[1],
        s0 * qa[2] + s1 * qb[2],
        s0 * qa[3] + s1 * qb[3],
    ]
}

/// Hamilton product `a * b`: the rotation `b` followed by `a`.
#[inline]
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

/// Multiplicative inverse. Falls back to the identity for a zero quaternion.
#[inline]
pub fn quat_inverse(q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 <= 0.0 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    let inv = len2.recip();
    [-q[0] * inv, -q[1] * inv, -q[2] * inv, q[3] * inv]
}

/// Raise a rotation to a real power, i.e. scale its rotation angle.
pub fn quat_pow(q: [f32; 4], exponent: f32) -> [f32; 4] {
    let q = normalize4(q);
    let half_angle = q[3].clamp(-1.0, 1.0).acos();
    let sin_half = half_angle.sin();
    if sin_half.abs() < 1e-6 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    let axis = [q[0] / sin_half, q[1] / sin_half, q[2] / sin_half];
    let scaled = half_angle * exponent;
    let s = scaled.sin();
    [axis[0] * s, axis[1] * s, axis[2] * s, scaled.cos()]
}

/// Rotation about a unit axis by `angle` radians.
pub fn quat_from_axis_angle(axis: [f32; 3], angle: f32) -> [f32; 4] {
    let half = angle * 0.5;
    let s = half.sin();
    [axis[0] * s, axis[1] * s, axis[2] * s, half.cos()]
}

#[inline]
fn cross3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Rotate a vector by a unit quaternion.
pub fn rotate_vec3(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    let u = [q[0], q[1], q[2]];
    let w = q[3];
    let uv = cross3(u, v);
    let uuv = cross3(u, uv);
    [
        v[0] + 2.0 * (w * uv[0] + uuv[0]),
        v[1] + 2.0 * (w * uv[1] + uuv[1]),
        v[2] + 2.0 * (w * uv[2] + uuv[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx4(a: [f32; 4], b: [f32; 4]) {
        for i in 0..4 {
            assert!((a[i] - b[i]).abs() < 1e-5, "left={a:?} right={b:?}");
        }
    }

    #[test]
    fn lerp_extrapolates() {
        assert_eq!(lerp_f32(0.0, 10.0, 1.5), 15.0);
        assert_eq!(lerp_array(&[0.0, 2.0], &[2.0, 4.0], -0.5), [-1.0, 1.0]);
    }

    #[test]
    fn quat_pow_scales_angle() {
        let q = quat_from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2);
        let half = quat_pow(q, 0.5);
        approx4(half, quat_from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2 * 0.5));
        approx4(quat_pow(q, 0.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn inverse_cancels() {
        let q = quat_from_axis_angle([1.0, 0.0, 0.0], 0.7);
        approx4(quat_mul(q, quat_inverse(q)), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rotate_quarter_turn() {
        let q = quat_from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2);
        let v = rotate_vec3(q, [1.0, 0.0, 0.0]);
        assert!((v[0]).abs() < 1e-6 && (v[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn slerp_midpoint() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = quat_from_axis_angle([0.0, 1.0, 0.0], FRAC_PI_2);
        approx4(
            slerp_quat(a, b, 0.5),
            quat_from_axis_angle([0.0, 1.0, 0.0], FRAC_PI_2 * 0.5),
        );
    }
}
