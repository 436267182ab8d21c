//! Interpolation and rotation helpers shared by the value traits and curves.
//!
//! Vectors are plain `[f32; N]` arrays and quaternions are `[x, y, z, w]`.

pub mod functions;
