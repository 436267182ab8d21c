//! Error types for timeline evaluation and playback control.

use serde::{Deserialize, Serialize};

/// Errors raised by public entry points. Internal helpers (loop mapping, key
/// search) never fail; only configuration and range checks produce errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Time value that cannot be represented as ticks (NaN or infinite seconds)
    #[error("Invalid time value: {time}")]
    InvalidTime { time: f64 },

    /// Clip window where the start lies after the end
    #[error("Invalid clip window: clip start {start_ticks} is after clip end {end_ticks}")]
    InvalidClipWindow { start_ticks: i64, end_ticks: i64 },

    /// Negative duration assigned to an animation
    #[error("Duration must not be negative, got {ticks} ticks")]
    NegativeDuration { ticks: i64 },

    /// Negative or NaN playback speed
    #[error("Speed must be a non-negative number, got {speed}")]
    InvalidSpeed { speed: f32 },

    /// Instance weight outside [0, 1] or NaN
    #[error("Weight must be in the range [0, 1], got {weight}")]
    WeightOutOfRange { weight: f32 },

    /// Curve parameter range where the start lies after the end
    #[error("Start parameter {start} is greater than end parameter {end}")]
    InvalidParameterRange { start: f32, end: f32 },

    /// Instance id not known to the manager (never started or detached)
    #[error("Unknown animation instance {instance}")]
    UnknownInstance { instance: u32 },

    /// Any other invalid animation configuration
    #[error("Invalid animation: {reason}")]
    InvalidAnimation { reason: String },
}

impl AnimationError {
    /// Create a generic configuration error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidAnimation {
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidClipWindow { .. }
            | Self::NegativeDuration { .. }
            | Self::InvalidParameterRange { .. }
            | Self::InvalidAnimation { .. } => "configuration",
            Self::WeightOutOfRange { .. } | Self::InvalidSpeed { .. } => "range",
            Self::InvalidTime { .. } => "validation",
            Self::UnknownInstance { .. } => "lookup",
        }
    }
}
