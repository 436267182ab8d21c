//! Time handling for timelines.
//!
//! All times are signed tick counts so clip windows, delays and offsets can be
//! negative. `AnimationTime::MIN` and `AnimationTime::MAX` double as negative
//! and positive infinity: they absorb any finite operand.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Number of ticks in one second (100 ns resolution).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks in one millisecond.
pub const TICKS_PER_MILLISECOND: i64 = 10_000;

/// A signed duration or position on a timeline.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct AnimationTime(i64);

impl AnimationTime {
    /// Zero time
    pub const ZERO: Self = Self(0);

    /// Negative infinity
    pub const MIN: Self = Self(i64::MIN);

    /// Positive infinity (e.g. "loop forever")
    pub const MAX: Self = Self(i64::MAX);

    /// Create animation time from raw ticks
    #[inline]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Create animation time from whole seconds
    #[inline]
    pub const fn from_secs(seconds: i64) -> Self {
        Self(seconds.saturating_mul(TICKS_PER_SECOND))
    }

    /// Create animation time from whole milliseconds
    #[inline]
    pub const fn from_millis(milliseconds: i64) -> Self {
        Self(milliseconds.saturating_mul(TICKS_PER_MILLISECOND))
    }

    /// Create animation time from fractional seconds.
    /// Values beyond the tick range saturate to the infinity sentinels.
    #[inline]
    pub fn from_seconds(seconds: f64) -> Result<Self, AnimationError> {
        if !seconds.is_finite() {
            return Err(AnimationError::InvalidTime { time: seconds });
        }
        Ok(Self::from_ticks_f64(seconds * TICKS_PER_SECOND as f64))
    }

    #[inline]
    fn from_ticks_f64(ticks: f64) -> Self {
        if ticks >= i64::MAX as f64 {
            Self::MAX
        } else if ticks <= i64::MIN as f64 {
            Self::MIN
        } else {
            Self(ticks.round() as i64)
        }
    }

    /// Raw tick count
    #[inline]
    pub const fn ticks(&self) -> i64 {
        self.0
    }

    /// Get time in seconds
    #[inline]
    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    /// Get time in milliseconds
    #[inline]
    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / TICKS_PER_MILLISECOND as f64
    }

    #[inline]
    pub const fn is_infinite(&self) -> bool {
        self.0 == i64::MAX || self.0 == i64::MIN
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Scale this time by a factor. Infinite times keep their sign (flipped for
    /// negative factors); a zero factor always yields zero.
    pub fn mul_f64(self, factor: f64) -> Self {
        if factor == 0.0 || factor.is_nan() {
            return Self::ZERO;
        }
        if self.is_infinite() {
            let positive = (self == Self::MAX) == (factor > 0.0);
            return if positive { Self::MAX } else { Self::MIN };
        }
        Self::from_ticks_f64(self.0 as f64 * factor)
    }

    /// Divide this time by a factor. Division by zero yields infinity with the
    /// sign of this time (zero stays zero).
    pub fn div_f64(self, divisor: f64) -> Self {
        if divisor == 0.0 {
            return match self.0.signum() {
                1 => Self::MAX,
                -1 => Self::MIN,
                _ => Self::ZERO,
            };
        }
        self.mul_f64(1.0 / divisor)
    }

    /// Absolute value, saturating at `MAX`
    #[inline]
    pub fn abs(self) -> Self {
        if self == Self::MIN {
            Self::MAX
        } else {
            Self(self.0.abs())
        }
    }

    /// Clamp time to a range
    #[inline]
    pub fn clamp(self, min: AnimationTime, max: AnimationTime) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }

    /// Ratio `self / other` as a float. Zero `other` yields 0.
    #[inline]
    pub fn ratio(self, other: AnimationTime) -> f64 {
        if other.0 == 0 {
            0.0
        } else {
            self.0 as f64 / other.0 as f64
        }
    }
}

impl Add for AnimationTime {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinite() {
            return self;
        }
        if other.is_infinite() {
            return other;
        }
        let sum = self.0.saturating_add(other.0);
        Self(sum)
    }
}

impl AddAssign for AnimationTime {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for AnimationTime {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

impl SubAssign for AnimationTime {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for AnimationTime {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::MAX => Self::MIN,
            Self::MIN => Self::MAX,
            Self(ticks) => Self(-ticks),
        }
    }
}

impl From<std::time::Duration> for AnimationTime {
    fn from(duration: std::time::Duration) -> Self {
        let ticks = duration.as_nanos() / 100;
        Self(i64::try_from(ticks).unwrap_or(i64::MAX))
    }
}

/// Inclusive time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: AnimationTime,
    pub end: AnimationTime,
}

impl TimeRange {
    /// Create a new time range
    #[inline]
    pub fn new(start: AnimationTime, end: AnimationTime) -> Result<Self, AnimationError> {
        if start > end {
            return Err(AnimationError::InvalidClipWindow {
                start_ticks: start.ticks(),
                end_ticks: end.ticks(),
            });
        }
        Ok(Self { start, end })
    }

    /// Create a range from zero to the given duration
    #[inline]
    pub fn from_duration(duration: AnimationTime) -> Self {
        Self {
            start: AnimationTime::ZERO,
            end: duration,
        }
    }

    /// Get the length of this range
    #[inline]
    pub fn duration(&self) -> AnimationTime {
        self.end - self.start
    }

    /// Check if a time is within this range (inclusive)
    #[inline]
    pub fn contains(&self, time: AnimationTime) -> bool {
        time >= self.start && time <= self.end
    }

    #[inline]
    pub fn clamp(&self, time: AnimationTime) -> AnimationTime {
        time.clamp(self.start, self.end)
    }
}
