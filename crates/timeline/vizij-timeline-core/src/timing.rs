//! Time/loop model: pure mappings from a timeline position to a position
//! inside a window, plus the key lookup shared by key frames and curves.
//!
//! Nothing in here fails. Degenerate windows (zero length) collapse to the
//! window start.

use serde::{Deserialize, Serialize};

use crate::time::AnimationTime;

/// How times outside a window are mapped back into it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopBehavior {
    /// No mapping: the time is handed to the animation unchanged.
    None,
    /// Hold the boundary: times are clamped into the window.
    #[default]
    Constant,
    /// Wrap around and repeat the window.
    Cycle,
    /// Repeat the window; each cycle accumulates the change over one cycle.
    CycleOffset,
    /// Play forward and backward alternately.
    Oscillate,
}

impl LoopBehavior {
    /// Whether this behavior repeats the window indefinitely.
    #[inline]
    pub fn repeats(&self) -> bool {
        matches!(self, Self::Cycle | Self::CycleOffset | Self::Oscillate)
    }
}

/// What an animation reports once its duration has elapsed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillBehavior {
    /// Keep reporting the last value.
    #[default]
    Hold,
    /// Become inactive and fall back to the default source.
    Stop,
}

/// Playback phase of a timeline at a given time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    /// Not started yet (before time zero or still inside a delay).
    Scheduled,
    /// Producing values.
    Active,
    /// Past the end, holding the final value.
    Filling,
    /// Past the end (or stopped explicitly), producing nothing.
    Stopped,
}

impl AnimationState {
    /// True when the timeline contributes a value.
    #[inline]
    pub fn is_producing(&self) -> bool {
        matches!(self, Self::Active | Self::Filling)
    }
}

/// Map `time` into the window `[start, end]` according to `behavior`.
///
/// Returns the mapped time and the signed number of whole cycles between the
/// window and `time` (only non-zero for `Cycle`/`CycleOffset`). Inside the
/// window times are returned unchanged. For cycling behaviors an exact multiple
/// of the window length past `end` maps to `end`, so a clip that stops after a
/// whole number of cycles ends on its final value.
pub fn loop_parameter(
    time: AnimationTime,
    start: AnimationTime,
    end: AnimationTime,
    behavior: LoopBehavior,
) -> (AnimationTime, i64) {
    match behavior {
        LoopBehavior::None => return (time, 0),
        LoopBehavior::Constant => return (time.clamp(start, end.max(start)), 0),
        _ => {}
    }

    if time >= start && time <= end {
        return (time, 0);
    }
    let length = end.ticks() as i128 - start.ticks() as i128;
    if length <= 0 {
        return (start, 0);
    }

    let t = time.ticks() as i128;
    let s = start.ticks() as i128;
    let e = end.ticks() as i128;

    match behavior {
        LoopBehavior::Cycle | LoopBehavior::CycleOffset => {
            if t > e {
                let offset = t - s;
                let cycles = offset / length;
                let rest = offset % length;
                if rest == 0 {
                    (end, clamp_i64(cycles - 1))
                } else {
                    (ticks(s + rest), clamp_i64(cycles))
                }
            } else {
                let offset = s - t;
                let cycles = offset / length;
                let rest = offset % length;
                if rest == 0 {
                    (start, clamp_i64(-cycles))
                } else {
                    (ticks(e - rest), clamp_i64(-(cycles + 1)))
                }
            }
        }
        LoopBehavior::Oscillate => {
            // Reflect: even half-periods run forward, odd ones backward.
            let offset = (t - s).abs();
            let half_periods = offset / length;
            let rest = offset % length;
            if half_periods % 2 == 0 {
                (ticks(s + rest), 0)
            } else {
                (ticks(e - rest), 0)
            }
        }
        LoopBehavior::None | LoopBehavior::Constant => (time, 0),
    }
}

#[inline]
fn clamp_i64(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[inline]
fn ticks(v: i128) -> AnimationTime {
    AnimationTime::from_ticks(clamp_i64(v))
}

/// Index of the last key whose position is `<= value`, or `None` when `value`
/// precedes every key. `keys` must be sorted by `key_of`; O(log n).
pub fn find_key_index<K, P, F>(keys: &[K], value: P, key_of: F) -> Option<usize>
where
    P: PartialOrd,
    F: Fn(&K) -> P,
{
    let after = keys.partition_point(|k| key_of(k) <= value);
    after.checked_sub(1)
}
