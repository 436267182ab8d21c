//! Key frames and key-frame animations.
//!
//! A [`KeyFrameCollection`] does not sort itself. Authoring code pushes frames
//! in any order and calls [`KeyFrameCollection::sort`] once before playback;
//! querying an unsorted collection returns unspecified values but never panics.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::time::AnimationTime;
use crate::timing::{find_key_index, FillBehavior};
use crate::value::AnimationValue;
use crate::Result;

/// A value at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame<T> {
    time: AnimationTime,
    value: T,
}

impl<T> KeyFrame<T> {
    pub fn new(time: AnimationTime, value: T) -> Self {
        Self { time, value }
    }

    #[inline]
    pub fn time(&self) -> AnimationTime {
        self.time
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Ordered list of key frames. Sortedness is the caller's responsibility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyFrameCollection<T> {
    frames: Vec<KeyFrame<T>>,
}

impl<T> Default for KeyFrameCollection<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T> KeyFrameCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, frame: KeyFrame<T>) {
        self.frames.push(frame);
    }

    /// Panics when `index > len`, like `Vec::insert`.
    pub fn insert(&mut self, index: usize, frame: KeyFrame<T>) {
        self.frames.insert(index, frame);
    }

    pub fn remove(&mut self, index: usize) -> Option<KeyFrame<T>> {
        if index < self.frames.len() {
            Some(self.frames.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyFrame<T>> {
        self.frames.get(index)
    }

    pub fn first(&self) -> Option<&KeyFrame<T>> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&KeyFrame<T>> {
        self.frames.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyFrame<T>> {
        self.frames.iter()
    }

    /// Stable sort by time; frames sharing a time keep their insertion order.
    pub fn sort(&mut self) {
        self.frames.sort_by_key(|f| f.time);
    }

    pub fn is_sorted(&self) -> bool {
        self.frames.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Index of the last frame at or before `time`.
    pub fn index_at(&self, time: AnimationTime) -> Option<usize> {
        find_key_index(&self.frames, time, |f| f.time)
    }
}

impl<T> Index<usize> for KeyFrameCollection<T> {
    type Output = KeyFrame<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl<T> FromIterator<KeyFrame<T>> for KeyFrameCollection<T> {
    fn from_iter<I: IntoIterator<Item = KeyFrame<T>>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a KeyFrameCollection<T> {
    type Item = &'a KeyFrame<T>;
    type IntoIter = std::slice::Iter<'a, KeyFrame<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Plays a key-frame track, stepping or interpolating between frames.
#[derive(Clone, Debug)]
pub struct KeyFrameAnimation<T: AnimationValue> {
    pub key_frames: KeyFrameCollection<T>,
    pub enable_interpolation: bool,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl<T: AnimationValue> Default for KeyFrameAnimation<T> {
    fn default() -> Self {
        Self {
            key_frames: KeyFrameCollection::new(),
            enable_interpolation: true,
            fill_behavior: FillBehavior::Hold,
            is_additive: false,
        }
    }
}

impl<T: AnimationValue> KeyFrameAnimation<T> {
    pub fn new(key_frames: KeyFrameCollection<T>) -> Self {
        Self {
            key_frames,
            ..Self::default()
        }
    }

    pub fn with_interpolation(mut self, enabled: bool) -> Self {
        self.enable_interpolation = enabled;
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
}

impl<T: AnimationValue> Animation<T> for KeyFrameAnimation<T> {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        self.key_frames
            .last()
            .map(KeyFrame::time)
            .unwrap_or(AnimationTime::ZERO)
    }

    fn value_at(
        &self,
        time: AnimationTime,
        default_source: &T,
        _default_target: &T,
    ) -> Result<T> {
        let frames = &self.key_frames;
        let (first, last) = match (frames.first(), frames.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Ok(default_source.clone()),
        };
        if frames.len() == 1 || time <= first.time {
            return Ok(first.value.clone());
        }
        if time >= last.time {
            return Ok(last.value.clone());
        }

        let index = frames.index_at(time).unwrap_or(0);
        let current = &frames[index];
        if !self.enable_interpolation || index + 1 >= frames.len() {
            return Ok(current.value.clone());
        }

        let next = &frames[index + 1];
        let span = next.time - current.time;
        let parameter = if span.ticks() == 0 {
            0.0
        } else {
            (time - current.time).ratio(span) as f32
        };
        Ok(current.value.interpolate(&next.value, parameter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(secs: i64, value: f32) -> KeyFrame<f32> {
        KeyFrame::new(AnimationTime::from_secs(secs), value)
    }

    #[test]
    fn sort_is_stable() {
        let mut frames: KeyFrameCollection<f32> =
            [frame(3, 0.0), frame(1, 1.0), frame(1, 2.0)].into_iter().collect();
        assert!(!frames.is_sorted());
        frames.sort();
        assert!(frames.is_sorted());
        let values: Vec<f32> = frames.iter().map(|f| *f.value()).collect();
        assert_eq!(values, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut frames = KeyFrameCollection::new();
        frames.push(frame(0, 1.0));
        assert!(frames.remove(4).is_none());
        assert_eq!(frames.remove(0), Some(frame(0, 1.0)));
        assert!(frames.is_empty());
    }

    #[test]
    fn empty_and_single_frame() {
        let empty = KeyFrameAnimation::<f32>::default();
        assert_eq!(empty.total_duration(), AnimationTime::ZERO);
        assert_eq!(empty.value_at(AnimationTime::ZERO, &7.0, &9.0).unwrap(), 7.0);

        let single = KeyFrameAnimation::new([frame(2, 4.0)].into_iter().collect());
        assert_eq!(single.value_at(AnimationTime::ZERO, &7.0, &9.0).unwrap(), 4.0);
        assert_eq!(
            single.value_at(AnimationTime::from_secs(10), &7.0, &9.0).unwrap(),
            4.0
        );
    }

    #[test]
    fn coincident_frames_do_not_divide_by_zero() {
        let anim = KeyFrameAnimation::new(
            [frame(0, 0.0), frame(1, 1.0), frame(1, 5.0), frame(2, 6.0)]
                .into_iter()
                .collect(),
        );
        let v = anim.value_at(AnimationTime::from_secs(1), &0.0, &0.0).unwrap();
        assert!(v.is_finite());
    }
}
