//! Composite animations: one independent sub-animation per component.
//!
//! Each channel keeps its own timeline (delay, loop, fill) and is evaluated
//! against the matching component of the default source/target. A missing
//! channel leaves that component at the default source.

use crate::animation::{Animation, SharedAnimation};
use crate::time::AnimationTime;
use crate::timing::FillBehavior;
use crate::value::{AnimationValue, Quat, SrtTransform};
use crate::Result;

fn channel_value<T: AnimationValue>(
    channel: &Option<SharedAnimation<T>>,
    time: AnimationTime,
    source: &T,
    target: &T,
) -> Result<T> {
    match channel {
        Some(animation) => animation.get_value(time, source, target),
        None => Ok(source.clone()),
    }
}

fn channel_duration<T: AnimationValue>(channel: &Option<SharedAnimation<T>>) -> AnimationTime {
    channel
        .as_ref()
        .map(|a| a.total_duration())
        .unwrap_or(AnimationTime::ZERO)
}

fn max_duration(durations: &[AnimationTime]) -> AnimationTime {
    durations
        .iter()
        .copied()
        .max()
        .unwrap_or(AnimationTime::ZERO)
}

/// Two scalar channels driving an `[f32; 2]`.
#[derive(Clone, Default)]
pub struct Vector2Animation {
    pub x: Option<SharedAnimation<f32>>,
    pub y: Option<SharedAnimation<f32>>,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl Animation<[f32; 2]> for Vector2Animation {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        max_duration(&[channel_duration(&self.x), channel_duration(&self.y)])
    }

    fn value_at(
        &self,
        time: AnimationTime,
        source: &[f32; 2],
        target: &[f32; 2],
    ) -> Result<[f32; 2]> {
        Ok([
            channel_value(&self.x, time, &source[0], &target[0])?,
            channel_value(&self.y, time, &source[1], &target[1])?,
        ])
    }
}

/// Three scalar channels driving an `[f32; 3]`.
#[derive(Clone, Default)]
pub struct Vector3Animation {
    pub x: Option<SharedAnimation<f32>>,
    pub y: Option<SharedAnimation<f32>>,
    pub z: Option<SharedAnimation<f32>>,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl Animation<[f32; 3]> for Vector3Animation {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        max_duration(&[
            channel_duration(&self.x),
            channel_duration(&self.y),
            channel_duration(&self.z),
        ])
    }

    fn value_at(
        &self,
        time: AnimationTime,
        source: &[f32; 3],
        target: &[f32; 3],
    ) -> Result<[f32; 3]> {
        Ok([
            channel_value(&self.x, time, &source[0], &target[0])?,
            channel_value(&self.y, time, &source[1], &target[1])?,
            channel_value(&self.z, time, &source[2], &target[2])?,
        ])
    }
}

/// Four scalar channels driving an `[f32; 4]`.
#[derive(Clone, Default)]
pub struct Vector4Animation {
    pub x: Option<SharedAnimation<f32>>,
    pub y: Option<SharedAnimation<f32>>,
    pub z: Option<SharedAnimation<f32>>,
    pub w: Option<SharedAnimation<f32>>,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl Animation<[f32; 4]> for Vector4Animation {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        max_duration(&[
            channel_duration(&self.x),
            channel_duration(&self.y),
            channel_duration(&self.z),
            channel_duration(&self.w),
        ])
    }

    fn value_at(
        &self,
        time: AnimationTime,
        source: &[f32; 4],
        target: &[f32; 4],
    ) -> Result<[f32; 4]> {
        Ok([
            channel_value(&self.x, time, &source[0], &target[0])?,
            channel_value(&self.y, time, &source[1], &target[1])?,
            channel_value(&self.z, time, &source[2], &target[2])?,
            channel_value(&self.w, time, &source[3], &target[3])?,
        ])
    }
}

/// Per-component quaternion animation (w, x, y, z). The result is not
/// normalized.
#[derive(Clone, Default)]
pub struct QuaternionAnimation {
    pub w: Option<SharedAnimation<f32>>,
    pub x: Option<SharedAnimation<f32>>,
    pub y: Option<SharedAnimation<f32>>,
    pub z: Option<SharedAnimation<f32>>,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl Animation<Quat> for QuaternionAnimation {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        max_duration(&[
            channel_duration(&self.w),
            channel_duration(&self.x),
            channel_duration(&self.y),
            channel_duration(&self.z),
        ])
    }

    fn value_at(&self, time: AnimationTime, source: &Quat, target: &Quat) -> Result<Quat> {
        let w = channel_value(&self.w, time, &source.w(), &target.w())?;
        let x = channel_value(&self.x, time, &source.x(), &target.x())?;
        let y = channel_value(&self.y, time, &source.y(), &target.y())?;
        let z = channel_value(&self.z, time, &source.z(), &target.z())?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }
}

/// Scale, rotation and translation channels driving an [`SrtTransform`].
#[derive(Clone, Default)]
pub struct SrtAnimation {
    pub scale: Option<SharedAnimation<[f32; 3]>>,
    pub rotation: Option<SharedAnimation<Quat>>,
    pub translation: Option<SharedAnimation<[f32; 3]>>,
    pub fill_behavior: FillBehavior,
    pub is_additive: bool,
}

impl Animation<SrtTransform> for SrtAnimation {
    fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    fn is_additive(&self) -> bool {
        self.is_additive
    }

    fn total_duration(&self) -> AnimationTime {
        max_duration(&[
            channel_duration(&self.scale),
            channel_duration(&self.rotation),
            channel_duration(&self.translation),
        ])
    }

    fn value_at(
        &self,
        time: AnimationTime,
        source: &SrtTransform,
        target: &SrtTransform,
    ) -> Result<SrtTransform> {
        Ok(SrtTransform {
            scale: channel_value(&self.scale, time, &source.scale, &target.scale)?,
            rotation: channel_value(&self.rotation, time, &source.rotation, &target.rotation)?,
            translation: channel_value(
                &self.translation,
                time,
                &source.translation,
                &target.translation,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::from_to_by::FromToByAnimation;

    fn ramp(secs: i64) -> SharedAnimation<f32> {
        Rc::new(
            FromToByAnimation::new()
                .with_from(0.0f32)
                .with_to(1.0)
                .with_duration(AnimationTime::from_secs(secs))
                .unwrap(),
        )
    }

    #[test]
    fn empty_composite_keeps_source() {
        let anim = Vector3Animation::default();
        assert_eq!(anim.total_duration(), AnimationTime::ZERO);
        let v = anim
            .get_value(AnimationTime::ZERO, &[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0])
            .unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn duration_is_longest_channel() {
        let anim = Vector2Animation {
            x: Some(ramp(2)),
            y: Some(ramp(7)),
            ..Default::default()
        };
        assert_eq!(anim.total_duration(), AnimationTime::from_secs(7));
    }
}
