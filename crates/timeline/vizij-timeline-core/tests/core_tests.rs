use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};
use std::rc::Rc;

use vizij_timeline_core::{
    Animation, AnimationClip, AnimationError, AnimationInstance, AnimationTime, FillBehavior,
    FromToByAnimation, InstanceId, KeyFrame, KeyFrameAnimation, KeyFrameCollection,
    QuaternionAnimation, Quat, SharedAnimation, Vector3Animation,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn secs(s: i64) -> AnimationTime {
    AnimationTime::from_secs(s)
}

fn ms(m: i64) -> AnimationTime {
    AnimationTime::from_millis(m)
}

fn ftb(from: f32, to: f32, duration: AnimationTime) -> FromToByAnimation<f32> {
    FromToByAnimation::new()
        .with_from(from)
        .with_to(to)
        .with_duration(duration)
        .unwrap()
}

fn three_keys() -> KeyFrameCollection<f32> {
    [
        KeyFrame::new(secs(1), 10.0f32),
        KeyFrame::new(secs(2), 20.0),
        KeyFrame::new(secs(3), 40.0),
    ]
    .into_iter()
    .collect()
}

#[test]
fn evaluation_is_idempotent() {
    let keyed = KeyFrameAnimation::new(three_keys());
    let clip = AnimationClip::wrap(ftb(3.0, 7.0, secs(2)))
        .with_delay(ms(300))
        .with_speed(1.7)
        .unwrap();
    for t in [0, 250, 1000, 1750, 2600, 9000] {
        let time = ms(t);
        let a = keyed.get_value(time, &0.0, &0.0).unwrap();
        let b = keyed.get_value(time, &0.0, &0.0).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        let a = clip.get_value(time, &0.0, &0.0).unwrap();
        let b = clip.get_value(time, &0.0, &0.0).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn from_to_by_boundaries() {
    let d = secs(1);
    let anim = ftb(100.0, 200.0, d);
    assert_eq!(anim.get_value(AnimationTime::ZERO, &0.0, &0.0).unwrap(), 100.0);
    assert_eq!(anim.get_value(d, &0.0, &0.0).unwrap(), 200.0);
    assert_eq!(anim.get_value(ms(500), &0.0, &0.0).unwrap(), 150.0);
}

#[test]
fn from_to_by_falls_back_to_defaults() {
    let none = FromToByAnimation::<f32>::new();
    assert_eq!(none.get_value(secs(1), &3.0, &8.0).unwrap(), 8.0);
    let by_only = FromToByAnimation::new().with_by(5.0f32);
    assert_eq!(by_only.get_value(secs(1), &3.0, &8.0).unwrap(), 8.0);
    assert_eq!(by_only.get_value(AnimationTime::ZERO, &3.0, &8.0).unwrap(), 3.0);
}

#[test]
fn key_frames_step_versus_interpolation() {
    let stepped = KeyFrameAnimation::new(three_keys()).with_interpolation(false);
    assert_eq!(stepped.get_value(ms(1750), &0.0, &0.0).unwrap(), 10.0);

    let smooth = KeyFrameAnimation::new(three_keys());
    assert!(smooth.enable_interpolation);
    let expected = 10.0 + (20.0 - 10.0) * 0.75;
    assert_eq!(smooth.get_value(ms(1750), &0.0, &0.0).unwrap(), expected);
}

#[test]
fn key_frames_clamp_outside_their_range() {
    let anim = KeyFrameAnimation::new(three_keys());
    assert_eq!(anim.total_duration(), secs(3));
    assert_eq!(anim.get_value(ms(500), &0.0, &0.0).unwrap(), 10.0);
    assert_eq!(anim.get_value(secs(7), &0.0, &0.0).unwrap(), 40.0);
    assert_eq!(anim.value_at(secs(7), &0.0, &0.0).unwrap(), 40.0);
}

#[test]
fn composite_duration_is_max_of_present_channels() {
    assert_eq!(Vector3Animation::default().total_duration(), AnimationTime::ZERO);
    let anim = Vector3Animation {
        x: Some(Rc::new(ftb(0.0, 1.0, secs(2)))),
        z: Some(Rc::new(ftb(0.0, 1.0, secs(5)))),
        ..Default::default()
    };
    assert_eq!(anim.total_duration(), secs(5));
    let v = anim
        .get_value(secs(1), &[7.0, 8.0, 9.0], &[0.0; 3])
        .unwrap();
    assert_eq!(v[1], 8.0);
}

#[test]
fn clip_fill_hold_versus_stop() {
    let inner: SharedAnimation<f32> = Rc::new(ftb(0.0, 10.0, secs(4)));
    let hold = AnimationClip::new(inner.clone())
        .with_duration(Some(secs(2)))
        .unwrap();
    let stop = hold.clone().with_fill_behavior(FillBehavior::Stop);

    let at_end = hold.get_value(secs(2), &-1.0, &-1.0).unwrap();
    assert_eq!(at_end, 5.0);
    for t in [3, 10, 1000] {
        assert_eq!(hold.get_value(secs(t), &-1.0, &-1.0).unwrap(), at_end);
        assert_eq!(stop.get_value(secs(t), &-1.0, &-1.0).unwrap(), -1.0);
    }
}

#[test]
fn quaternion_channels_keep_independent_phases() {
    // W: delayed by 10s, then 100 -> 200 over 10s
    let w = AnimationClip::wrap(ftb(100.0, 200.0, secs(10))).with_delay(secs(10));
    // X: 10 -> 20 over 5s, reverts to the default once done
    let x = ftb(10.0, 20.0, secs(5)).with_fill_behavior(FillBehavior::Stop);
    // Y: delayed by 5s, then 50 -> 60 over 10s
    let y = AnimationClip::wrap(ftb(50.0, 60.0, secs(10))).with_delay(secs(5));
    // Z: 1 -> 2 over 10s, holds the end value
    let z = ftb(1.0, 2.0, secs(10));

    let anim = QuaternionAnimation {
        w: Some(Rc::new(w)),
        x: Some(Rc::new(x)),
        y: Some(Rc::new(y)),
        z: Some(Rc::new(z)),
        ..Default::default()
    };
    assert_eq!(anim.total_duration(), secs(20));

    let source = Quat::from_xyzw(1.0, 2.0, 3.0, 4.0);
    let target = Quat::from_xyzw(5.0, 6.0, 7.0, 8.0);

    let q = anim.get_value(secs(0), &source, &target).unwrap();
    assert_eq!(q.w(), 4.0); // not started
    assert_eq!(q.x(), 10.0);
    assert_eq!(q.y(), 2.0); // not started
    assert_eq!(q.z(), 1.0);

    let q = anim.get_value(secs(5), &source, &target).unwrap();
    assert_eq!(q.w(), 4.0);
    assert_eq!(q.x(), 20.0); // last active sample
    assert_eq!(q.y(), 50.0);
    approx(q.z(), 1.5, 1e-5);

    let q = anim.get_value(secs(13), &source, &target).unwrap();
    approx(q.w(), 130.0, 1e-4);
    assert_eq!(q.x(), 1.0); // stopped, back to the default source
    approx(q.y(), 58.0, 1e-4);
    assert_eq!(q.z(), 2.0); // holding
}

#[test]
fn instance_weight_is_validated() {
    let mut inst = AnimationInstance::new(InstanceId(0), Rc::new(ftb(0.0, 1.0, secs(1))));
    for bad in [-0.1f32, 1.1, f32::NAN] {
        let err = inst.set_weight(bad).unwrap_err();
        assert!(matches!(err, AnimationError::WeightOutOfRange { .. }));
        assert_eq!(err.category(), "range");
    }
    inst.set_weight(0.0).unwrap();
    assert_eq!(inst.weight(), 0.0);
    inst.set_weight(1.0).unwrap();
    assert_eq!(inst.weight(), 1.0);
}

#[test]
fn additive_blending_scales_by_weight() {
    let anim = ftb(100.0, 200.0, secs(1)).additive(true);
    let mut inst = AnimationInstance::new(InstanceId(0), Rc::new(anim));
    inst.set_time(Some(ms(500)));

    let (current, base) = (1.0f32, 2.0f32);
    assert_eq!(inst.raw_value(&current, &base).unwrap(), Some(150.0));

    inst.set_weight(0.0).unwrap();
    assert_eq!(inst.compose(&current, &base).unwrap(), 1.0);
    inst.set_weight(1.0).unwrap();
    assert_eq!(inst.compose(&current, &base).unwrap(), 151.0);
    inst.set_weight(0.75).unwrap();
    assert_eq!(inst.compose(&current, &base).unwrap(), 113.5);
}

fn approx3(a: [f32; 3], b: [f32; 3]) {
    for i in 0..3 {
        approx(a[i], b[i], 1e-5);
    }
}

#[test]
fn additive_rotation_applies_after_current() {
    let rot_x = Quat::from_axis_angle([1.0, 0.0, 0.0], FRAC_PI_2);
    let rot_z = Quat::from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2);
    let layer = FromToByAnimation::new()
        .with_from(rot_z)
        .with_to(rot_z)
        .additive(true);
    let mut inst = AnimationInstance::new(InstanceId(0), Rc::new(layer));
    inst.set_time(Some(AnimationTime::ZERO));

    // weight 1: x first, then z. (0,1,0) -> (0,0,1), which z leaves alone;
    // the other order would give (-1,0,0).
    let q = inst.compose(&rot_x, &rot_x).unwrap();
    approx3(q.rotate([0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);

    // weight 0.5 scales the layer to 45 degrees about Z, still applied last.
    inst.set_weight(0.5).unwrap();
    let q = inst.compose(&rot_x, &rot_x).unwrap();
    approx3(q.rotate([1.0, 0.0, 0.0]), [FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0]);
    let half_z = Quat::from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2 / 2.0);
    let swapped = rot_x.rotate(half_z.rotate([1.0, 0.0, 0.0]));
    approx3(swapped, [FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2]);
}

#[test]
fn weighted_replacement_interpolates_from_current() {
    let mut inst = AnimationInstance::new(InstanceId(0), Rc::new(ftb(100.0, 200.0, secs(1))));
    inst.set_time(Some(ms(500)));
    inst.set_weight(0.5).unwrap();
    assert_eq!(inst.compose(&50.0, &0.0).unwrap(), 100.0);
}

#[test]
fn negative_durations_fail_on_assignment() {
    let err = FromToByAnimation::<f32>::new()
        .with_duration(secs(-1))
        .unwrap_err();
    assert!(matches!(err, AnimationError::NegativeDuration { .. }));
    assert_eq!(err.category(), "configuration");
}
