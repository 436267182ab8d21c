use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::rc::Rc;

use vizij_timeline_core::{
    Animation, AnimatableValue, AnimationClip, AnimationManager, AnimationTime, FromToByAnimation,
    HandoffBehavior, KeyFrame, KeyFrameAnimation, KeyFrameCollection, LoopBehavior,
    SharedAnimation,
};

fn dense_track(keys: i64) -> KeyFrameAnimation<[f32; 3]> {
    let frames: KeyFrameCollection<[f32; 3]> = (0..keys)
        .map(|i| {
            let f = i as f32;
            KeyFrame::new(AnimationTime::from_millis(i * 33), [f, f * 0.5, -f])
        })
        .collect();
    KeyFrameAnimation::new(frames)
}

fn clip_benchmark(c: &mut Criterion) {
    let track: SharedAnimation<[f32; 3]> = Rc::new(dense_track(1000));
    let clip = AnimationClip::new(track)
        .with_loop_behavior(LoopBehavior::CycleOffset)
        .with_speed(1.25)
        .unwrap();

    c.bench_function("key_frames_1000", |b| {
        let mut t = 0i64;
        b.iter(|| {
            t = (t + 7) % 40_000;
            let v = clip.get_value(black_box(AnimationTime::from_millis(t)), &[0.0; 3], &[0.0; 3]);
            black_box(v).unwrap();
        })
    });
}

fn manager_benchmark(c: &mut Criterion) {
    let mut manager = AnimationManager::default();
    let mut handles = Vec::new();
    for i in 0..256 {
        let (typed, property) = AnimatableValue::shared(i as f32);
        let ramp = FromToByAnimation::new()
            .with_by(10.0f32)
            .with_duration(AnimationTime::from_secs(2))
            .unwrap();
        let clip = AnimationClip::wrap(ramp).with_loop_behavior(LoopBehavior::Oscillate);
        manager
            .start_animation(Rc::new(clip), &property, HandoffBehavior::Compose)
            .unwrap();
        handles.push(typed);
    }

    c.bench_function("manager_update_256", |b| {
        b.iter(|| {
            let out = manager.update(black_box(AnimationTime::from_millis(16)));
            black_box(out.changes.len());
        })
    });
    black_box(handles.len());
}

criterion_group!(benches, clip_benchmark, manager_benchmark);
criterion_main!(benches);
