//! Vizij Timeline Core (engine-agnostic)
//!
//! Clip-based animation timing and blending:
//! - leaf animations (from/to/by, key frames, curves and paths);
//! - per-component composites (vectors, quaternions, SRT transforms);
//! - clips adding delay, speed, windowing, looping and fill behavior;
//! - instances blending weighted or additive values into shared properties;
//! - a manager stepping every instance once per tick.
//!
//! Everything is single-threaded and synchronous. Evaluation is pure: the same
//! animation queried twice at the same time yields the same value.

pub mod animation;
pub mod clip;
pub mod composite;
pub mod composition;
pub mod config;
pub mod curve;
pub mod curve_animation;
pub mod easing;
pub mod error;
pub mod from_to_by;
pub mod ids;
pub mod instance;
pub mod interp;
pub mod key_frame;
pub mod manager;
pub mod outputs;
pub mod time;
pub mod timing;
pub mod value;

// Re-exports for consumers (adapters)
pub use animation::{Animation, SharedAnimation};
pub use clip::AnimationClip;
pub use composite::{
    QuaternionAnimation, SrtAnimation, Vector2Animation, Vector3Animation, Vector4Animation,
};
pub use composition::{AnimatableProperty, AnimatableValue, CompositionChain, SharedProperty};
pub use config::Config;
pub use curve::{Curve, Curve2F, CurveKey, Path2F, Path3F, PiecewiseCurve, SplineInterpolation};
pub use curve_animation::{AnimationCurve, PathAnimation};
pub use easing::{Easing, EasingFunction};
pub use error::AnimationError;
pub use from_to_by::FromToByAnimation;
pub use ids::{ChainId, IdAllocator, InstanceId};
pub use instance::AnimationInstance;
pub use key_frame::{KeyFrame, KeyFrameAnimation, KeyFrameCollection};
pub use manager::{AnimationManager, HandoffBehavior};
pub use outputs::{AnimationEvent, Change, Outputs};
pub use time::{AnimationTime, TimeRange, TICKS_PER_MILLISECOND, TICKS_PER_SECOND};
pub use timing::{find_key_index, loop_parameter, AnimationState, FillBehavior, LoopBehavior};
pub use value::{AnimationValue, Quat, SrtTransform};

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, AnimationError>;
