//! Playback and transform evaluation for legacy PKO effect files
//!
//! Given effect data and a playback time, this crate computes the exact
//! interpolated pose, color, texture frame and world transform of every
//! animated layer, reproducing the legacy engine's frame-for-frame
//! behavior, quirks included.
//!
//! Every evaluation is a pure function of its inputs. The only state carried
//! between ticks lives in [`SubEffectEvaluator`], [`EffectPlayer`] and
//! [`BoundingVolumeTracker`], each owned by its caller.
//!
//! # Example
//!
//! ```
//! use glam::{Vec3, Vec4};
//! use pko_effect::{SubEffect, ViewState, evaluate_sub_effect};
//!
//! let sub = SubEffect {
//!     frame_count: 2,
//!     frame_durations: vec![1.0, 1.0],
//!     frame_positions: vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
//!     frame_colors: vec![Vec4::ONE, Vec4::new(1.0, 1.0, 1.0, 0.0)],
//!     ..SubEffect::new("fade")
//! };
//!
//! let sample = evaluate_sub_effect(&sub, 0.5, &ViewState::default());
//! assert!((sample.frame.position.x - 5.0).abs() < 1e-5);
//! assert!((sample.frame.alpha() - 0.5).abs() < 1e-5);
//! ```

pub mod blend;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod keyframe;
pub mod math;
pub mod model;
pub mod path;
pub mod timeline;
pub mod transform;
pub mod uv_animation;
pub mod validation;

// Re-export common types
pub use blend::{BlendFactor, BlendState};
pub use config::PlaybackOptions;
pub use error::{EffectError, Result};
pub use evaluator::{
    EffectPlayer, EffectSample, SubEffectEvaluator, SubEffectSample, ViewState,
    evaluate_sub_effect, evaluate_sub_effect_with,
};
pub use geometry::{CylinderDimensions, GeometryDescriptor, ShapeKind, resolve_geometry};
pub use keyframe::{InterpolatedFrame, interpolate, interpolate_on};
pub use model::{
    CylinderParams, EffectFile, PathReference, ShapeSource, SpinParams, SubEffect,
    UvAnimationData,
};
pub use path::PathPoints;
pub use timeline::{FramePosition, FrameTimeline};
pub use transform::{
    Attachment, AttachmentParent, Bone, BoundingVolumeTracker, EffectSpin, ResolveFailure,
    SkeletonDescription, SkeletonPose, compose_billboard_preserving_inner, compose_spin_then_base,
    face_viewpoint, resolve_attachment_world,
};
pub use uv_animation::{TextureSwap, UvAnimation, UvAnimationMode};
pub use validation::{ValidationError, ValidationReport, ValidationWarning};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
