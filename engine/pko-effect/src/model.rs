//! Effect data model
//!
//! Plain data as handed over by the asset loader. Nothing here parses files;
//! the loader (or, with `serde-support`, a JSON description) fills these
//! structures and the evaluators read them.
//!
//! Frame arrays are either empty or one entry per declared frame. Reads go
//! through the `*_at` accessors, which substitute the per-channel default
//! for any missing entry.

use glam::{Vec2, Vec3, Vec4};

use crate::blend::BlendState;
use crate::config::PlaybackOptions;
use crate::geometry::ShapeKind;
use crate::timeline::FrameTimeline;
use crate::uv_animation::UvAnimationMode;

/// Size used when a frame has no authored size
pub const DEFAULT_SIZE: Vec3 = Vec3::ONE;
/// Rotation used when a frame has no authored rotation
pub const DEFAULT_ROTATION: Vec3 = Vec3::ZERO;
/// Position used when a frame has no authored position
pub const DEFAULT_POSITION: Vec3 = Vec3::ZERO;
/// Color used when a frame has no authored color
pub const DEFAULT_COLOR: Vec4 = Vec4::ONE;

/// Continuous rotation about a fixed axis (the legacy "rotaLoop")
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct SpinParams {
    /// Whether the spin is active
    pub enabled: bool,
    /// Rotation axis (normalized on use)
    pub axis: Vec3,
    /// Radians per second
    pub angular_velocity: f32,
}

impl SpinParams {
    /// Create an enabled spin
    pub fn new(axis: Vec3, angular_velocity: f32) -> Self {
        Self {
            enabled: true,
            axis,
            angular_velocity,
        }
    }
}

/// Dimensions of the parametric cylinder/cone primitives
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct CylinderParams {
    /// Radial segment count
    pub segments: i32,
    /// Height along the primitive axis
    pub height: f32,
    /// Radius of the top cap
    pub top_radius: f32,
    /// Radius of the bottom cap
    pub bottom_radius: f32,
}

impl CylinderParams {
    /// Create cylinder parameters
    pub const fn new(segments: i32, height: f32, top_radius: f32, bottom_radius: f32) -> Self {
        Self {
            segments,
            height,
            top_radius,
            bottom_radius,
        }
    }
}

/// Shape of a sub-effect as authored
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ShapeSource {
    /// Symbolic shape name ("Cylinder", "Rect", ...) or an external model name
    pub name: String,
    /// Static parametric dimensions
    pub cylinder: CylinderParams,
    /// Whether `frame_cylinders` drives the dimensions per keyframe
    pub per_frame: bool,
    /// Per-keyframe parametric dimensions
    pub frame_cylinders: Vec<CylinderParams>,
}

impl ShapeSource {
    /// Create a shape referring to `name` with no parametric data
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Resolved primitive kind of this shape
    pub fn kind(&self) -> ShapeKind {
        ShapeKind::from_name(&self.name)
    }
}

/// UV and texture animation data of a sub-effect
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct UvAnimationData {
    /// Legacy mode code (1 = texture swap, 2 = continuous, 3 = discrete)
    pub mode: i32,
    /// Declared per-frame vertex count of the coordinate lists
    pub vertex_count: u16,
    /// Duration of one continuous coordinate frame
    pub coord_frame_time: f32,
    /// Coordinate frames interpolated in continuous mode
    pub coord_frames: Vec<Vec<Vec2>>,
    /// Duration of one discrete coordinate frame
    pub tex_frame_time: f32,
    /// Coordinate frames snapped to in discrete mode
    pub tex_frames: Vec<Vec<Vec2>>,
    /// Duration of one whole-texture frame
    pub frame_tex_time: f32,
    /// Texture names cycled in whole-texture mode
    pub frame_textures: Vec<String>,
}

impl UvAnimationData {
    /// Resolved animation mode
    pub fn mode(&self) -> UvAnimationMode {
        UvAnimationMode::from_code(self.mode)
    }
}

/// One animated visual layer of an effect
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct SubEffect {
    /// Display name
    pub name: String,
    /// Declared keyframe count
    pub frame_count: u16,
    /// Per-keyframe durations in seconds
    pub frame_durations: Vec<f32>,
    /// Per-keyframe scale
    pub frame_sizes: Vec<Vec3>,
    /// Per-keyframe Euler rotation (pitch, yaw, roll)
    pub frame_rotations: Vec<Vec3>,
    /// Per-keyframe position
    pub frame_positions: Vec<Vec3>,
    /// Per-keyframe RGBA color in 0..1
    pub frame_colors: Vec<Vec4>,
    /// Primitive shape
    pub shape: ShapeSource,
    /// Legacy source blend code
    pub src_blend: i32,
    /// Legacy destination blend code
    pub dest_blend: i32,
    /// Base texture name
    pub texture_name: String,
    /// UV and texture animation
    pub uv: UvAnimationData,
    /// Sub-effect spin
    pub spin: SpinParams,
    /// Face the viewpoint
    pub billboard: bool,
    /// Keep spin and keyframe rotation while billboarding
    pub preserve_spin: bool,
    /// Alpha testing enabled
    pub alpha_enabled: bool,
}

impl Default for SubEffect {
    fn default() -> Self {
        Self {
            name: String::new(),
            frame_count: 0,
            frame_durations: Vec::new(),
            frame_sizes: Vec::new(),
            frame_rotations: Vec::new(),
            frame_positions: Vec::new(),
            frame_colors: Vec::new(),
            shape: ShapeSource::default(),
            src_blend: 5,
            dest_blend: 6,
            texture_name: String::new(),
            uv: UvAnimationData::default(),
            spin: SpinParams::default(),
            billboard: false,
            preserve_spin: false,
            alpha_enabled: false,
        }
    }
}

impl SubEffect {
    /// Create an empty sub-effect
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declared keyframe count
    pub fn frame_count(&self) -> usize {
        self.frame_count as usize
    }

    /// Size of frame `index`, or the default size
    pub fn size_at(&self, index: usize) -> Vec3 {
        self.channel_at(&self.frame_sizes, index, DEFAULT_SIZE)
    }

    /// Rotation of frame `index`, or the default rotation
    pub fn rotation_at(&self, index: usize) -> Vec3 {
        self.channel_at(&self.frame_rotations, index, DEFAULT_ROTATION)
    }

    /// Position of frame `index`, or the default position
    pub fn position_at(&self, index: usize) -> Vec3 {
        self.channel_at(&self.frame_positions, index, DEFAULT_POSITION)
    }

    /// Color of frame `index`, or the default color
    pub fn color_at(&self, index: usize) -> Vec4 {
        self.channel_at(&self.frame_colors, index, DEFAULT_COLOR)
    }

    fn channel_at<T: Copy>(&self, values: &[T], index: usize, default: T) -> T {
        if index >= self.frame_count() {
            return default;
        }
        values.get(index).copied().unwrap_or(default)
    }

    /// Resolve this sub-effect's keyframe timeline
    pub fn timeline(&self, options: &PlaybackOptions) -> FrameTimeline {
        FrameTimeline::resolve_with(&self.frame_durations, self.frame_count(), options)
    }

    /// Renderer blend state for the legacy blend codes
    pub fn blend(&self) -> BlendState {
        BlendState::from_codes(self.src_blend, self.dest_blend)
    }

    /// Whether the shape references an external model mesh
    pub fn is_model_mesh(&self) -> bool {
        self.shape.kind() == ShapeKind::Model
    }
}

/// Reference to the path an effect travels along
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct PathReference {
    /// Name of the path asset
    pub name: String,
    /// Travel speed in distance per second
    pub velocity: f32,
}

/// An effect: ordered sub-effects plus effect-level spin and path
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct EffectFile {
    /// Effect name
    pub name: String,
    /// Layers, drawn in order
    pub sub_effects: Vec<SubEffect>,
    /// Spin applied to the whole effect group
    pub spin: SpinParams,
    /// Optional path the effect follows
    pub path: Option<PathReference>,
}

impl EffectFile {
    /// Create an empty effect
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decode an effect from its JSON description
    #[cfg(feature = "serde-support")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode this effect as pretty-printed JSON
    #[cfg(feature = "serde-support")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_channels_use_defaults() {
        let sub = SubEffect {
            frame_count: 2,
            frame_sizes: vec![Vec3::splat(2.0)],
            ..SubEffect::default()
        };

        assert_eq!(sub.size_at(0), Vec3::splat(2.0));
        assert_eq!(sub.size_at(1), DEFAULT_SIZE);
        assert_eq!(sub.rotation_at(0), DEFAULT_ROTATION);
        assert_eq!(sub.position_at(1), DEFAULT_POSITION);
        assert_eq!(sub.color_at(0), DEFAULT_COLOR);
    }

    #[test]
    fn test_index_beyond_frame_count_uses_default() {
        let sub = SubEffect {
            frame_count: 1,
            frame_positions: vec![Vec3::X, Vec3::Y],
            ..SubEffect::default()
        };

        assert_eq!(sub.position_at(0), Vec3::X);
        assert_eq!(sub.position_at(1), DEFAULT_POSITION);
    }

    #[test]
    fn test_model_mesh_detection() {
        let mut sub = SubEffect::new("wind");
        sub.shape = ShapeSource::named("wind01.lgo");
        assert!(sub.is_model_mesh());

        sub.shape = ShapeSource::named("Cylinder");
        assert!(!sub.is_model_mesh());
    }

    #[cfg(feature = "serde-support")]
    #[test]
    fn test_json_roundtrip() {
        let mut effect = EffectFile::new("test");
        effect.sub_effects.push(SubEffect {
            frame_count: 1,
            frame_durations: vec![0.5],
            frame_colors: vec![Vec4::new(1.0, 0.5, 0.25, 1.0)],
            ..SubEffect::new("glow")
        });
        effect.path = Some(PathReference {
            name: "arc".to_string(),
            velocity: 5.0,
        });

        let json = effect.to_json().expect("encode effect");
        let decoded = EffectFile::from_json(&json).expect("decode effect");
        assert_eq!(decoded, effect);
    }

    #[cfg(feature = "serde-support")]
    #[test]
    fn test_json_missing_fields_default() {
        let effect = EffectFile::from_json(r#"{"name":"bare","subEffects":[{"frameCount":1}]}"#)
            .expect("decode effect");
        let sub = &effect.sub_effects[0];
        assert_eq!(sub.src_blend, 5);
        assert_eq!(sub.dest_blend, 6);
        assert!(sub.frame_durations.is_empty());
    }
}
