//! Primitive geometry resolution
//!
//! Sub-effects name their primitive symbolically. Built-in names select one
//! of the engine's procedural primitives; anything else is treated as the
//! name of an external model mesh. Cylinders and cones carry parametric
//! dimensions which may be keyed per frame.

use crate::math::Lerp;
use crate::model::{CylinderParams, ShapeSource};
use crate::timeline::FramePosition;

/// Fewest radial segments a parametric primitive is built with
pub const MIN_CYLINDER_SEGMENTS: u32 = 3;

/// Segment count used when none is authored
pub const DEFAULT_CYLINDER_SEGMENTS: u32 = 16;

/// Dimensions used when none are authored
pub const DEFAULT_CYLINDER: CylinderParams =
    CylinderParams::new(DEFAULT_CYLINDER_SEGMENTS as i32, 1.0, 0.5, 0.5);

/// Built-in primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    /// Unit quad in the XY plane
    #[default]
    Rect,
    /// Unit quad standing on the Z axis
    RectZ,
    /// Unit quad lying flat in the XZ plane
    RectPlane,
    /// Single triangle in the XY plane
    Triangle,
    /// Single triangle lying flat in the XZ plane
    TrianglePlane,
    /// Open cylinder, possibly tapered
    Cylinder,
    /// Cylinder with the top radius collapsed to a point
    Cone,
    /// UV sphere
    Sphere,
    /// External model mesh, referenced by name
    Model,
}

impl ShapeKind {
    /// Every built-in kind with the name it is authored as
    const NAMED: [(&'static str, Self); 8] = [
        ("rect", Self::Rect),
        ("rectz", Self::RectZ),
        ("rectplane", Self::RectPlane),
        ("triangle", Self::Triangle),
        ("triangleplane", Self::TrianglePlane),
        ("cylinder", Self::Cylinder),
        ("cone", Self::Cone),
        ("sphere", Self::Sphere),
    ];

    /// Resolve a symbolic shape name
    ///
    /// Matching ignores case and a trailing `.lgo` extension. An empty name
    /// is the default quad; any other unknown name is a model mesh.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Self::Rect;
        }

        let lower = trimmed.to_ascii_lowercase();
        let stem = lower.strip_suffix(".lgo").unwrap_or(&lower);
        Self::NAMED
            .iter()
            .find(|(known, _)| *known == stem)
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Model)
    }

    /// Canonical authored name
    pub fn name(self) -> &'static str {
        match self {
            Self::Rect => "Rect",
            Self::RectZ => "RectZ",
            Self::RectPlane => "RectPlane",
            Self::Triangle => "Triangle",
            Self::TrianglePlane => "TrianglePlane",
            Self::Cylinder => "Cylinder",
            Self::Cone => "Cone",
            Self::Sphere => "Sphere",
            Self::Model => "Model",
        }
    }

    /// Whether the primitive takes cylinder dimensions
    pub fn is_parametric(self) -> bool {
        matches!(self, Self::Cylinder | Self::Cone)
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sanitized cylinder dimensions, ready for mesh generation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct CylinderDimensions {
    /// Radial segments, at least [`MIN_CYLINDER_SEGMENTS`]
    pub segments: u32,
    /// Height along the primitive axis
    pub height: f32,
    /// Radius of the top cap
    pub top_radius: f32,
    /// Radius of the bottom cap
    pub bottom_radius: f32,
}

impl CylinderDimensions {
    /// Sanitize authored parameters
    ///
    /// A non-positive segment count takes the default; small positive counts
    /// are raised to the minimum. Non-finite dimensions take the defaults.
    pub fn from_params(params: &CylinderParams) -> Self {
        let segments = if params.segments <= 0 {
            DEFAULT_CYLINDER_SEGMENTS
        } else {
            (params.segments as u32).max(MIN_CYLINDER_SEGMENTS)
        };

        Self {
            segments,
            height: finite_or(params.height, DEFAULT_CYLINDER.height),
            top_radius: finite_or(params.top_radius, DEFAULT_CYLINDER.top_radius),
            bottom_radius: finite_or(params.bottom_radius, DEFAULT_CYLINDER.bottom_radius),
        }
    }

    /// Blend towards `next`; the segment count stays that of `self`
    pub fn interpolate(&self, next: &Self, fraction: f32) -> Self {
        Self {
            segments: self.segments,
            height: self.height.lerp_to(&next.height, fraction),
            top_radius: self.top_radius.lerp_to(&next.top_radius, fraction),
            bottom_radius: self.bottom_radius.lerp_to(&next.bottom_radius, fraction),
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Everything the renderer needs to build a sub-effect's primitive
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryDescriptor {
    /// Primitive kind
    pub kind: ShapeKind,
    /// Dimensions of parametric kinds
    pub cylinder: Option<CylinderDimensions>,
    /// Mesh name for [`ShapeKind::Model`]
    pub model_name: Option<String>,
}

impl GeometryDescriptor {
    /// Whether this is an external model mesh
    pub fn is_model(&self) -> bool {
        self.kind == ShapeKind::Model
    }
}

/// Resolve the primitive of `shape` at a keyframe position
///
/// Per-frame dimensions are interpolated between the current and next
/// frame when enabled; frames without their own entry use the static
/// dimensions.
pub fn resolve_geometry(shape: &ShapeSource, position: &FramePosition) -> GeometryDescriptor {
    let kind = shape.kind();

    let cylinder = kind.is_parametric().then(|| {
        let dimensions = cylinder_at(shape, position);
        if kind == ShapeKind::Cone {
            CylinderDimensions {
                top_radius: 0.0,
                ..dimensions
            }
        } else {
            dimensions
        }
    });

    let model_name = (kind == ShapeKind::Model).then(|| shape.name.trim().to_string());

    GeometryDescriptor {
        kind,
        cylinder,
        model_name,
    }
}

fn cylinder_at(shape: &ShapeSource, position: &FramePosition) -> CylinderDimensions {
    let static_params = if shape.cylinder == CylinderParams::default() {
        DEFAULT_CYLINDER
    } else {
        shape.cylinder
    };

    if !shape.per_frame || shape.frame_cylinders.is_empty() {
        return CylinderDimensions::from_params(&static_params);
    }

    let frame = |index: usize| {
        let params = shape.frame_cylinders.get(index).unwrap_or(&static_params);
        CylinderDimensions::from_params(params)
    };

    let current = frame(position.frame_index);
    if position.fraction <= 0.0 || position.next_frame_index == position.frame_index {
        return current;
    }
    current.interpolate(&frame(position.next_frame_index), position.fraction)
}
