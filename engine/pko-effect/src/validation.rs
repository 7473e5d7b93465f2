//! Structural checks for effect data
//!
//! Evaluation tolerates malformed data by falling back to defaults. These
//! checks report the places where that fallback would kick in, so editors
//! and tooling can flag them before playback.

use glam::Vec3;

use crate::blend::BlendFactor;
use crate::error::{EffectError, Result};
use crate::geometry::MIN_CYLINDER_SEGMENTS;
use crate::model::{EffectFile, SpinParams, SubEffect};
use crate::uv_animation::UvAnimationMode;

const AXIS_TOLERANCE: f32 = 1e-3;

/// Report of validation results
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Data the evaluators would have to replace
    pub errors: Vec<ValidationError>,

    /// Data that plays, but probably not as intended
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the report
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning to the report
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether nothing was found
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Turn the first error into an [`EffectError`]
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            Some(error) => Err(EffectError::ValidationError(error.to_string())),
            None => Ok(()),
        }
    }
}

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A frame array is neither empty nor one entry per frame
    CountMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A UV frame has a different vertex count than declared
    VertexCountMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A value outside its valid range
    InvalidValue {
        field: String,
        value: String,
        explanation: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CountMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Count mismatch for {field}: expected 0 or {expected}, found {actual}"
            ),
            Self::VertexCountMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Vertex count mismatch in {field}: expected {expected}, found {actual}"
            ),
            Self::InvalidValue {
                field,
                value,
                explanation,
            } => write!(f, "Invalid value in {field}: {value} ({explanation})"),
        }
    }
}

/// Validation warning types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A legacy code with no meaning, replaced by a fallback
    UnknownCode {
        field: String,
        code: i32,
        fallback: String,
    },

    /// Unusual value
    UnusualValue {
        field: String,
        value: String,
        explanation: String,
    },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCode {
                field,
                code,
                fallback,
            } => write!(f, "Unknown code {code} in {field}, using {fallback}"),
            Self::UnusualValue {
                field,
                value,
                explanation,
            } => write!(f, "Unusual value in {field}: {value} ({explanation})"),
        }
    }
}

impl SubEffect {
    /// Check this sub-effect's frame data
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        validate_sub_effect(self, "", &mut report);
        report
    }
}

impl EffectFile {
    /// Check every sub-effect plus the effect-level spin and path
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (i, sub) in self.sub_effects.iter().enumerate() {
            validate_sub_effect(sub, &format!("sub_effects[{i}]."), &mut report);
        }
        validate_spin(&self.spin, "spin", &mut report);

        if let Some(path) = &self.path
            && !(path.velocity.is_finite() && path.velocity > 0.0)
        {
            report.add_warning(ValidationWarning::UnusualValue {
                field: "path.velocity".to_string(),
                value: path.velocity.to_string(),
                explanation: "the effect will not move along its path".to_string(),
            });
        }

        report
    }

    /// Validate and fail on the first error
    pub fn validate_strict(&self) -> Result<()> {
        let report = self.validate();
        for warning in &report.warnings {
            log::debug!("Effect '{}': {}", self.name, warning);
        }
        report.into_result()
    }
}

fn validate_sub_effect(sub: &SubEffect, prefix: &str, report: &mut ValidationReport) {
    let frame_count = sub.frame_count();
    let field = |name: &str| format!("{prefix}{name}");

    let channels = [
        ("frame_durations", sub.frame_durations.len()),
        ("frame_sizes", sub.frame_sizes.len()),
        ("frame_rotations", sub.frame_rotations.len()),
        ("frame_positions", sub.frame_positions.len()),
        ("frame_colors", sub.frame_colors.len()),
    ];
    for (name, actual) in channels {
        if actual != 0 && actual != frame_count {
            report.add_error(ValidationError::CountMismatch {
                field: field(name),
                expected: frame_count,
                actual,
            });
        }
    }

    for (i, &duration) in sub.frame_durations.iter().enumerate() {
        if !duration.is_finite() || duration < 0.0 {
            report.add_error(ValidationError::InvalidValue {
                field: field(&format!("frame_durations[{i}]")),
                value: duration.to_string(),
                explanation: "durations must be finite and non-negative".to_string(),
            });
        }
    }

    for (i, color) in sub.frame_colors.iter().enumerate() {
        if color.min_element() < 0.0 || color.max_element() > 1.0 {
            report.add_warning(ValidationWarning::UnusualValue {
                field: field(&format!("frame_colors[{i}]")),
                value: format!("{color}"),
                explanation: "color components outside 0..1".to_string(),
            });
        }
    }

    validate_blend_code(sub.src_blend, &field("src_blend"), report);
    validate_blend_code(sub.dest_blend, &field("dest_blend"), report);
    validate_uv(sub, prefix, report);
    validate_shape(sub, prefix, report);
    validate_spin(&sub.spin, &field("spin"), report);
}

fn validate_blend_code(code: i32, field: &str, report: &mut ValidationReport) {
    if !(1..=11).contains(&code) {
        report.add_warning(ValidationWarning::UnknownCode {
            field: field.to_string(),
            code,
            fallback: BlendFactor::FALLBACK.name().to_string(),
        });
    }
}

fn validate_uv(sub: &SubEffect, prefix: &str, report: &mut ValidationReport) {
    let uv = &sub.uv;
    let mode = uv.mode();

    if mode == UvAnimationMode::Disabled && uv.mode != 0 {
        report.add_warning(ValidationWarning::UnknownCode {
            field: format!("{prefix}uv.mode"),
            code: uv.mode,
            fallback: "no UV animation".to_string(),
        });
    }

    let declared = uv.vertex_count as usize;
    if declared > 0 {
        let frame_sets = [("coord_frames", &uv.coord_frames), ("tex_frames", &uv.tex_frames)];
        for (name, frames) in frame_sets {
            for (i, frame) in frames.iter().enumerate() {
                if frame.len() != declared {
                    report.add_error(ValidationError::VertexCountMismatch {
                        field: format!("{prefix}uv.{name}[{i}]"),
                        expected: declared,
                        actual: frame.len(),
                    });
                }
            }
        }
    }

    let (time_field, frame_time, count) = match mode {
        UvAnimationMode::Continuous => ("coord_frame_time", uv.coord_frame_time, uv.coord_frames.len()),
        UvAnimationMode::Discrete => ("tex_frame_time", uv.tex_frame_time, uv.tex_frames.len()),
        UvAnimationMode::TextureSwap => ("frame_tex_time", uv.frame_tex_time, uv.frame_textures.len()),
        UvAnimationMode::Disabled => return,
    };

    if count == 0 {
        report.add_warning(ValidationWarning::UnusualValue {
            field: format!("{prefix}uv"),
            value: mode.code().to_string(),
            explanation: "animation mode set but no frames to animate".to_string(),
        });
    } else if !(frame_time.is_finite() && frame_time > 0.0) {
        report.add_warning(ValidationWarning::UnusualValue {
            field: format!("{prefix}uv.{time_field}"),
            value: frame_time.to_string(),
            explanation: "non-positive frame time, the default is used".to_string(),
        });
    }
}

fn validate_shape(sub: &SubEffect, prefix: &str, report: &mut ValidationReport) {
    let shape = &sub.shape;
    if !shape.kind().is_parametric() {
        return;
    }

    if (1..MIN_CYLINDER_SEGMENTS as i32).contains(&shape.cylinder.segments) {
        report.add_warning(ValidationWarning::UnusualValue {
            field: format!("{prefix}shape.cylinder.segments"),
            value: shape.cylinder.segments.to_string(),
            explanation: format!("raised to {MIN_CYLINDER_SEGMENTS}"),
        });
    }

    if !shape.per_frame {
        return;
    }

    let frame_count = sub.frame_count();
    if shape.frame_cylinders.len() != frame_count {
        report.add_error(ValidationError::CountMismatch {
            field: format!("{prefix}shape.frame_cylinders"),
            expected: frame_count,
            actual: shape.frame_cylinders.len(),
        });
    }

    for (i, params) in shape.frame_cylinders.iter().enumerate() {
        if params.segments < MIN_CYLINDER_SEGMENTS as i32 {
            report.add_error(ValidationError::InvalidValue {
                field: format!("{prefix}shape.frame_cylinders[{i}].segments"),
                value: params.segments.to_string(),
                explanation: format!("at least {MIN_CYLINDER_SEGMENTS} segments required"),
            });
        }
    }
}

fn validate_spin(spin: &SpinParams, field: &str, report: &mut ValidationReport) {
    if !spin.enabled {
        return;
    }

    let length = spin.axis.length();
    if spin.axis == Vec3::ZERO || !length.is_finite() {
        report.add_warning(ValidationWarning::UnusualValue {
            field: format!("{field}.axis"),
            value: format!("{}", spin.axis),
            explanation: "degenerate axis, spin has no effect".to_string(),
        });
    } else if (length - 1.0).abs() > AXIS_TOLERANCE {
        report.add_warning(ValidationWarning::UnusualValue {
            field: format!("{field}.axis"),
            value: format!("{}", spin.axis),
            explanation: "axis is not normalized".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CylinderParams, PathReference, ShapeSource};
    use glam::{Vec2, Vec4};

    fn valid_sub() -> SubEffect {
        SubEffect {
            frame_count: 2,
            frame_durations: vec![0.5, 0.5],
            frame_sizes: vec![Vec3::ONE, Vec3::ONE],
            frame_colors: vec![Vec4::ONE, Vec4::ZERO],
            ..SubEffect::new("ok")
        }
    }

    #[test]
    fn test_clean_sub_effect() {
        let report = valid_sub().validate();
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn test_count_mismatch() {
        let mut sub = valid_sub();
        sub.frame_positions = vec![Vec3::ZERO];

        let report = sub.validate();
        assert_eq!(
            report.errors,
            vec![ValidationError::CountMismatch {
                field: "frame_positions".to_string(),
                expected: 2,
                actual: 1,
            }]
        );
    }

    #[test]
    fn test_negative_duration() {
        let mut sub = valid_sub();
        sub.frame_durations[1] = -0.1;
        assert!(sub.validate().has_errors());
    }

    #[test]
    fn test_uv_vertex_count() {
        let mut sub = valid_sub();
        sub.uv.mode = 2;
        sub.uv.vertex_count = 4;
        sub.uv.coord_frame_time = 0.1;
        sub.uv.coord_frames = vec![vec![Vec2::ZERO; 4], vec![Vec2::ZERO; 3]];

        let report = sub.validate();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].to_string().contains("uv.coord_frames[1]"));
    }

    #[test]
    fn test_per_frame_cylinder_checks() {
        let mut sub = valid_sub();
        sub.shape = ShapeSource {
            per_frame: true,
            frame_cylinders: vec![CylinderParams::new(2, 1.0, 1.0, 1.0)],
            ..ShapeSource::named("Cylinder")
        };

        let report = sub.validate();
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_warnings() {
        let mut sub = valid_sub();
        sub.src_blend = 42;
        sub.spin = SpinParams::new(Vec3::new(0.0, 2.0, 0.0), 1.0);
        sub.uv.mode = 9;

        let report = sub.validate();
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_effect_strict() {
        let mut effect = EffectFile::new("fx");
        effect.sub_effects.push(valid_sub());
        effect.path = Some(PathReference {
            name: "p".to_string(),
            velocity: 0.0,
        });
        assert!(effect.validate_strict().is_ok());
        assert!(effect.validate().has_warnings());

        effect.sub_effects[0].frame_sizes.pop();
        let err = effect.validate_strict().unwrap_err();
        assert!(matches!(err, EffectError::ValidationError(msg) if msg.contains("sub_effects[0].frame_sizes")));
    }
}
