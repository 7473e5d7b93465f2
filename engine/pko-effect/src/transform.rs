//! Transform composition
//!
//! Two independent jobs live here:
//!
//! - Placing a bounding volume on a skeleton attachment. The attachment is
//!   resolved through its ancestor chain to the nearest bone, whose skin
//!   matrix for the current tick positions it in the world.
//! - Orienting a sub-effect. Keyframe rotation, spin and billboarding are
//!   combined in a fixed precedence by the named `compose_*` functions.
//!
//! Matrices follow glam's column-vector convention, so "`a` applied before
//! `b`" is written `b * a`.

use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use thiserror::Error;

use crate::math::{axis_angle, yaw_pitch_roll};
use crate::model::{SpinParams, SubEffect};

/// A bone of the skeleton description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    /// Bone identifier
    pub id: u32,
    /// Identifier of the parent bone, if any
    pub parent_id: Option<u32>,
}

/// What an attachment hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum AttachmentParent {
    /// Directly parented to a bone
    Bone(u32),
    /// Parented to another attachment
    Attachment(u32),
    /// Free-standing
    None,
}

/// A named point on the skeleton (the legacy "dummy")
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Attachment {
    /// Attachment identifier
    pub id: u32,
    /// Parent node
    pub parent: AttachmentParent,
    /// Transform relative to the parent
    pub local_transform: Mat4,
}

/// Static description of a skeleton, built once per model
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct SkeletonDescription {
    /// Bones in skin-matrix order
    pub bones: Vec<Bone>,
    /// Attachment points
    pub attachments: Vec<Attachment>,
}

impl SkeletonDescription {
    /// Create a skeleton description
    pub fn new(bones: Vec<Bone>, attachments: Vec<Attachment>) -> Self {
        Self { bones, attachments }
    }

    /// Position of bone `id` in the bone list
    pub fn bone_index(&self, id: u32) -> Option<usize> {
        self.bones.iter().position(|bone| bone.id == id)
    }

    /// Attachment with identifier `id`
    pub fn attachment(&self, id: u32) -> Option<&Attachment> {
        self.attachments.iter().find(|attachment| attachment.id == id)
    }
}

/// A skeleton description with this tick's skin matrices
///
/// Skin matrices already include the inverse bind pose and are indexed by
/// the bone's position in [`SkeletonDescription::bones`].
#[derive(Debug, Clone, Copy)]
pub struct SkeletonPose<'a> {
    /// Static skeleton layout
    pub description: &'a SkeletonDescription,
    /// Skin matrix per bone
    pub skin_matrices: &'a [Mat4],
}

impl<'a> SkeletonPose<'a> {
    /// Pair a description with skin matrices
    pub fn new(description: &'a SkeletonDescription, skin_matrices: &'a [Mat4]) -> Self {
        Self {
            description,
            skin_matrices,
        }
    }
}

/// Why an attachment could not be placed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    /// No skeleton was supplied
    #[error("no skeleton available")]
    MissingSkeleton,

    /// The target attachment does not exist
    #[error("attachment {0} not found")]
    UnknownAttachment(u32),

    /// The ancestor chain ends without reaching a bone
    #[error("attachment {0} has no ancestor bone")]
    NoAncestorBone(u32),

    /// The ancestor bone is not in the bone list
    #[error("bone {0} not found in skeleton")]
    UnknownBone(u32),

    /// The bone has no skin matrix this tick
    #[error("bone {bone} has no skin matrix at index {index}")]
    MissingSkinMatrix {
        /// Bone identifier
        bone: u32,
        /// Index into the skin matrix list
        index: usize,
    },

    /// Attachments parent each other in a loop
    #[error("attachment parent cycle through {0}")]
    ParentCycle(u32),
}

/// World transform of attachment `target`, offset in world space
///
/// The attachment's local transform (and those of any intermediate
/// attachments) is applied first, then the ancestor bone's skin matrix,
/// then the offset translation.
pub fn resolve_attachment_world(
    skeleton: Option<&SkeletonPose<'_>>,
    target: u32,
    offset: Vec3,
) -> Result<Mat4, ResolveFailure> {
    let skeleton = skeleton.ok_or(ResolveFailure::MissingSkeleton)?;
    let description = skeleton.description;

    let mut local = Mat4::IDENTITY;
    let mut visited = HashSet::new();
    let mut current = description
        .attachment(target)
        .ok_or(ResolveFailure::UnknownAttachment(target))?;

    let bone_id = loop {
        if !visited.insert(current.id) {
            return Err(ResolveFailure::ParentCycle(current.id));
        }
        local = current.local_transform * local;

        match current.parent {
            AttachmentParent::Bone(bone_id) => break bone_id,
            AttachmentParent::Attachment(parent_id) => {
                current = description
                    .attachment(parent_id)
                    .ok_or(ResolveFailure::NoAncestorBone(target))?;
            }
            AttachmentParent::None => return Err(ResolveFailure::NoAncestorBone(target)),
        }
    };

    let index = description
        .bone_index(bone_id)
        .ok_or(ResolveFailure::UnknownBone(bone_id))?;
    let skin = skeleton
        .skin_matrices
        .get(index)
        .ok_or(ResolveFailure::MissingSkinMatrix {
            bone: bone_id,
            index,
        })?;

    Ok(Mat4::from_translation(offset) * *skin * local)
}

/// Keeps a bounding volume on its attachment across ticks
///
/// When resolution fails the previous transform stays in place and the
/// failure is logged once for the lifetime of the tracker.
#[derive(Debug, Clone)]
pub struct BoundingVolumeTracker {
    target: u32,
    offset: Vec3,
    last: Option<Mat4>,
    warned: bool,
}

impl BoundingVolumeTracker {
    /// Track attachment `target` with a world-space `offset`
    pub fn new(target: u32, offset: Vec3) -> Self {
        Self {
            target,
            offset,
            last: None,
            warned: false,
        }
    }

    /// Attachment being tracked
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Re-resolve against this tick's pose and return the current transform
    pub fn update(&mut self, skeleton: Option<&SkeletonPose<'_>>) -> Mat4 {
        match resolve_attachment_world(skeleton, self.target, self.offset) {
            Ok(world) => self.last = Some(world),
            Err(failure) => {
                if !self.warned {
                    log::warn!(
                        "Bounding volume on attachment {} not updated: {}",
                        self.target,
                        failure
                    );
                    self.warned = true;
                } else {
                    log::trace!("Attachment {} still unresolved: {}", self.target, failure);
                }
            }
        }
        self.transform()
    }

    /// Last successfully resolved transform (identity before the first)
    pub fn transform(&self) -> Mat4 {
        self.last.unwrap_or(Mat4::IDENTITY)
    }

    /// Whether the target has resolved at least once
    pub fn has_resolved(&self) -> bool {
        self.last.is_some()
    }

    /// Whether a resolution failure has been reported
    pub fn has_warned(&self) -> bool {
        self.warned
    }
}

/// Spin rotation for an accumulated `angle`; identity when disabled
pub fn spin_rotation(spin: &SpinParams, angle: f32) -> Quat {
    if !spin.enabled {
        return Quat::IDENTITY;
    }
    axis_angle(spin.axis, angle)
}

/// Spin applied on the outside of the base orientation
pub fn compose_spin_then_base(spin: Quat, base: Quat) -> Quat {
    spin * base
}

/// Face the viewer while keeping the inner orientation
pub fn compose_billboard_preserving_inner(face: Quat, saved: Quat) -> Quat {
    face * saved
}

/// Orientation that faces the viewpoint
///
/// A billboard takes on the camera's rotation; a degenerate camera
/// rotation gives identity.
pub fn face_viewpoint(camera_rotation: Quat) -> Quat {
    if !camera_rotation.is_finite() || camera_rotation.length_squared() <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    camera_rotation.normalize()
}

/// Whether billboarding applies to `sub`; never for external model meshes
pub fn billboard_active(sub: &SubEffect) -> bool {
    sub.billboard && !sub.is_model_mesh()
}

/// Whether spin applies to `sub`
///
/// A billboard that does not preserve spin drops it entirely.
pub fn spin_active(sub: &SubEffect) -> bool {
    sub.spin.enabled && !(billboard_active(sub) && !sub.preserve_spin)
}

/// Final orientation of a sub-effect
///
/// `rotation` is the interpolated keyframe rotation and `spin_angle` the
/// accumulated spin angle.
pub fn sub_effect_orientation(
    sub: &SubEffect,
    rotation: Vec3,
    spin_angle: f32,
    camera_rotation: Quat,
) -> Quat {
    let base = yaw_pitch_roll(rotation);

    let saved = if spin_active(sub) {
        compose_spin_then_base(spin_rotation(&sub.spin, spin_angle), base)
    } else {
        base
    };

    if !billboard_active(sub) {
        return saved;
    }

    let face = face_viewpoint(camera_rotation);
    if sub.preserve_spin {
        compose_billboard_preserving_inner(face, saved)
    } else {
        face
    }
}

/// Effect-level spin accumulator
///
/// Applied to the group holding all sub-effects of an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSpin {
    angle: f32,
    rotation: Quat,
}

impl EffectSpin {
    /// A spin at rest
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            rotation: Quat::IDENTITY,
        }
    }

    /// Advance by `dt` seconds; disabled spin snaps back to identity
    pub fn advance(&mut self, spin: &SpinParams, dt: f32) -> Quat {
        if !spin.enabled {
            self.reset();
            return self.rotation;
        }

        let step = dt * spin.angular_velocity;
        if step.is_finite() {
            self.angle = (self.angle + step).rem_euclid(TAU);
        }
        self.rotation = axis_angle(spin.axis, self.angle);
        self.rotation
    }

    /// Rotation at `elapsed` seconds without accumulating
    pub fn at(spin: &SpinParams, elapsed: f32) -> Quat {
        let angle = elapsed * spin.angular_velocity;
        if !angle.is_finite() {
            return Quat::IDENTITY;
        }
        spin_rotation(spin, angle.rem_euclid(TAU))
    }

    /// Return to identity
    pub fn reset(&mut self) {
        self.angle = 0.0;
        self.rotation = Quat::IDENTITY;
    }

    /// Accumulated angle in radians, in [0, 2π)
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Current rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }
}

impl Default for EffectSpin {
    fn default() -> Self {
        Self::new()
    }
}
