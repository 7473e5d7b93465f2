//! Interpolation and rotation helpers shared by the evaluators

use glam::{EulerRot, Quat, Vec2, Vec3, Vec4};

/// Trait for types that can be linearly interpolated
///
/// Implemented as `a + (b - a) * t` so that `t == 0.0` reproduces `a`
/// bit-for-bit, which the frame-zero guarantees depend on.
pub trait Lerp: Clone {
    /// Linear interpolation between self and other
    fn lerp_to(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        Self::new(self.x.lerp_to(&other.x, t), self.y.lerp_to(&other.y, t))
    }
}

impl Lerp for Vec3 {
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        Self::new(
            self.x.lerp_to(&other.x, t),
            self.y.lerp_to(&other.y, t),
            self.z.lerp_to(&other.z, t),
        )
    }
}

impl Lerp for Vec4 {
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        Self::new(
            self.x.lerp_to(&other.x, t),
            self.y.lerp_to(&other.y, t),
            self.z.lerp_to(&other.z, t),
            self.w.lerp_to(&other.w, t),
        )
    }
}

/// Legacy yaw-pitch-roll rotation
///
/// `rotation.y` is yaw (about Y), `rotation.x` is pitch (about X) and
/// `rotation.z` is roll (about Z), applied intrinsically yaw, then pitch,
/// then roll.
pub fn yaw_pitch_roll(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

/// Rotation of `angle` radians about `axis`; a degenerate axis yields identity
pub fn axis_angle(axis: Vec3, angle: f32) -> Quat {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO || !angle.is_finite() {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis, angle)
}

/// `numerator / denominator`, or `fallback` when the division is not finite
pub fn ratio_or(numerator: f32, denominator: f32, fallback: f32) -> f32 {
    if denominator.is_finite() && denominator.abs() > f32::EPSILON {
        let ratio = numerator / denominator;
        if ratio.is_finite() {
            return ratio;
        }
    }
    fallback
}

/// Playback time with negative and non-finite values clamped to zero
pub(crate) fn sanitize_time(time: f32) -> f32 {
    if time.is_finite() && time > 0.0 {
        time
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 20.0, 30.0);

        let mid = a.lerp_to(&b, 0.5);
        assert!((mid.x - 5.0).abs() < 0.001);
        assert!((mid.y - 10.0).abs() < 0.001);
        assert!((mid.z - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_at_zero_is_exact() {
        let a = Vec4::new(0.1, 0.2, 0.3, 0.7);
        let b = Vec4::new(0.9, 0.8, 0.7, 0.1);
        assert_eq!(a.lerp_to(&b, 0.0), a);
    }

    #[test]
    fn test_yaw_pitch_roll_identity() {
        let q = yaw_pitch_roll(Vec3::ZERO);
        assert!(q.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_yaw_is_about_y() {
        let q = yaw_pitch_roll(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let v = q * Vec3::X;
        assert!(v.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_yaw_applied_before_pitch() {
        // Intrinsic yaw then pitch: the pitch axis is the yawed X axis.
        let rotation = Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0);
        let q = yaw_pitch_roll(rotation);
        let expected = Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(FRAC_PI_2);
        assert!(q.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_axis_angle_zero_axis() {
        assert_eq!(axis_angle(Vec3::ZERO, 1.0), Quat::IDENTITY);
    }

    #[test]
    fn test_ratio_guard() {
        assert_eq!(ratio_or(1.0, 0.0, 0.25), 0.25);
        assert_eq!(ratio_or(1.0, f32::NAN, 0.25), 0.25);
        assert_eq!(ratio_or(3.0, 4.0, 0.0), 0.75);
    }

    #[test]
    fn test_sanitize_time() {
        assert_eq!(sanitize_time(-1.0), 0.0);
        assert_eq!(sanitize_time(f32::NAN), 0.0);
        assert_eq!(sanitize_time(f32::INFINITY), 0.0);
        assert_eq!(sanitize_time(2.5), 2.5);
    }
}
