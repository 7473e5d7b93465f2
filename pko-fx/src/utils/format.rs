//! Formatting utilities

use glam::{Quat, Vec3, Vec4};

/// Format a vector with three decimals per component
pub fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Format an RGBA color with three decimals per component
pub fn format_color(c: Vec4) -> String {
    format!("({:.3}, {:.3}, {:.3}, {:.3})", c.x, c.y, c.z, c.w)
}

/// Format a rotation as yaw/pitch/roll in degrees
pub fn format_rotation(q: Quat) -> String {
    let (yaw, pitch, roll) = q.to_euler(glam::EulerRot::YXZ);
    format!(
        "yaw {:.1}° pitch {:.1}° roll {:.1}°",
        yaw.to_degrees(),
        pitch.to_degrees(),
        roll.to_degrees()
    )
}

/// Format a duration in seconds
pub fn format_seconds(seconds: f32) -> String {
    format!("{seconds:.3}s")
}
