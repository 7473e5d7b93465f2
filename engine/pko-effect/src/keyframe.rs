//! Keyframe interpolation for sub-effect channels
//!
//! Size, rotation, position and color are interpolated linearly between the
//! frame a playback time falls into and the frame after it. Color alpha goes
//! through the same lerp as the other components. The texture frame index is
//! stepped on its own timer and never interpolated.

use glam::{Vec3, Vec4};

use crate::config::PlaybackOptions;
use crate::math::Lerp;
use crate::model::{DEFAULT_COLOR, DEFAULT_POSITION, DEFAULT_ROTATION, DEFAULT_SIZE, SubEffect};
use crate::timeline::{FramePosition, FrameTimeline, step_index};

/// Channel values of a sub-effect at one playback time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedFrame {
    /// Interpolated scale
    pub size: Vec3,
    /// Interpolated Euler rotation
    pub rotation: Vec3,
    /// Interpolated position
    pub position: Vec3,
    /// Interpolated RGBA color
    pub color: Vec4,
    /// Frame the time falls into
    pub frame_index: usize,
    /// Frame interpolated towards
    pub next_frame_index: usize,
    /// Progress through `frame_index`, in [0, 1)
    pub fraction: f32,
    /// Whole-texture frame, stepped independently
    pub texture_frame_index: usize,
}

impl InterpolatedFrame {
    /// Values of a sub-effect without frames
    pub const DEFAULT: Self = Self {
        size: DEFAULT_SIZE,
        rotation: DEFAULT_ROTATION,
        position: DEFAULT_POSITION,
        color: DEFAULT_COLOR,
        frame_index: 0,
        next_frame_index: 0,
        fraction: 0.0,
        texture_frame_index: 0,
    };

    /// Alpha channel of the interpolated color
    pub fn alpha(&self) -> f32 {
        self.color.w
    }
}

impl Default for InterpolatedFrame {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Interpolate a sub-effect at `time` with the legacy frame durations
pub fn interpolate(sub: &SubEffect, time: f32, looping: bool) -> InterpolatedFrame {
    let options = PlaybackOptions {
        looping,
        ..PlaybackOptions::default()
    };
    let timeline = sub.timeline(&options);
    interpolate_on(sub, &timeline, time, &options)
}

/// Interpolate a sub-effect on an already resolved timeline
pub fn interpolate_on(
    sub: &SubEffect,
    timeline: &FrameTimeline,
    time: f32,
    options: &PlaybackOptions,
) -> InterpolatedFrame {
    let texture_frame_index = texture_frame_index(sub, time, options);

    match timeline.frame_count() {
        0 => InterpolatedFrame {
            texture_frame_index,
            ..InterpolatedFrame::DEFAULT
        },
        1 => InterpolatedFrame {
            size: sub.size_at(0),
            rotation: sub.rotation_at(0),
            position: sub.position_at(0),
            color: sub.color_at(0),
            texture_frame_index,
            ..InterpolatedFrame::DEFAULT
        },
        _ => {
            let position = timeline.locate(time, options.looping);
            blend_frames(sub, position, texture_frame_index)
        }
    }
}

fn blend_frames(
    sub: &SubEffect,
    position: FramePosition,
    texture_frame_index: usize,
) -> InterpolatedFrame {
    let FramePosition {
        frame_index,
        next_frame_index,
        fraction,
    } = position;

    InterpolatedFrame {
        size: sub.size_at(frame_index).lerp_to(&sub.size_at(next_frame_index), fraction),
        rotation: sub
            .rotation_at(frame_index)
            .lerp_to(&sub.rotation_at(next_frame_index), fraction),
        position: sub
            .position_at(frame_index)
            .lerp_to(&sub.position_at(next_frame_index), fraction),
        color: sub.color_at(frame_index).lerp_to(&sub.color_at(next_frame_index), fraction),
        frame_index,
        next_frame_index,
        fraction,
        texture_frame_index,
    }
}

/// Whole-texture frame index at `time`
///
/// Steps through the texture name list at the texture frame rate with the
/// same loop/clamp rule as the keyframes. Zero when there are no names.
pub fn texture_frame_index(sub: &SubEffect, time: f32, options: &PlaybackOptions) -> usize {
    step_index(
        time,
        sub.uv.frame_tex_time,
        sub.uv.frame_textures.len(),
        options.looping,
        options.default_duration(),
    )
    .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_frame_effect() -> SubEffect {
        SubEffect {
            frame_count: 2,
            frame_durations: vec![1.0, 1.0],
            frame_sizes: vec![Vec3::ONE, Vec3::splat(3.0)],
            frame_rotations: vec![Vec3::ZERO, Vec3::new(0.6, 0.0, 0.0)],
            frame_positions: vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
            frame_colors: vec![Vec4::ONE, Vec4::new(1.0, 1.0, 1.0, 0.0)],
            ..SubEffect::new("two-frame")
        }
    }

    #[test]
    fn test_midpoint_interpolation() {
        let frame = interpolate(&two_frame_effect(), 0.5, false);
        assert!((frame.size.x - 2.0).abs() < 1e-5);
        assert!((frame.position.x - 5.0).abs() < 1e-5);
        assert!((frame.rotation.x - 0.3).abs() < 1e-5);
        assert!((frame.alpha() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_time_zero_is_frame_zero() {
        let sub = two_frame_effect();
        let frame = interpolate(&sub, 0.0, false);
        assert_eq!(frame.size, sub.frame_sizes[0]);
        assert_eq!(frame.rotation, sub.frame_rotations[0]);
        assert_eq!(frame.position, sub.frame_positions[0]);
        assert_eq!(frame.color, sub.frame_colors[0]);
        assert_eq!(frame.fraction, 0.0);
    }

    #[test]
    fn test_last_frame_not_looping_holds() {
        let sub = two_frame_effect();
        let frame = interpolate(&sub, 1.5, false);
        assert_eq!(frame.frame_index, 1);
        assert_eq!(frame.next_frame_index, 1);
        assert_eq!(frame.size, Vec3::splat(3.0));
    }

    #[test]
    fn test_last_frame_looping_blends_to_first() {
        let frame = interpolate(&two_frame_effect(), 1.5, true);
        assert_eq!(frame.frame_index, 1);
        assert_eq!(frame.next_frame_index, 0);
        assert!((frame.size.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_single_frame_is_constant() {
        let sub = SubEffect {
            frame_count: 1,
            frame_durations: vec![0.2],
            frame_sizes: vec![Vec3::splat(4.0)],
            frame_colors: vec![Vec4::new(0.1, 0.2, 0.3, 0.4)],
            ..SubEffect::new("single")
        };

        for time in [0.0, 0.1, 0.2, 5.0, 1000.0] {
            for looping in [false, true] {
                let frame = interpolate(&sub, time, looping);
                assert_eq!(frame.size, Vec3::splat(4.0));
                assert_eq!(frame.color, Vec4::new(0.1, 0.2, 0.3, 0.4));
                assert_eq!(frame.fraction, 0.0);
                assert_eq!(frame.frame_index, 0);
            }
        }
    }

    #[test]
    fn test_zero_frames_use_defaults() {
        let frame = interpolate(&SubEffect::new("empty"), 3.0, true);
        assert_eq!(frame, InterpolatedFrame::DEFAULT);
    }

    #[test]
    fn test_empty_channel_arrays_use_defaults() {
        let sub = SubEffect {
            frame_count: 3,
            ..SubEffect::new("no-data")
        };
        let frame = interpolate(&sub, 0.05, true);
        assert_eq!(frame.size, DEFAULT_SIZE);
        assert_eq!(frame.color, DEFAULT_COLOR);
        assert_eq!(frame.frame_index, 1);
    }

    #[test]
    fn test_texture_frame_index_independent() {
        let mut sub = two_frame_effect();
        sub.uv.frame_tex_time = 0.25;
        sub.uv.frame_textures = vec!["a".into(), "b".into(), "c".into()];

        let options = PlaybackOptions::once();
        assert_eq!(texture_frame_index(&sub, 0.0, &options), 0);
        assert_eq!(texture_frame_index(&sub, 0.3, &options), 1);
        assert_eq!(texture_frame_index(&sub, 0.6, &options), 2);
        assert_eq!(texture_frame_index(&sub, 5.0, &options), 2);

        let frame = interpolate(&sub, 0.6, true);
        assert_eq!(frame.texture_frame_index, 2);
        assert_eq!(frame.frame_index, 0);
        assert_eq!(interpolate(&sub, 0.8, true).texture_frame_index, 0);
    }
}
