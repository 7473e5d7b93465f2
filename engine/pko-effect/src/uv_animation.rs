//! UV and texture animation
//!
//! Three mutually exclusive modes, picked by the sub-effect's mode code:
//!
//! - **Continuous**: per-vertex UVs lerped between consecutive coordinate
//!   frames.
//! - **Discrete**: one coordinate frame chosen by flooring, copied verbatim.
//! - **Texture swap**: a texture name chosen by flooring; the renderer swaps
//!   the bound texture instead of touching coordinates.
//!
//! Each mode runs on its own frame duration and honors the loop/clamp rule
//! of the keyframe timeline.

use glam::Vec2;

use crate::config::PlaybackOptions;
use crate::math::Lerp;
use crate::model::SubEffect;
use crate::timeline::{step_index, step_position};

/// UV animation mode of a sub-effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UvAnimationMode {
    /// No UV animation
    #[default]
    Disabled,
    /// Swap the whole texture per frame (code 1)
    TextureSwap,
    /// Interpolate per-vertex coordinates (code 2)
    Continuous,
    /// Snap to per-vertex coordinate frames (code 3)
    Discrete,
}

impl UvAnimationMode {
    /// Translate a legacy mode code; unknown codes disable animation
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::TextureSwap,
            2 => Self::Continuous,
            3 => Self::Discrete,
            _ => Self::Disabled,
        }
    }

    /// Legacy code of this mode (0 when disabled)
    pub fn code(self) -> i32 {
        match self {
            Self::Disabled => 0,
            Self::TextureSwap => 1,
            Self::Continuous => 2,
            Self::Discrete => 3,
        }
    }
}

/// Texture chosen by the whole-texture swap timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSwap {
    /// Index into the texture name list
    pub index: usize,
    /// Texture name to bind
    pub name: String,
}

/// Result of UV animation for one playback time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UvAnimation {
    /// Nothing to apply
    #[default]
    None,
    /// Replace the primitive's texture coordinates
    Coordinates(Vec<Vec2>),
    /// Bind a different texture
    Texture(TextureSwap),
}

/// Resolve whichever UV animation the sub-effect's mode selects
pub fn resolve(sub: &SubEffect, time: f32, options: &PlaybackOptions) -> UvAnimation {
    let resolved = match sub.uv.mode() {
        UvAnimationMode::Disabled => None,
        UvAnimationMode::Continuous => continuous_uvs(sub, time, options).map(UvAnimation::Coordinates),
        UvAnimationMode::Discrete => discrete_uvs(sub, time, options).map(UvAnimation::Coordinates),
        UvAnimationMode::TextureSwap => texture_swap(sub, time, options).map(UvAnimation::Texture),
    };
    resolved.unwrap_or_default()
}

/// Continuous mode: per-vertex UVs interpolated between coordinate frames
pub fn continuous_uvs(sub: &SubEffect, time: f32, options: &PlaybackOptions) -> Option<Vec<Vec2>> {
    if sub.uv.mode() != UvAnimationMode::Continuous {
        return None;
    }

    let frames = &sub.uv.coord_frames;
    let position = step_position(
        time,
        sub.uv.coord_frame_time,
        frames.len(),
        options.looping,
        options.default_duration(),
    )?;

    let current = &frames[position.frame_index];
    let next = &frames[position.next_frame_index];
    let vertex_count = declared_vertex_count(sub, current.len());

    Some(
        (0..vertex_count)
            .map(|vertex| {
                let from = current.get(vertex).copied().unwrap_or(Vec2::ZERO);
                let to = next.get(vertex).copied().unwrap_or(from);
                from.lerp_to(&to, position.fraction)
            })
            .collect(),
    )
}

/// Discrete mode: one coordinate frame, copied without blending
pub fn discrete_uvs(sub: &SubEffect, time: f32, options: &PlaybackOptions) -> Option<Vec<Vec2>> {
    if sub.uv.mode() != UvAnimationMode::Discrete {
        return None;
    }

    let frames = &sub.uv.tex_frames;
    let index = step_index(
        time,
        sub.uv.tex_frame_time,
        frames.len(),
        options.looping,
        options.default_duration(),
    )?;

    let frame = &frames[index];
    let vertex_count = declared_vertex_count(sub, frame.len());
    Some(
        (0..vertex_count)
            .map(|vertex| frame.get(vertex).copied().unwrap_or(Vec2::ZERO))
            .collect(),
    )
}

/// Texture-swap mode: the texture to bind at `time`
pub fn texture_swap(sub: &SubEffect, time: f32, options: &PlaybackOptions) -> Option<TextureSwap> {
    if sub.uv.mode() != UvAnimationMode::TextureSwap {
        return None;
    }

    let names = &sub.uv.frame_textures;
    let index = step_index(
        time,
        sub.uv.frame_tex_time,
        names.len(),
        options.looping,
        options.default_duration(),
    )?;

    Some(TextureSwap {
        index,
        name: names[index].clone(),
    })
}

fn declared_vertex_count(sub: &SubEffect, frame_len: usize) -> usize {
    match sub.uv.vertex_count as usize {
        0 => frame_len,
        declared => declared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UvAnimationData;
    use pretty_assertions::assert_eq;

    fn uv_frames() -> Vec<Vec<Vec2>> {
        vec![
            vec![Vec2::new(0.0, 0.0), Vec2::new(0.25, 0.0)],
            vec![Vec2::new(0.25, 0.0), Vec2::new(0.5, 0.0)],
            vec![Vec2::new(0.5, 0.0), Vec2::new(0.75, 0.0)],
        ]
    }

    fn sub_with(uv: UvAnimationData) -> SubEffect {
        SubEffect {
            uv,
            ..SubEffect::new("uv")
        }
    }

    #[test]
    fn test_mode_codes() {
        assert_eq!(UvAnimationMode::from_code(1), UvAnimationMode::TextureSwap);
        assert_eq!(UvAnimationMode::from_code(2), UvAnimationMode::Continuous);
        assert_eq!(UvAnimationMode::from_code(3), UvAnimationMode::Discrete);
        assert_eq!(UvAnimationMode::from_code(0), UvAnimationMode::Disabled);
        assert_eq!(UvAnimationMode::from_code(4), UvAnimationMode::Disabled);
    }

    #[test]
    fn test_discrete_snaps() {
        let sub = sub_with(UvAnimationData {
            mode: 3,
            vertex_count: 2,
            tex_frame_time: 0.5,
            tex_frames: uv_frames(),
            ..UvAnimationData::default()
        });
        let options = PlaybackOptions::once();

        assert_eq!(discrete_uvs(&sub, 0.4, &options), Some(uv_frames()[0].clone()));
        assert_eq!(discrete_uvs(&sub, 0.5, &options), Some(uv_frames()[1].clone()));
        assert_eq!(discrete_uvs(&sub, 30.0, &options), Some(uv_frames()[2].clone()));
    }

    #[test]
    fn test_continuous_interpolates() {
        let sub = sub_with(UvAnimationData {
            mode: 2,
            vertex_count: 2,
            coord_frame_time: 1.0,
            coord_frames: uv_frames(),
            ..UvAnimationData::default()
        });

        let uvs = continuous_uvs(&sub, 0.5, &PlaybackOptions::once()).expect("continuous mode");
        assert!((uvs[0].x - 0.125).abs() < 1e-6);
        assert!((uvs[1].x - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_continuous_last_frame_wraps_when_looping() {
        let sub = sub_with(UvAnimationData {
            mode: 2,
            coord_frame_time: 1.0,
            coord_frames: uv_frames(),
            ..UvAnimationData::default()
        });

        let uvs = continuous_uvs(&sub, 2.5, &PlaybackOptions::looping()).expect("continuous mode");
        assert!((uvs[0].x - 0.25).abs() < 1e-6);

        let held = continuous_uvs(&sub, 2.5, &PlaybackOptions::once()).expect("continuous mode");
        assert_eq!(held, uv_frames()[2]);
    }

    #[test]
    fn test_mode_mismatch_is_none() {
        let sub = sub_with(UvAnimationData {
            mode: 3,
            tex_frames: uv_frames(),
            coord_frames: uv_frames(),
            frame_textures: vec!["a".into()],
            ..UvAnimationData::default()
        });
        let options = PlaybackOptions::default();

        assert!(continuous_uvs(&sub, 0.0, &options).is_none());
        assert!(texture_swap(&sub, 0.0, &options).is_none());
        assert!(discrete_uvs(&sub, 0.0, &options).is_some());
    }

    #[test]
    fn test_zero_count_is_none() {
        let sub = sub_with(UvAnimationData {
            mode: 1,
            ..UvAnimationData::default()
        });
        assert!(texture_swap(&sub, 1.0, &PlaybackOptions::default()).is_none());
        assert_eq!(resolve(&sub, 1.0, &PlaybackOptions::default()), UvAnimation::None);
    }

    #[test]
    fn test_texture_swap() {
        let sub = sub_with(UvAnimationData {
            mode: 1,
            frame_tex_time: 0.1,
            frame_textures: vec!["fire01".into(), "fire02".into()],
            ..UvAnimationData::default()
        });

        let swap = texture_swap(&sub, 0.15, &PlaybackOptions::default()).expect("swap mode");
        assert_eq!(swap.index, 1);
        assert_eq!(swap.name, "fire02");
        assert_eq!(
            resolve(&sub, 0.25, &PlaybackOptions::default()),
            UvAnimation::Texture(TextureSwap {
                index: 0,
                name: "fire01".to_string()
            })
        );
    }

    #[test]
    fn test_short_frame_padded_to_vertex_count() {
        let sub = sub_with(UvAnimationData {
            mode: 3,
            vertex_count: 3,
            tex_frame_time: 1.0,
            tex_frames: vec![vec![Vec2::ONE]],
            ..UvAnimationData::default()
        });
        let uvs = discrete_uvs(&sub, 0.0, &PlaybackOptions::default()).expect("discrete mode");
        assert_eq!(uvs, vec![Vec2::ONE, Vec2::ZERO, Vec2::ZERO]);
    }
}
