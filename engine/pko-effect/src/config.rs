//! Playback options shared by every evaluator

/// Shortest duration a keyframe may have, in seconds
pub const MIN_FRAME_DURATION: f32 = 1.0 / 30.0;

/// Duration given to keyframes that have no authored duration, in seconds
pub const DEFAULT_FRAME_DURATION: f32 = 1.0 / 30.0;

/// Options for controlling playback evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct PlaybackOptions {
    /// Whether timelines wrap around instead of holding the last frame
    pub looping: bool,
    /// Authored durations below this are raised to it
    pub min_frame_duration: f32,
    /// Duration used when a sub-effect has no duration array
    pub default_frame_duration: f32,
}

impl PlaybackOptions {
    /// Looping playback with the legacy frame durations
    pub fn looping() -> Self {
        Self {
            looping: true,
            ..Self::default()
        }
    }

    /// Play once and hold the final frame
    pub fn once() -> Self {
        Self {
            looping: false,
            ..Self::default()
        }
    }

    /// Minimum frame duration, guarded against non-positive overrides
    pub(crate) fn min_duration(&self) -> f32 {
        positive_or(self.min_frame_duration, MIN_FRAME_DURATION)
    }

    /// Default frame duration, guarded against non-positive overrides
    pub(crate) fn default_duration(&self) -> f32 {
        positive_or(self.default_frame_duration, DEFAULT_FRAME_DURATION)
    }
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            looping: true,
            min_frame_duration: MIN_FRAME_DURATION,
            default_frame_duration: DEFAULT_FRAME_DURATION,
        }
    }
}

pub(crate) fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
