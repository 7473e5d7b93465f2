//! Keyframe timelines
//!
//! Converts authored per-frame durations into a usable timeline and maps a
//! playback time onto it. The stepping helpers at the bottom apply the same
//! loop/clamp rule to fixed-rate sequences (texture frames, UV frames).

use crate::config::PlaybackOptions;
use crate::math::sanitize_time;

/// Largest fraction below one; keeps rounding from reporting a full frame
const MAX_FRACTION: f32 = 1.0 - f32::EPSILON / 2.0;

/// Where a playback time falls on a timeline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FramePosition {
    /// Frame the time falls into
    pub frame_index: usize,
    /// Frame interpolated towards
    pub next_frame_index: usize,
    /// Progress through `frame_index`, in [0, 1)
    pub fraction: f32,
}

impl FramePosition {
    /// A position exactly on `index` with no interpolation
    pub const fn hold(index: usize) -> Self {
        Self {
            frame_index: index,
            next_frame_index: index,
            fraction: 0.0,
        }
    }
}

/// Per-frame durations of a sub-effect
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameTimeline {
    durations: Vec<f32>,
    total: f32,
}

impl FrameTimeline {
    /// Resolve with the legacy minimum/default durations
    pub fn resolve(durations: &[f32], frame_count: usize) -> Self {
        Self::resolve_with(durations, frame_count, &PlaybackOptions::default())
    }

    /// Resolve authored durations into one usable duration per frame
    ///
    /// Authored entries are raised to the minimum duration. An empty array
    /// gives every frame the default duration, as does any index the array
    /// does not reach.
    pub fn resolve_with(durations: &[f32], frame_count: usize, options: &PlaybackOptions) -> Self {
        let min = options.min_duration();
        let default = options.default_duration();

        let durations: Vec<f32> = (0..frame_count)
            .map(|index| match durations.get(index) {
                Some(&d) if d.is_finite() => d.max(min),
                _ => default,
            })
            .collect();
        let total = durations.iter().sum();

        Self { durations, total }
    }

    /// Resolved durations, one per frame
    pub fn durations(&self) -> &[f32] {
        &self.durations
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.durations.len()
    }

    /// Sum of all frame durations
    pub fn total_duration(&self) -> f32 {
        self.total
    }

    /// Duration of frame `index` (0 outside the timeline)
    pub fn duration_of(&self, index: usize) -> f32 {
        self.durations.get(index).copied().unwrap_or(0.0)
    }

    /// Locate `time` on the timeline
    ///
    /// Looping reduces the time modulo the total duration first. Without
    /// looping, times at or past the end hold the last frame.
    pub fn locate(&self, time: f32, looping: bool) -> FramePosition {
        let count = self.durations.len();
        if count <= 1 {
            return FramePosition::default();
        }

        let last = count - 1;
        let mut time = sanitize_time(time);
        if looping {
            time %= self.total;
        } else if time >= self.total {
            return FramePosition::hold(last);
        }

        let mut remaining = time;
        for (index, &duration) in self.durations.iter().enumerate() {
            if remaining < duration {
                let next_frame_index = if index < last {
                    index + 1
                } else if looping {
                    0
                } else {
                    index
                };
                return FramePosition {
                    frame_index: index,
                    next_frame_index,
                    fraction: (remaining / duration).min(MAX_FRACTION),
                };
            }
            remaining -= duration;
        }

        // Accumulated rounding put the time past the final frame.
        if looping {
            FramePosition::hold(0)
        } else {
            FramePosition::hold(last)
        }
    }
}

/// Index into a fixed-rate sequence of `count` frames, without interpolation
///
/// Returns `None` when there are no frames. Non-positive frame durations
/// fall back to `default_duration`.
pub fn step_index(
    time: f32,
    frame_duration: f32,
    count: usize,
    looping: bool,
    default_duration: f32,
) -> Option<usize> {
    step_position(time, frame_duration, count, looping, default_duration)
        .map(|position| position.frame_index)
}

/// Fractional position in a fixed-rate sequence of `count` frames
///
/// Same loop/clamp rule as [`FrameTimeline::locate`]; the cycle length is
/// `frame_duration * count`.
pub fn step_position(
    time: f32,
    frame_duration: f32,
    count: usize,
    looping: bool,
    default_duration: f32,
) -> Option<FramePosition> {
    if count == 0 {
        return None;
    }
    if count == 1 {
        return Some(FramePosition::hold(0));
    }

    let duration = crate::config::positive_or(frame_duration, default_duration);
    let cycle = duration * count as f32;
    let last = count - 1;

    let mut time = sanitize_time(time);
    if looping {
        time %= cycle;
    } else if time >= cycle {
        return Some(FramePosition::hold(last));
    }

    let scaled = time / duration;
    let index = scaled.floor() as usize;
    if index > last {
        return Some(if looping {
            FramePosition::hold(0)
        } else {
            FramePosition::hold(last)
        });
    }

    let next_frame_index = if index < last {
        index + 1
    } else if looping {
        0
    } else {
        index
    };
    Some(FramePosition {
        frame_index: index,
        next_frame_index,
        fraction: (scaled - index as f32).clamp(0.0, MAX_FRACTION),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_FRAME_DURATION, MIN_FRAME_DURATION};

    #[test]
    fn test_empty_durations_use_default() {
        let timeline = FrameTimeline::resolve(&[], 3);
        assert_eq!(timeline.durations(), &[DEFAULT_FRAME_DURATION; 3]);
        assert!((timeline.total_duration() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_durations_floored_at_minimum() {
        let timeline = FrameTimeline::resolve(&[0.0, -1.0, 0.5], 3);
        assert_eq!(timeline.durations()[0], MIN_FRAME_DURATION);
        assert_eq!(timeline.durations()[1], MIN_FRAME_DURATION);
        assert_eq!(timeline.durations()[2], 0.5);
    }

    #[test]
    fn test_short_array_padded_with_default() {
        let timeline = FrameTimeline::resolve(&[1.0], 3);
        assert_eq!(timeline.frame_count(), 3);
        assert_eq!(timeline.durations()[1], DEFAULT_FRAME_DURATION);
    }

    #[test]
    fn test_non_finite_duration_uses_default() {
        let timeline = FrameTimeline::resolve(&[f32::NAN, 1.0], 2);
        assert_eq!(timeline.durations()[0], DEFAULT_FRAME_DURATION);
    }

    #[test]
    fn test_locate_midframe() {
        let timeline = FrameTimeline::resolve(&[1.0, 1.0], 2);
        let position = timeline.locate(0.5, false);
        assert_eq!(position.frame_index, 0);
        assert_eq!(position.next_frame_index, 1);
        assert!((position.fraction - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_locate_frame_boundary() {
        let timeline = FrameTimeline::resolve(&[1.0, 1.0], 2);
        let position = timeline.locate(1.0, false);
        assert_eq!(position.frame_index, 1);
        assert_eq!(position.next_frame_index, 1);
        assert_eq!(position.fraction, 0.0);
    }

    #[test]
    fn test_locate_last_frame_wraps_when_looping() {
        let timeline = FrameTimeline::resolve(&[1.0, 1.0], 2);
        let position = timeline.locate(1.5, true);
        assert_eq!(position.frame_index, 1);
        assert_eq!(position.next_frame_index, 0);
        assert!((position.fraction - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_locate_clamps_past_end() {
        let timeline = FrameTimeline::resolve(&[1.0, 1.0, 1.0], 3);
        assert_eq!(timeline.locate(10.0, false), FramePosition::hold(2));
        assert_eq!(timeline.locate(3.0, false), FramePosition::hold(2));
    }

    #[test]
    fn test_locate_negative_time_is_start() {
        let timeline = FrameTimeline::resolve(&[1.0, 1.0], 2);
        assert_eq!(timeline.locate(-4.0, true), FramePosition::hold(0).with_next(1));
    }

    #[test]
    fn test_locate_single_and_empty() {
        assert_eq!(FrameTimeline::resolve(&[1.0], 1).locate(7.0, true), FramePosition::hold(0));
        assert_eq!(FrameTimeline::resolve(&[], 0).locate(7.0, false), FramePosition::hold(0));
    }

    #[test]
    fn test_step_index() {
        assert_eq!(step_index(0.4, 0.5, 3, false, DEFAULT_FRAME_DURATION), Some(0));
        assert_eq!(step_index(0.5, 0.5, 3, false, DEFAULT_FRAME_DURATION), Some(1));
        assert_eq!(step_index(1.6, 0.5, 3, true, DEFAULT_FRAME_DURATION), Some(0));
        assert_eq!(step_index(9.0, 0.5, 3, false, DEFAULT_FRAME_DURATION), Some(2));
        assert_eq!(step_index(1.0, 0.5, 0, true, DEFAULT_FRAME_DURATION), None);
    }

    #[test]
    fn test_step_index_zero_duration_guard() {
        let index = step_index(0.05, 0.0, 4, false, DEFAULT_FRAME_DURATION);
        assert_eq!(index, Some(1));
    }

    #[test]
    fn test_step_position_fraction() {
        let position = step_position(0.75, 0.5, 3, false, DEFAULT_FRAME_DURATION)
            .expect("frames present");
        assert_eq!(position.frame_index, 1);
        assert_eq!(position.next_frame_index, 2);
        assert!((position.fraction - 0.5).abs() < 1e-6);

        let position = step_position(1.25, 0.5, 3, true, DEFAULT_FRAME_DURATION)
            .expect("frames present");
        assert_eq!(position.frame_index, 2);
        assert_eq!(position.next_frame_index, 0);
    }

    impl FramePosition {
        fn with_next(mut self, next: usize) -> Self {
            self.next_frame_index = next;
            self
        }
    }
}
