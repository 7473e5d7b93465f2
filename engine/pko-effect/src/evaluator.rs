//! Per-tick effect evaluation
//!
//! [`evaluate_sub_effect`] is the pure entry point: data and a time in, a
//! complete [`SubEffectSample`] out. [`SubEffectEvaluator`] and
//! [`EffectPlayer`] wrap it with the small amount of state a running effect
//! carries between ticks (elapsed time, current frame, spin angles).

use std::f32::consts::TAU;
use std::f64::consts::TAU as TAU_F64;

use glam::{Mat4, Quat, Vec3};

use crate::blend::BlendState;
use crate::config::PlaybackOptions;
use crate::geometry::{GeometryDescriptor, resolve_geometry};
use crate::keyframe::{InterpolatedFrame, interpolate_on};
use crate::math::sanitize_time;
use crate::model::{EffectFile, SubEffect};
use crate::path::PathPoints;
use crate::timeline::{FramePosition, FrameTimeline};
use crate::transform::{EffectSpin, sub_effect_orientation};
use crate::uv_animation::{self, UvAnimation};

/// Viewer state needed for billboarding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Camera orientation in world space
    pub camera_rotation: Quat,
}

impl ViewState {
    /// View with the given camera orientation
    pub fn new(camera_rotation: Quat) -> Self {
        Self { camera_rotation }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            camera_rotation: Quat::IDENTITY,
        }
    }
}

/// Everything the renderer needs to draw one sub-effect for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct SubEffectSample {
    /// Interpolated channel values
    pub frame: InterpolatedFrame,
    /// Primitive to draw
    pub geometry: GeometryDescriptor,
    /// Blend state
    pub blend: BlendState,
    /// UV or texture animation to apply
    pub uv: UvAnimation,
    /// Final orientation
    pub orientation: Quat,
    /// Scale, orientation and position combined
    pub transform: Mat4,
    /// Texture to bind
    pub texture_name: String,
    /// Alpha testing enabled
    pub alpha_enabled: bool,
}

/// Evaluate `sub` at `time` with default playback options
pub fn evaluate_sub_effect(sub: &SubEffect, time: f32, view: &ViewState) -> SubEffectSample {
    evaluate_sub_effect_with(sub, time, view, &PlaybackOptions::default())
}

/// Evaluate `sub` at `time`
///
/// The spin angle is derived from `time` directly, so repeated calls with
/// the same inputs give identical samples.
pub fn evaluate_sub_effect_with(
    sub: &SubEffect,
    time: f32,
    view: &ViewState,
    options: &PlaybackOptions,
) -> SubEffectSample {
    let timeline = sub.timeline(options);
    let time = sanitize_time(time);
    let spin_angle = wrap_angle(time * sub.spin.angular_velocity);
    build_sample(sub, &timeline, time, spin_angle, view, options)
}

fn wrap_angle(angle: f32) -> f32 {
    if angle.is_finite() {
        angle.rem_euclid(TAU)
    } else {
        0.0
    }
}

fn build_sample(
    sub: &SubEffect,
    timeline: &FrameTimeline,
    time: f32,
    spin_angle: f32,
    view: &ViewState,
    options: &PlaybackOptions,
) -> SubEffectSample {
    let frame = interpolate_on(sub, timeline, time, options);
    let position = FramePosition {
        frame_index: frame.frame_index,
        next_frame_index: frame.next_frame_index,
        fraction: frame.fraction,
    };

    let geometry = resolve_geometry(&sub.shape, &position);
    let uv = uv_animation::resolve(sub, time, options);
    let orientation = sub_effect_orientation(sub, frame.rotation, spin_angle, view.camera_rotation);
    let transform = Mat4::from_scale_rotation_translation(frame.size, orientation, frame.position);

    let texture_name = match &uv {
        UvAnimation::Texture(swap) => swap.name.clone(),
        _ => sub.texture_name.clone(),
    };

    SubEffectSample {
        frame,
        geometry,
        blend: sub.blend(),
        uv,
        orientation,
        transform,
        texture_name,
        alpha_enabled: sub.alpha_enabled,
    }
}

/// Running state of one sub-effect
///
/// Owns the resolved timeline and the counters advanced by [`tick`].
/// Call [`refresh`] after editing the sub-effect's frame data.
///
/// The clock and spin angle are kept in `f64` and wrapped at their cycle
/// length, so long sessions stay in step with [`evaluate_sub_effect_with`].
///
/// [`tick`]: SubEffectEvaluator::tick
/// [`refresh`]: SubEffectEvaluator::refresh
#[derive(Debug, Clone)]
pub struct SubEffectEvaluator {
    options: PlaybackOptions,
    timeline: FrameTimeline,
    elapsed: f64,
    current_frame: usize,
    frame_time: f32,
    spin_angle: f64,
}

impl SubEffectEvaluator {
    /// Create an evaluator for `sub`
    pub fn new(sub: &SubEffect, options: PlaybackOptions) -> Self {
        Self {
            timeline: sub.timeline(&options),
            options,
            elapsed: 0.0,
            current_frame: 0,
            frame_time: 0.0,
            spin_angle: 0.0,
        }
    }

    /// Re-resolve the timeline after `sub` was edited
    pub fn refresh(&mut self, sub: &SubEffect) {
        self.timeline = sub.timeline(&self.options);
        self.wrap_clock();
        self.update_counters();
    }

    /// Advance by `dt` seconds and sample `sub`
    ///
    /// Negative or non-finite steps leave the clock where it is.
    pub fn tick(&mut self, sub: &SubEffect, dt: f32, view: &ViewState) -> SubEffectSample {
        let dt = f64::from(sanitize_time(dt));
        self.elapsed += dt;
        self.wrap_clock();
        self.update_counters();

        let step = dt * f64::from(sub.spin.angular_velocity);
        if sub.spin.enabled && step.is_finite() {
            self.spin_angle = (self.spin_angle + step).rem_euclid(TAU_F64);
        } else if !sub.spin.enabled {
            self.spin_angle = 0.0;
        }

        build_sample(
            sub,
            &self.timeline,
            self.elapsed as f32,
            self.spin_angle as f32,
            view,
            &self.options,
        )
    }

    /// Reduce the clock to one cycle when looping
    fn wrap_clock(&mut self) {
        let cycle = f64::from(self.timeline.total_duration());
        if self.options.looping && cycle > 0.0 {
            self.elapsed %= cycle;
        }
    }

    fn update_counters(&mut self) {
        let position = self.timeline.locate(self.elapsed as f32, self.options.looping);
        self.current_frame = position.frame_index;
        self.frame_time = position.fraction * self.timeline.duration_of(position.frame_index);
    }

    /// Rewind to the start
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.current_frame = 0;
        self.frame_time = 0.0;
        self.spin_angle = 0.0;
    }

    /// Playback clock; wraps at the timeline length when looping
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Keyframe the clock is in
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Time spent inside the current keyframe
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Accumulated spin angle in radians, in [0, 2π)
    pub fn spin_angle(&self) -> f32 {
        self.spin_angle as f32
    }

    /// Resolved keyframe timeline
    pub fn timeline(&self) -> &FrameTimeline {
        &self.timeline
    }

    /// Whether a non-looping timeline has reached its end
    pub fn is_finished(&self) -> bool {
        !self.options.looping && self.elapsed >= f64::from(self.timeline.total_duration())
    }
}

/// Group-level result of one effect tick
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSample {
    /// Effect-level spin
    pub rotation: Quat,
    /// Position along the effect's path (origin without one)
    pub translation: Vec3,
    /// One sample per sub-effect, in draw order
    pub sub_effects: Vec<SubEffectSample>,
}

impl EffectSample {
    /// Transform of the group holding all sub-effects
    pub fn group_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// Plays a whole effect: every sub-effect, the effect spin and the path
#[derive(Debug, Clone)]
pub struct EffectPlayer {
    effect: EffectFile,
    options: PlaybackOptions,
    evaluators: Vec<SubEffectEvaluator>,
    spin: EffectSpin,
    path: Option<PathPoints>,
    elapsed: f64,
}

impl EffectPlayer {
    /// Create a player for `effect`
    pub fn new(effect: EffectFile, options: PlaybackOptions) -> Self {
        let evaluators = effect
            .sub_effects
            .iter()
            .map(|sub| SubEffectEvaluator::new(sub, options))
            .collect();
        log::debug!(
            "Playing effect '{}' with {} sub-effects",
            effect.name,
            effect.sub_effects.len()
        );

        Self {
            effect,
            options,
            evaluators,
            spin: EffectSpin::new(),
            path: None,
            elapsed: 0.0,
        }
    }

    /// Attach the points of the effect's path
    ///
    /// The travel speed comes from the effect's path reference; without a
    /// reference the points are ignored.
    pub fn with_path(mut self, path: PathPoints) -> Self {
        if self.effect.path.is_none() {
            log::debug!(
                "Effect '{}' has no path reference, ignoring path points",
                self.effect.name
            );
        }
        self.path = Some(path);
        self
    }

    /// Effect being played
    pub fn effect(&self) -> &EffectFile {
        &self.effect
    }

    /// Time advanced since the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Per-sub-effect evaluators, in draw order
    pub fn evaluators(&self) -> &[SubEffectEvaluator] {
        &self.evaluators
    }

    /// Advance every sub-effect by `dt` and sample the whole effect
    pub fn tick(&mut self, dt: f32, view: &ViewState) -> EffectSample {
        let dt = sanitize_time(dt);
        self.elapsed += f64::from(dt);

        let rotation = self.spin.advance(&self.effect.spin, dt);
        let translation = self.path_position(self.elapsed);
        let sub_effects = self
            .effect
            .sub_effects
            .iter()
            .zip(self.evaluators.iter_mut())
            .map(|(sub, evaluator)| evaluator.tick(sub, dt, view))
            .collect();

        EffectSample {
            rotation,
            translation,
            sub_effects,
        }
    }

    /// Sample the whole effect at `time` without touching the running state
    pub fn sample_at(&self, time: f32, view: &ViewState) -> EffectSample {
        let time = sanitize_time(time);
        EffectSample {
            rotation: EffectSpin::at(&self.effect.spin, time),
            translation: self.path_position(f64::from(time)),
            sub_effects: self
                .effect
                .sub_effects
                .iter()
                .map(|sub| evaluate_sub_effect_with(sub, time, view, &self.options))
                .collect(),
        }
    }

    /// Path position at `time`; the clock is reduced to one pass when looping
    fn path_position(&self, time: f64) -> Vec3 {
        let (Some(points), Some(reference)) = (&self.path, &self.effect.path) else {
            return Vec3::ZERO;
        };

        let looping = self.options.looping;
        let time = match points.travel_time(reference.velocity) {
            Some(pass) if looping && pass > 0.0 => time % f64::from(pass),
            _ => time,
        };
        points.position_at(time as f32, reference.velocity, looping)
    }

    /// Rewind every sub-effect and the effect spin
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.spin.reset();
        for evaluator in &mut self.evaluators {
            evaluator.reset();
        }
    }
}
