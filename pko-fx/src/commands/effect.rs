//! Effect file command implementations

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use glam::Quat;
use pko_effect::{EffectPlayer, PlaybackOptions, SubEffectSample, UvAnimation, ViewState};
use serde_json::json;
use std::path::PathBuf;

use crate::utils::{
    Column, create_table, format_color, format_rotation, format_seconds, format_vec3,
    load_effect, load_path,
};

#[derive(Subcommand)]
pub enum EffectCommands {
    /// Display information about an effect file
    Info {
        /// Path to the effect JSON file
        file: PathBuf,
    },

    /// Evaluate every sub-effect at one or more playback times
    Sample {
        /// Path to the effect JSON file
        file: PathBuf,

        /// Playback time in seconds (can be repeated)
        #[arg(short, long = "time", default_value = "0")]
        times: Vec<f32>,

        /// Play once and hold the last frame instead of looping
        #[arg(long)]
        once: bool,

        /// Path points JSON for effects that travel along a path
        #[arg(long)]
        path: Option<PathBuf>,

        /// Camera yaw in degrees, for billboarded sub-effects
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        camera_yaw: f32,

        /// Print samples as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an effect file
    Validate {
        /// Path to the effect JSON file
        file: PathBuf,

        /// Show all warnings (not just errors)
        #[arg(short, long)]
        warnings: bool,
    },
}

pub fn execute(cmd: EffectCommands) -> Result<()> {
    match cmd {
        EffectCommands::Info { file } => handle_info(file),
        EffectCommands::Sample {
            file,
            times,
            once,
            path,
            camera_yaw,
            json,
        } => handle_sample(file, &times, once, path, camera_yaw, json),
        EffectCommands::Validate { file, warnings } => handle_validate(file, warnings),
    }
}

fn handle_info(file: PathBuf) -> Result<()> {
    let effect = load_effect(&file)?;
    let options = PlaybackOptions::default();

    println!("Effect: {}", effect.name);
    println!("Sub-effects: {}", effect.sub_effects.len());
    if effect.spin.enabled {
        println!(
            "Spin: axis {} at {:.3} rad/s",
            format_vec3(effect.spin.axis),
            effect.spin.angular_velocity
        );
    }
    if let Some(path) = &effect.path {
        println!("Path: {} at {:.3} units/s", path.name, path.velocity);
    }

    let mut table = create_table(&[
        Column::number("#"),
        Column::text("Name"),
        Column::number("Frames"),
        Column::number("Duration"),
        Column::text("Shape"),
        Column::text("Blend"),
        Column::text("UV"),
    ]);
    for (i, sub) in effect.sub_effects.iter().enumerate() {
        let blend = sub.blend();
        table.add_row(vec![
            i.to_string(),
            sub.name.clone(),
            sub.frame_count().to_string(),
            format_seconds(sub.timeline(&options).total_duration()),
            sub.shape.kind().to_string(),
            format!("{} / {}", blend.src, blend.dst),
            format!("{:?}", sub.uv.mode()),
        ]);
    }
    println!();
    table.printstd();

    Ok(())
}

fn handle_sample(
    file: PathBuf,
    times: &[f32],
    once: bool,
    path: Option<PathBuf>,
    camera_yaw: f32,
    as_json: bool,
) -> Result<()> {
    let effect = load_effect(&file)?;
    let options = if once {
        PlaybackOptions::once()
    } else {
        PlaybackOptions::looping()
    };

    let mut player = EffectPlayer::new(effect, options);
    if let Some(path) = path {
        player = player.with_path(load_path(&path)?);
    }
    let view = ViewState::new(Quat::from_rotation_y(camera_yaw.to_radians()));

    let mut samples = Vec::with_capacity(times.len());
    for &time in times {
        samples.push((time, player.sample_at(time, &view)));
    }

    if as_json {
        let output: Vec<_> = samples
            .iter()
            .map(|(time, sample)| {
                json!({
                    "time": time,
                    "translation": sample.translation.to_array(),
                    "rotation": sample.rotation.to_array(),
                    "subEffects": sample.sub_effects.iter().map(sub_effect_json).collect::<Vec<_>>(),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&output).context("Failed to encode samples")?;
        println!("{text}");
        return Ok(());
    }

    for (time, sample) in &samples {
        println!("=== t = {} ===", format_seconds(*time));
        println!("Group position: {}", format_vec3(sample.translation));
        println!("Group rotation: {}", format_rotation(sample.rotation));

        let mut table = create_table(&[
            Column::number("#"),
            Column::text("Frame"),
            Column::text("Size"),
            Column::text("Position"),
            Column::text("Color"),
            Column::text("Orientation"),
            Column::text("Texture"),
        ]);
        for (i, sub) in sample.sub_effects.iter().enumerate() {
            table.add_row(vec![
                i.to_string(),
                format!(
                    "{}→{} ({:.2})",
                    sub.frame.frame_index, sub.frame.next_frame_index, sub.frame.fraction
                ),
                format_vec3(sub.frame.size),
                format_vec3(sub.frame.position),
                format_color(sub.frame.color),
                format_rotation(sub.orientation),
                sub.texture_name.clone(),
            ]);
        }
        table.printstd();
        println!();
    }

    Ok(())
}

fn sub_effect_json(sample: &SubEffectSample) -> serde_json::Value {
    let uv = match &sample.uv {
        UvAnimation::None => serde_json::Value::Null,
        UvAnimation::Coordinates(coords) => json!({
            "coordinates": coords.iter().map(|c| c.to_array()).collect::<Vec<_>>(),
        }),
        UvAnimation::Texture(swap) => json!({
            "textureIndex": swap.index,
            "texture": swap.name,
        }),
    };

    json!({
        "frameIndex": sample.frame.frame_index,
        "nextFrameIndex": sample.frame.next_frame_index,
        "fraction": sample.frame.fraction,
        "textureFrameIndex": sample.frame.texture_frame_index,
        "size": sample.frame.size.to_array(),
        "rotation": sample.frame.rotation.to_array(),
        "position": sample.frame.position.to_array(),
        "color": sample.frame.color.to_array(),
        "orientation": sample.orientation.to_array(),
        "shape": sample.geometry.kind.name(),
        "srcBlend": sample.blend.src.gl_constant(),
        "dstBlend": sample.blend.dst.gl_constant(),
        "texture": sample.texture_name,
        "uv": uv,
    })
}

fn handle_validate(file: PathBuf, show_warnings: bool) -> Result<()> {
    println!("Validating effect: {}", file.display());
    let effect = load_effect(&file)?;
    let report = effect.validate();

    for error in &report.errors {
        println!("  error: {error}");
    }
    if show_warnings {
        for warning in &report.warnings {
            println!("  warning: {warning}");
        }
    } else if report.has_warnings() {
        println!(
            "  {} warnings (use --warnings to show them)",
            report.warnings.len()
        );
    }

    if report.has_errors() {
        bail!("Validation failed with {} errors", report.errors.len());
    }

    println!("✓ Effect validation passed!");
    Ok(())
}
