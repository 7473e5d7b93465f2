//! Effect path command implementations

use anyhow::{Result, bail};
use clap::Subcommand;
use std::path::PathBuf;

use crate::utils::{Column, create_table, format_seconds, format_vec3, load_path};

#[derive(Subcommand)]
pub enum PathCommands {
    /// Display information about a path
    Info {
        /// Path points JSON file
        file: PathBuf,
    },

    /// Position along a path at one or more times
    Sample {
        /// Path points JSON file
        file: PathBuf,

        /// Travel speed in units per second
        #[arg(long)]
        velocity: f32,

        /// Elapsed time in seconds (can be repeated)
        #[arg(short, long = "time", default_value = "0")]
        times: Vec<f32>,

        /// Wrap around at the end of the path
        #[arg(long = "loop")]
        looping: bool,
    },
}

pub fn execute(cmd: PathCommands) -> Result<()> {
    match cmd {
        PathCommands::Info { file } => handle_info(file),
        PathCommands::Sample {
            file,
            velocity,
            times,
            looping,
        } => handle_sample(file, velocity, &times, looping),
    }
}

fn handle_info(file: PathBuf) -> Result<()> {
    let path = load_path(&file)?;

    println!("Points: {}", path.len());
    println!("Total length: {:.3}", path.total_length());

    let mut table = create_table(&[
        Column::number("#"),
        Column::text("Point"),
        Column::number("Segment length"),
    ]);
    for (i, point) in path.points().iter().enumerate() {
        let segment = path
            .segment_lengths()
            .get(i)
            .map_or_else(|| "-".to_string(), |length| format!("{length:.3}"));
        table.add_row(vec![i.to_string(), format_vec3(*point), segment]);
    }
    table.printstd();

    Ok(())
}

fn handle_sample(file: PathBuf, velocity: f32, times: &[f32], looping: bool) -> Result<()> {
    if !velocity.is_finite() {
        bail!("Velocity must be a finite number");
    }
    let path = load_path(&file)?;

    if let Some(travel) = path.travel_time(velocity) {
        println!("One pass takes {}", format_seconds(travel));
    }

    let mut table = create_table(&[Column::number("Time"), Column::text("Position")]);
    for &time in times {
        table.add_row(vec![
            format_seconds(time),
            format_vec3(path.position_at(time, velocity, looping)),
        ]);
    }
    table.printstd();

    Ok(())
}
