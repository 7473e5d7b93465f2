//! Root CLI structure for pko-fx

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pko-fx")]
#[command(about = "Inspect, validate and sample PKO effect data", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Effect file operations
    Effect {
        #[command(subcommand)]
        command: crate::commands::effect::EffectCommands,
    },

    /// Effect path operations
    Path {
        #[command(subcommand)]
        command: crate::commands::path::PathCommands,
    },

    /// Show how legacy blend codes map to renderer blend factors
    Blend {
        /// Codes to look up (all legacy codes when omitted)
        #[arg(allow_negative_numbers = true)]
        codes: Vec<i32>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
