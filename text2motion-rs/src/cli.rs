//! Root CLI structure for text2motion-rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "text2motion-rs")]
#[command(about = "Generate skeletal animation from text prompts with Text2Motion", long_about = None)]
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

    /// Settings file to use instead of the per-user default
    #[arg(long, env = "T2M_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Skeleton extraction operations
    Skeleton {
        #[command(subcommand)]
        command: crate::commands::skeleton::SkeletonCommands,
    },

    /// Generate an animation for a rig from a text prompt
    Generate(crate::commands::generate::GenerateArgs),

    /// Import a generated animation or save file onto a rig
    Import(crate::commands::import::ImportArgs),

    /// Manage stored settings
    Config {
        #[command(subcommand)]
        command: crate::commands::config::ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
