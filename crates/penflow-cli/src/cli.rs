//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Penflow CLI - pen stroke decoding and handwriting recognition
#[derive(Parser, Debug)]
#[command(name = "penflow")]
#[command(author, version, about = "Pen stroke decoding and handwriting recognition tool", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a base64 dot payload and print the dots as JSON
    Decode {
        /// Base64 payload of packed dot records
        payload: String,
        /// Base time the deltas accumulate on
        #[arg(long, default_value_t = 0)]
        start_time: i64,
        /// Stroke id to tag the dots with
        #[arg(long, default_value_t = 0)]
        stroke_id: i32,
    },

    /// Run a submission file through the pipeline and print the page responses
    DryRun {
        /// JSON submission file
        file: PathBuf,
        /// User the task is submitted as
        #[arg(long, default_value = "penflow")]
        user: String,
        /// Call the configured ink service instead of the built-in mock
        #[arg(long)]
        live: bool,
    },

    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Print one value by dotted key (e.g. `service.workers`)
    Get {
        /// Dotted key
        key: String,
    },
    /// Write a default config file
    Init {
        /// Target path (defaults to the platform config directory)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
