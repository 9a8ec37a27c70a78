//! Penflow CLI
//!
//! Command-line interface for Penflow stroke decoding and recognition.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use penflow_cli::config_handlers::handle_config_command;
use penflow_cli::{Args, Command, commands};
use penflow_pipeline::PenflowConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "debug"
    } else {
        "info,penflow=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = match args.command {
        Command::Decode {
            payload,
            start_time,
            stroke_id,
        } => commands::decode(&payload, start_time, stroke_id)?,
        Command::DryRun { file, user, live } => {
            let settings = PenflowConfig::load(args.config.as_deref())?;
            commands::dry_run(settings, &file, &user, live).await?
        }
        Command::Config { action } => handle_config_command(args.config.as_deref(), action)?,
    };
    println!("{output}");

    Ok(())
}
