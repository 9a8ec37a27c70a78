//! # penflow-cli
//!
//! Command-line tools for Penflow:
//! - decode a base64 dot payload into dots
//! - run a submission file through the recognition pipeline
//! - inspect and initialize configuration

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;

pub use cli::{Args, Command, ConfigAction};
