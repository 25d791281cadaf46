//! CLI module
//!
//! Command-line interface for running the pipeline stages.
//!
//! # Commands
//!
//! - `capture` - Fetch the API response into the raw bucket
//! - `curate` - Turn a raw object into a Parquet table
//! - `run` - Both stages with failure notification
//! - `show-config` - Print the loaded configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
