//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hourly weather capture and curation
#[derive(Parser, Debug)]
#[command(name = "weather-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call the weather API and store the raw response
    Capture {
        /// Invocation payload echoed in the result
        #[arg(long)]
        event_json: Option<String>,
    },

    /// Convert a stored raw response into Parquet
    Curate {
        /// Location of the raw object (s3://bucket/key)
        #[arg(long, conflicts_with = "event_json", required_unless_present = "event_json")]
        s3_key: Option<String>,

        /// Full invocation payload, usually a capture result
        #[arg(long)]
        event_json: Option<String>,
    },

    /// Run capture then curation, notifying on failure
    Run {
        /// Invocation payload for the capture stage
        #[arg(long)]
        event_json: Option<String>,
    },

    /// Print the effective configuration
    ShowConfig,
}
