// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! Weather ETL CLI
//!
//! Runs the capture and curation stages from the command line

use clap::Parser;
use weather_etl::cli::{Cli, Runner};
use weather_etl::StageStatus;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runner = Runner::new(cli);

    match runner.run().await {
        Ok(StageStatus::Succeeded) => {}
        Ok(StageStatus::Failed) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
