//! Taxi fare training CLI
//!
//! Loads trips, cleans them, trains the fare pipeline, writes the model
//! artifact and prints the held-out RMSE. A bare `taxifare` run uses
//! `taxifare.toml` when present and built-in defaults otherwise.

use clap::Parser;
use std::path::PathBuf;
use taxifare::trainer::fare::train_from_config;
use taxifare::{Config, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "taxifare.toml";

#[derive(Debug, Parser)]
#[command(name = "taxifare")]
#[command(about = "Train a taxi fare prediction model", long_about = None)]
struct Cli {
    /// Config file path [default: taxifare.toml, skipped if absent]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Training CSV, overrides `data.path`
    #[arg(long)]
    data: Option<PathBuf>,

    /// Maximum rows to read, overrides `data.nrows`
    #[arg(long)]
    nrows: Option<usize>,

    /// Seed for the train/test split, overrides `training.seed`
    #[arg(long)]
    seed: Option<u64>,

    /// Model artifact path, overrides `output.model_path`
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Enable debug logging (per-epoch loss)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::from_file_or_default(DEFAULT_CONFIG)?,
        };
        if let Some(path) = &self.data {
            config.data.path = path.clone();
        }
        if let Some(nrows) = self.nrows {
            config.data.nrows = Some(nrows);
        }
        if let Some(seed) = self.seed {
            config.training.seed = Some(seed);
        }
        if let Some(path) = &self.model_path {
            config.output.model_path = path.clone();
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.config().and_then(|config| train_from_config(&config)) {
        Ok(report) => println!("rmse: {}", report.rmse),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
