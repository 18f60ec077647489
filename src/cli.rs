use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Tandem two-stage hybrid daily demand forecaster.
#[derive(Parser)]
#[command(
    name = "tandem",
    version,
    about = "Two-stage hybrid daily demand forecaster"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fit on history before the cutoff and score the days after it.
    Backtest(BacktestArgs),
    /// Fit on the full history and forecast a future frame.
    Forecast(ForecastArgs),
}

/// Arguments for the `backtest` subcommand.
#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "tandem.toml")]
    pub config: PathBuf,

    /// Override observations Parquet path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override forecast Parquet output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override evaluation summary JSON path from config.
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Override the split cutoff date (YYYY-MM-DD) from config.
    #[arg(long)]
    pub cutoff: Option<NaiveDate>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `forecast` subcommand.
#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "tandem.toml")]
    pub config: PathBuf,

    /// Override observations Parquet path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override future frame Parquet path from config.
    #[arg(short, long)]
    pub future: Option<PathBuf>,

    /// Override forecast Parquet output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}
