//! CLI argument parsing for the collect/report commands.
//!
//! The CLI is intentionally thin: commands only wire configuration into the
//! store, fetch, and chart modules, so the same logic is reusable from tests.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config;

/// Root CLI entrypoint for the occupancy sampler.
#[derive(Parser, Debug)]
#[command(
    name = "gymload",
    version,
    about = "Sample gym occupancy into daily CSV logs and chart the result",
    after_help = "Commands:\n  collect   Fetch one occupancy reading and append it to today's log\n  report    Render a chart of the trailing time window\n\nEnvironment:\n  SPORTLIFE_AUTH_KEY   API credential sent as the auth-key header (required by collect)\n  SPORTLIFE_GYM_ID     Club identifier sent in the request body (required by collect)\n  SPORTLIFE_API_URL    Endpoint override, defaults to the production API\n\nExamples:\n  gymload collect --data-dir data\n  gymload report --data-dir data --hours 96 --out gym_load_chart.svg",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Collect(CollectArgs),
    Report(ReportArgs),
}

/// Collect command inputs for a single sample.
#[derive(Parser, Debug)]
#[command(about = "Fetch one occupancy reading and append it to today's log")]
pub struct CollectArgs {
    /// Directory holding the per-day CSV partitions
    #[arg(long, value_name = "DIR", default_value = config::DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

/// Report command inputs for one chart render.
#[derive(Parser, Debug)]
#[command(about = "Render an occupancy chart for the trailing time window")]
pub struct ReportArgs {
    /// Directory holding the per-day CSV partitions
    #[arg(long, value_name = "DIR", default_value = config::DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Trailing window to plot, in hours
    #[arg(long, value_name = "HOURS", default_value_t = config::DEFAULT_WINDOW_HOURS)]
    pub hours: i64,

    /// Occupancy drawn as the reference line; counts at or above it are highlighted
    #[arg(long, value_name = "COUNT", default_value_t = config::DEFAULT_THRESHOLD)]
    pub threshold: u32,

    /// Output path for the rendered chart
    #[arg(long, value_name = "PATH", default_value = config::DEFAULT_CHART_PATH)]
    pub out: PathBuf,
}
