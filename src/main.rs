//! Entry point wiring the collect and report commands.
use anyhow::Result;
use chrono::{Duration, Local};
use clap::Parser;

use gymload::chart::{self, ChartConfig};
use gymload::cli::{CollectArgs, Command, ReportArgs, RootArgs};
use gymload::config::ApiConfig;
use gymload::fetch;
use gymload::store::{PartitionStore, Reading};

fn main() -> Result<()> {
    init_tracing();
    let args = RootArgs::parse();

    match args.command {
        Command::Collect(args) => cmd_collect(args),
        Command::Report(args) => cmd_report(args),
    }
}

/// Diagnostics go to stderr so stdout stays the human status stream.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_collect(args: CollectArgs) -> Result<()> {
    let api = ApiConfig::from_env()?;
    let count = match fetch::fetch_occupancy(&api) {
        Ok(count) => count,
        Err(err) => {
            // A dropped sample is acceptable; the scheduler re-invokes us.
            println!("Failed to fetch gym load: {err:#}");
            return Ok(());
        }
    };

    let store = PartitionStore::new(args.data_dir);
    let reading = Reading::at_minute(Local::now().naive_local(), count);
    store.append(&reading)?;
    println!(
        "Saved: {} -> {} people",
        reading.timestamp.format("%H:%M"),
        reading.count
    );
    Ok(())
}

fn cmd_report(args: ReportArgs) -> Result<()> {
    let store = PartitionStore::new(args.data_dir);
    if !store.exists() {
        println!("Data directory not found: {}", store.root().display());
        println!("Run `gymload collect` first to gather samples.");
        return Ok(());
    }

    let now = Local::now().naive_local();
    let readings = store.load_window(now, Duration::hours(args.hours))?;
    let config = ChartConfig {
        threshold: args.threshold,
        window_hours: args.hours,
        output: args.out,
    };
    match chart::render(&readings, &config)? {
        Some(rendered) => {
            println!("Chart saved to: {}", rendered.path.display());
            println!("Data points: {}", rendered.points);
            if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
                println!("Time range: {} to {}", first.timestamp, last.timestamp);
            }
        }
        None => println!("No data to plot"),
    }
    Ok(())
}
