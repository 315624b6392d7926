#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the daily frontline snapshot job.
//!
//! `frontline run` (the default) fetches the current map, writes the dated
//! snapshot, and folds every snapshot on disk into the aggregated table.
//! `snapshot` and `aggregate` run the two halves separately.

mod config;
mod pipeline;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use frontline_aggregate::AggregateOutcome;
use frontline_cli_utils::{IndicatifProgress, MultiProgress};
use frontline_models::PipelineConfig;

use crate::pipeline::{PayloadSource, SnapshotRequest};

#[derive(Parser)]
#[command(name = "frontline", about = "Daily territorial-control snapshot pipeline")]
struct Cli {
    /// TOML configuration file. Defaults apply to every key it omits.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for snapshots and the aggregated table (overrides the
    /// config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write today's snapshot, then update the aggregated table
    Run(SnapshotArgs),
    /// Write the snapshot only
    Snapshot(SnapshotArgs),
    /// Update the aggregated table from the snapshots on disk
    Aggregate,
}

#[derive(Args, Default)]
struct SnapshotArgs {
    /// Read the API payload from this file instead of fetching it
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Date to file the snapshot under (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl SnapshotArgs {
    fn into_request(self) -> SnapshotRequest {
        SnapshotRequest {
            source: self
                .payload
                .map_or(PayloadSource::Remote, PayloadSource::File),
            date: self
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let multi = frontline_cli_utils::init_logger();
    let cli = Cli::parse();

    if let Err(e) = run(cli, &multi).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command.unwrap_or_else(|| Commands::Run(SnapshotArgs::default())) {
        Commands::Run(args) => {
            pipeline::snapshot(&config, &args.into_request()).await?;
            aggregate(&config, multi)?;
        }
        Commands::Snapshot(args) => {
            pipeline::snapshot(&config, &args.into_request()).await?;
        }
        Commands::Aggregate => aggregate(&config, multi)?,
    }

    Ok(())
}

fn aggregate(
    config: &PipelineConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::files_bar(multi, "Aggregating");
    let outcome = pipeline::aggregate(config, progress.as_ref())?;

    if let AggregateOutcome::Updated { new_dates, .. } = outcome {
        log::debug!("Aggregated dates: {new_dates:?}");
    }

    Ok(())
}
