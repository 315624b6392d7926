#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incremental aggregation of snapshot artifacts into a flat history table.
//!
//! Every run recomputes the set of dates already present in the table,
//! scans the data directory for snapshot artifacts in file-name order, and
//! appends one row per polygon for each artifact whose date is not yet
//! covered. Existing rows are never touched or reordered, and a run that
//! finds nothing new leaves the table file untouched.

pub mod decompose;
pub mod progress;
pub mod table;

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use frontline_models::PipelineConfig;
use frontline_snapshot::{SnapshotError, SnapshotNaming, list_snapshots, read_snapshot};
use thiserror::Error;

use crate::progress::ScanProgress;

/// Errors that can occur during aggregation.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// I/O error (table write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table could not be parsed or serialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A snapshot artifact could not be listed or read.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Where the artifacts and the table live.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Directory scanned for snapshot artifacts.
    pub snapshot_dir: PathBuf,
    /// Path of the aggregated CSV table.
    pub table_path: PathBuf,
    /// Snapshot file naming scheme.
    pub naming: SnapshotNaming,
}

impl AggregateOptions {
    /// Extracts the aggregation settings from the pipeline configuration.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            snapshot_dir: config.data_dir.clone(),
            table_path: config.table_path(),
            naming: SnapshotNaming::from_config(config),
        }
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutcome {
    /// New rows were appended and the table rewritten.
    Updated {
        /// Dates added by this run, in processing order.
        new_dates: Vec<NaiveDate>,
        /// Number of rows appended.
        new_rows: usize,
        /// Number of rows in the table after the update.
        total_rows: usize,
    },
    /// The table exists and nothing new was found; the file was not
    /// rewritten.
    NoNewData,
    /// There is no table yet and no artifact produced any rows.
    NothingToAggregate,
}

/// Brings the aggregated table up to date with the artifacts on disk.
///
/// # Errors
///
/// Returns [`AggregateError`] if the table cannot be loaded or written,
/// or if an artifact that needs processing cannot be read.
pub fn update_aggregated_table(
    options: &AggregateOptions,
    progress: &dyn ScanProgress,
) -> Result<AggregateOutcome, AggregateError> {
    let existing = table::load_table(&options.table_path)?;
    let covered = existing
        .as_deref()
        .map(table::covered_dates)
        .unwrap_or_default();

    log::info!(
        "Aggregated table {} covers {} date(s)",
        options.table_path.display(),
        covered.len()
    );

    let snapshots = list_snapshots(&options.snapshot_dir, &options.naming)?;
    progress.begin(snapshots.len() as u64);

    let mut added: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut new_dates = Vec::new();
    let mut new_rows = Vec::new();

    for snapshot in &snapshots {
        progress.visit(&snapshot.file_name);

        match snapshot.date {
            None => {
                log::info!("Skipping {} (no date in file name)", snapshot.file_name);
            }
            Some(date) if covered.contains(&date) || added.contains(&date) => {
                log::info!("Skipping {} (already processed)", snapshot.file_name);
            }
            Some(date) => {
                log::info!("Processing {} for aggregation...", snapshot.file_name);

                let features = read_snapshot(&snapshot.path)?;
                let rows = decompose::snapshot_rows(date, features);

                if rows.is_empty() {
                    log::info!("{} has no polygon geometry", snapshot.file_name);
                } else {
                    log::debug!("{} contributes {} row(s)", snapshot.file_name, rows.len());
                    added.insert(date);
                    new_dates.push(date);
                    new_rows.extend(rows);
                }
            }
        }

        progress.advance();
    }

    if new_rows.is_empty() {
        progress.finish("No new snapshots");

        return Ok(if existing.is_some() {
            log::info!("No new data to add.");
            AggregateOutcome::NoNewData
        } else {
            log::warn!("No data found to create initial table.");
            AggregateOutcome::NothingToAggregate
        });
    }

    let appended = new_rows.len();
    let mut combined = existing.unwrap_or_default();
    combined.extend(new_rows);

    table::save_table(&options.table_path, &combined)?;

    progress.finish(&format!("Aggregated {} new date(s)", new_dates.len()));
    log::info!(
        "Updated table saved to {} ({appended} new row(s), {} total)",
        options.table_path.display(),
        combined.len()
    );

    Ok(AggregateOutcome::Updated {
        new_dates,
        new_rows: appended,
        total_rows: combined.len(),
    })
}
