//! Pipeline orchestrator.
//!
//! Chains fetch -> normalize -> merge -> de-artifact -> snapshot, then
//! aggregates every snapshot on disk into the history table. Each stage
//! receives its settings from the [`PipelineConfig`] passed in; nothing is
//! read from global state.

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use frontline_aggregate::progress::ScanProgress;
use frontline_aggregate::{AggregateOptions, AggregateOutcome, update_aggregated_table};
use frontline_geometry::deartifact::{DeartifactOptions, deartifact};
use frontline_geometry::merge::merge_polygons;
use frontline_geometry::normalize::normalize_features;
use frontline_models::{PipelineConfig, RawFeature};
use frontline_snapshot::{SnapshotNaming, fs::ensure_dir, write_snapshot};
use frontline_source::{SourceOptions, build_client, fetch_features, parse_payload, read_payload};

/// Where the day's features come from.
#[derive(Debug, Clone)]
pub enum PayloadSource {
    /// Fetch from the remote endpoint.
    Remote,
    /// Replay a payload previously saved to disk.
    File(PathBuf),
}

/// Inputs of one snapshot run.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    /// Payload origin.
    pub source: PayloadSource,
    /// Date the snapshot is filed under.
    pub date: NaiveDate,
}

/// Produces and writes the snapshot for `request.date`.
///
/// Returns the path of the written artifact.
///
/// # Errors
///
/// Returns an error if the fetch exhausts its retries, the payload is
/// malformed, a label cannot be parsed, or the artifact cannot be written.
/// Nothing is written in any of these cases.
#[allow(clippy::future_not_send)]
pub async fn snapshot(
    config: &PipelineConfig,
    request: &SnapshotRequest,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let deartifact_options = DeartifactOptions::from_config(config)?;

    ensure_dir(&config.data_dir)?;

    let raw = load_features(config, &request.source).await?;

    log::info!("Processing {} features...", raw.len());
    let features = normalize_features(&raw)?;

    log::info!("Merging polygons...");
    let merged = merge_polygons(&features, &config.categories);

    log::info!(
        "Removing union artifacts (epsilon {})...",
        deartifact_options.epsilon()
    );
    let cleaned = deartifact(&merged, &deartifact_options);

    let path = write_snapshot(
        &config.data_dir,
        &SnapshotNaming::from_config(config),
        request.date,
        &cleaned,
    )?;

    log::info!(
        "Snapshot for {} complete in {:.1}s",
        request.date,
        start.elapsed().as_secs_f64()
    );

    Ok(path)
}

#[allow(clippy::future_not_send)]
async fn load_features(
    config: &PipelineConfig,
    source: &PayloadSource,
) -> Result<Vec<RawFeature>, Box<dyn std::error::Error>> {
    match source {
        PayloadSource::Remote => {
            log::info!("Making API request...");
            let options = SourceOptions::from_config(config);
            let client = build_client(&options)?;
            Ok(fetch_features(&client, &options).await?)
        }
        PayloadSource::File(path) => {
            log::info!("Reading saved payload {}", path.display());
            let payload = read_payload(path)?;
            Ok(parse_payload(&payload)?)
        }
    }
}

/// Updates the aggregated table from every snapshot in the data directory.
///
/// # Errors
///
/// Returns an error if the table or a pending snapshot cannot be read, or
/// the table cannot be written.
pub fn aggregate(
    config: &PipelineConfig,
    progress: &dyn ScanProgress,
) -> Result<AggregateOutcome, Box<dyn std::error::Error>> {
    log::info!("Running CSV aggregation...");
    ensure_dir(&config.data_dir)?;

    let outcome = update_aggregated_table(&AggregateOptions::from_config(config), progress)?;

    Ok(outcome)
}
