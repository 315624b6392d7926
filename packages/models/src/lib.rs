#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for the frontline snapshot pipeline.
//!
//! Defines the pipeline configuration (deserialized from TOML by the CLI)
//! and the row type of the aggregated history table. Every component
//! receives the slice of configuration it needs explicitly; nothing here
//! is global state.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Endpoint returning the latest territorial-control map.
pub const DEFAULT_API_URL: &str = "https://deepstatemap.live/api/history/last";

/// Browser-like user agent. The upstream API rejects obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows Phone 10.0; Android 6.0.1; Microsoft; RM-1152) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/52.0.2743.116 Mobile Safari/537.36 Edge/15.15254";

/// Region labels whose polygons are merged into the snapshot.
pub const DEFAULT_CATEGORIES: &[&str] = &["CADR and CALR", "Occupied", "Occupied Crimea"];

/// Buffer distance (in degrees) used to erase union slivers.
pub const DEFAULT_EPSILON: f64 = 0.000_009;

/// Top-level configuration for one pipeline invocation.
///
/// All fields have defaults, so an empty TOML file (or no file at all)
/// reproduces the stock daily job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// URL of the remote map endpoint.
    pub api_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Total number of fetch attempts before giving up.
    pub max_attempts: u32,
    /// Fixed delay between fetch attempts, in seconds.
    pub retry_delay_secs: u64,
    /// Directory holding snapshot artifacts and the aggregated table.
    pub data_dir: PathBuf,
    /// Snapshot file name prefix (`<prefix>_<YYYYMMDD>.<ext>`).
    pub snapshot_prefix: String,
    /// Snapshot file extension, without the leading dot.
    pub snapshot_extension: String,
    /// File name of the aggregated CSV table inside `data_dir`.
    pub table_file_name: String,
    /// Region labels eligible for the merge.
    pub categories: Vec<String>,
    /// De-artifacting buffer distance, in coordinate units.
    pub epsilon: f64,
    /// Mitre ratio limit for the de-artifacting buffer.
    pub mitre_limit: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            max_attempts: 3,
            retry_delay_secs: 5,
            data_dir: PathBuf::from("data"),
            snapshot_prefix: "deepstatemap_data".to_string(),
            snapshot_extension: "geojson".to_string(),
            table_file_name: "aggregated_deepstatemap.csv".to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            epsilon: DEFAULT_EPSILON,
            mitre_limit: 5.0,
        }
    }
}

impl PipelineConfig {
    /// Returns the full path of the aggregated table.
    #[must_use]
    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join(&self.table_file_name)
    }
}

/// One upstream feature before normalization.
///
/// `name` is the raw composite label (`"<id>///<label>///..."`) and
/// `geometry` the untouched `GeoJSON` geometry object, which may carry
/// three-dimensional positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    /// Composite `///`-delimited label.
    pub name: String,
    /// Raw `GeoJSON` geometry object.
    pub geometry: serde_json::Value,
}

/// One row of the aggregated history table.
///
/// Each row describes a single polygon of one day's merged region. A
/// multipolygon snapshot contributes one row per part, all sharing the
/// same `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    /// Snapshot date, taken from the artifact's file name. Written as
    /// `YYYY-MM-DD`; see [`parse_table_date`] for what is accepted on read.
    #[serde(deserialize_with = "deserialize_table_date")]
    pub date: NaiveDate,
    /// Centroid latitude (y).
    pub centroid_lat: f64,
    /// Centroid longitude (x).
    pub centroid_lon: f64,
    /// Planar area in squared coordinate units.
    pub area: f64,
    /// Polygon as well-known text.
    pub geometry_wkt: String,
    /// Region label, when the artifact carries one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Parses a `date` cell of the aggregated table.
///
/// Accepts `YYYY-MM-DD`, and also a midnight timestamp
/// (`YYYY-MM-DD 00:00:00` or `YYYY-MM-DDT00:00:00`) as written by
/// dataframe tooling that stored the column as datetimes. Any other time
/// of day is rejected, since a row belongs to exactly one calendar day.
#[must_use]
pub fn parse_table_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .filter(|timestamp| timestamp.time() == NaiveTime::MIN)
        .map(|timestamp| timestamp.date())
}

fn deserialize_table_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_table_date(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid table date {text:?}")))
}
