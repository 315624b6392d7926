//! Progress reporting for the snapshot scan.
//!
//! [`ScanProgress`] receives one event per snapshot file the aggregation
//! visits, whether it is processed or skipped. The CLI renders it with an
//! `indicatif` bar; tests use [`NullProgress`].

/// Observer of an aggregation scan.
pub trait ScanProgress: Send + Sync {
    /// Called once with the number of snapshot files found.
    fn begin(&self, snapshots: u64);

    /// Called before a snapshot file is examined.
    fn visit(&self, file_name: &str);

    /// Called after a snapshot file has been processed or skipped.
    fn advance(&self);

    /// Called once when the scan ends, with a one-line summary.
    fn finish(&self, summary: &str);
}

/// Ignores every event.
pub struct NullProgress;

impl ScanProgress for NullProgress {
    fn begin(&self, _snapshots: u64) {}
    fn visit(&self, _file_name: &str) {}
    fn advance(&self) {}
    fn finish(&self, _summary: &str) {}
}
