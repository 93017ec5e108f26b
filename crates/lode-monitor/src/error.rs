//! Error types for lode-monitor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Diffing snapshots of two different domains has no meaning.
    #[error("cannot diff snapshots from different domains: {previous} vs {current}")]
    DomainMismatch { previous: String, current: String },

    /// A scan was looked up under a domain it does not belong to.
    #[error("scan {scan_id} belongs to domain {found}, not {expected}")]
    ForeignScan {
        scan_id: String,
        expected: String,
        found: String,
    },

    /// A scan id passed alongside a snapshot does not match the snapshot.
    #[error("scan id mismatch: expected {expected}, snapshot is {found}")]
    ScanMismatch { expected: String, found: String },

    /// Failure reported by the snapshot or alert store.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl MonitorError {
    pub(crate) fn store<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Store(Box::new(err))
    }
}
