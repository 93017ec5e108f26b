//! Storage contracts consumed by the diff engine and the scan-completion
//! pipeline.
//!
//! The monitoring logic only sees these traits, so it stays independent of
//! the database client. `lode-db` implements both for its libSQL service.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::entities::{Alert, AlertDraft, AlertRule, Snapshot};

/// Read access to the append-only snapshot history of monitored domains.
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Most recently completed snapshot for `domain_id`, if any.
    fn get_latest_snapshot(
        &self,
        domain_id: &str,
    ) -> impl Future<Output = Result<Option<Snapshot>, Self::Error>>;

    /// Snapshot that immediately precedes `current_scan_id` in completion order.
    ///
    /// `None` when `current_scan_id` is the domain's first scan or is unknown.
    fn get_previous_snapshot(
        &self,
        domain_id: &str,
        current_scan_id: &str,
    ) -> impl Future<Output = Result<Option<Snapshot>, Self::Error>>;

    /// Snapshot written for `scan_id`, if any.
    fn get_snapshot(
        &self,
        scan_id: &str,
    ) -> impl Future<Output = Result<Option<Snapshot>, Self::Error>>;
}

/// Alert rules and alert records for monitored domains.
pub trait AlertStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_enabled_rules(
        &self,
        domain_id: &str,
    ) -> impl Future<Output = Result<Vec<AlertRule>, Self::Error>>;

    /// Pending alert for `rule_id` on `domain_id` triggered at or after `since`.
    fn find_recent_pending_alert(
        &self,
        rule_id: &str,
        domain_id: &str,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Alert>, Self::Error>>;

    fn insert_alert(
        &self,
        draft: &AlertDraft,
        triggered_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Alert, Self::Error>>;

    /// Re-trigger an existing pending alert with a fresh message and scan.
    fn refresh_alert(
        &self,
        alert_id: &str,
        draft: &AlertDraft,
        triggered_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Alert, Self::Error>>;
}
