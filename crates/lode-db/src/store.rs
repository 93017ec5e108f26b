//! Store contracts for the monitoring pipeline, backed by libSQL.

use chrono::{DateTime, Utc};
use lode_core::entities::{Alert, AlertDraft, AlertRule, Snapshot};
use lode_core::store::{AlertStore, SnapshotStore};

use crate::error::DatabaseError;
use crate::service::LodeService;

impl SnapshotStore for LodeService {
    type Error = DatabaseError;

    async fn get_latest_snapshot(&self, domain_id: &str) -> Result<Option<Snapshot>, DatabaseError> {
        self.latest_snapshot(domain_id).await
    }

    async fn get_previous_snapshot(
        &self,
        domain_id: &str,
        current_scan_id: &str,
    ) -> Result<Option<Snapshot>, DatabaseError> {
        self.previous_snapshot(domain_id, current_scan_id).await
    }

    async fn get_snapshot(&self, scan_id: &str) -> Result<Option<Snapshot>, DatabaseError> {
        self.find_snapshot(scan_id).await
    }
}

impl AlertStore for LodeService {
    type Error = DatabaseError;

    async fn list_enabled_rules(&self, domain_id: &str) -> Result<Vec<AlertRule>, DatabaseError> {
        self.enabled_rules(domain_id).await
    }

    async fn find_recent_pending_alert(
        &self,
        rule_id: &str,
        domain_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<Alert>, DatabaseError> {
        self.recent_pending_alert(rule_id, domain_id, since).await
    }

    async fn insert_alert(
        &self,
        draft: &AlertDraft,
        triggered_at: DateTime<Utc>,
    ) -> Result<Alert, DatabaseError> {
        self.create_alert(draft, triggered_at).await
    }

    async fn refresh_alert(
        &self,
        alert_id: &str,
        draft: &AlertDraft,
        triggered_at: DateTime<Utc>,
    ) -> Result<Alert, DatabaseError> {
        self.refresh_pending_alert(alert_id, draft, triggered_at).await
    }
}
