//! Shared test utilities for lode-db unit tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use lode_core::entities::{Snapshot, SnapshotIssue};
use lode_core::enums::Severity;

use crate::service::LodeService;

/// In-memory service.
pub async fn test_service() -> LodeService {
    LodeService::new_local(":memory:").await.unwrap()
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap()
}

/// Snapshot for `dom-acme` completed `hours` after [`t0`].
pub fn snapshot(scan_id: &str, hours: i64, overall: f64) -> Snapshot {
    Snapshot {
        scan_id: scan_id.into(),
        domain_id: "dom-acme".into(),
        completed_at: t0() + Duration::hours(hours),
        overall_score: overall,
        pillar_scores: BTreeMap::from([("content".to_string(), overall)]),
        issues: vec![SnapshotIssue {
            issue_id: "ISSUE_A".into(),
            issue_code: "missing_meta".into(),
            severity: Severity::High,
            title: "Missing meta description".into(),
        }],
        clusters: Vec::new(),
        page_count: 42,
    }
}
