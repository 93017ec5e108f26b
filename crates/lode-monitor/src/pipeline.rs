//! Scan completion: diff the new snapshot against its predecessor and record
//! the alerts it triggers.

use chrono::{DateTime, Duration, Utc};
use lode_config::MonitorConfig;
use lode_core::entities::{Alert, ScanDiff, Snapshot};
use lode_core::store::{AlertStore, SnapshotStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::alerts::{AlertContext, evaluate_alert_rules};
use crate::diff::{DiffOptions, diff_scans_with};
use crate::error::MonitorError;

/// What one scan completion produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub scan_id: String,
    /// `None` for a domain's first scan, or when the scan has no snapshot.
    pub diff: Option<ScanDiff>,
    pub alerts_created: Vec<Alert>,
    pub alerts_refreshed: Vec<Alert>,
}

impl CompletionReport {
    fn without_diff(scan_id: &str) -> Self {
        Self {
            scan_id: scan_id.to_string(),
            diff: None,
            alerts_created: Vec::new(),
            alerts_refreshed: Vec::new(),
        }
    }
}

/// Check that `snapshot` was recorded for `domain_id`.
///
/// # Errors
///
/// Returns [`MonitorError::ForeignScan`] when it belongs to another domain.
pub fn ensure_scan_domain(snapshot: &Snapshot, domain_id: &str) -> Result<(), MonitorError> {
    if snapshot.domain_id == domain_id {
        return Ok(());
    }
    Err(MonitorError::ForeignScan {
        scan_id: snapshot.scan_id.clone(),
        expected: domain_id.to_string(),
        found: snapshot.domain_id.clone(),
    })
}

/// Diff `scan_id` against the domain's previous snapshot and record alerts.
///
/// A pending alert for the same rule and domain triggered within
/// `config.dedup_window_hours` of `now` is refreshed with the new message,
/// scan, and time instead of being duplicated.
///
/// # Errors
///
/// Returns [`MonitorError::Store`] if the store fails, or
/// [`MonitorError::ForeignScan`] if `scan_id` belongs to another domain.
pub async fn process_scan_completion<S>(
    store: &S,
    domain_id: &str,
    scan_id: &str,
    now: DateTime<Utc>,
    config: &MonitorConfig,
) -> Result<CompletionReport, MonitorError>
where
    S: SnapshotStore + AlertStore,
{
    let Some(current) = store
        .get_snapshot(scan_id)
        .await
        .map_err(MonitorError::store)?
    else {
        warn!(domain = domain_id, scan = scan_id, "no snapshot for completed scan");
        return Ok(CompletionReport::without_diff(scan_id));
    };
    ensure_scan_domain(&current, domain_id)?;

    let latest = store
        .get_latest_snapshot(domain_id)
        .await
        .map_err(MonitorError::store)?;
    if latest.as_ref().is_some_and(|l| l.scan_id != scan_id) {
        warn!(
            domain = domain_id,
            scan = scan_id,
            "completed scan is not the domain's latest snapshot"
        );
    }

    let previous = store
        .get_previous_snapshot(domain_id, scan_id)
        .await
        .map_err(MonitorError::store)?;
    let previous_scan_id = previous.as_ref().map_or("", |p| p.scan_id.as_str());

    let Some(diff) = diff_scans_with(
        previous_scan_id,
        scan_id,
        previous.as_ref(),
        Some(&current),
        &DiffOptions::from_config(config),
    )?
    else {
        info!(domain = domain_id, scan = scan_id, "first scan for domain, nothing to diff");
        return Ok(CompletionReport::without_diff(scan_id));
    };

    let rules = store
        .list_enabled_rules(domain_id)
        .await
        .map_err(MonitorError::store)?;
    let ctx = AlertContext {
        scan_id,
        domain_id,
        diff: &diff,
        current_score: current.overall_score,
        previous_score: previous.as_ref().map(|p| p.overall_score),
    };
    let drafts = evaluate_alert_rules(&rules, &ctx);

    let since = now - Duration::hours(i64::from(config.dedup_window_hours));
    let mut alerts_created = Vec::new();
    let mut alerts_refreshed = Vec::new();
    for draft in &drafts {
        let existing = store
            .find_recent_pending_alert(&draft.rule_id, domain_id, since)
            .await
            .map_err(MonitorError::store)?;
        match existing {
            Some(existing) => {
                let alert = store
                    .refresh_alert(&existing.id, draft, now)
                    .await
                    .map_err(MonitorError::store)?;
                alerts_refreshed.push(alert);
            }
            None => {
                let alert = store
                    .insert_alert(draft, now)
                    .await
                    .map_err(MonitorError::store)?;
                alerts_created.push(alert);
            }
        }
    }

    info!(
        domain = domain_id,
        scan = scan_id,
        rules = rules.len(),
        created = alerts_created.len(),
        refreshed = alerts_refreshed.len(),
        "scan completion processed"
    );

    Ok(CompletionReport {
        scan_id: scan_id.to_string(),
        diff: Some(diff),
        alerts_created,
        alerts_refreshed,
    })
}
