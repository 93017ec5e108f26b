//! Alert repository: creation, refresh, listing, and status transitions.

use chrono::{DateTime, SubsecRound, Utc};
use lode_core::entities::{Alert, AlertDraft};
use lode_core::enums::AlertStatus;
use lode_core::ids::PREFIX_ALERT;
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime, parse_enum};
use crate::service::LodeService;

const SELECT_COLS: &str =
    "id, rule_id, domain_id, scan_id, severity, message, status, triggered_at";

fn row_to_alert(row: &libsql::Row) -> Result<Alert, DatabaseError> {
    Ok(Alert {
        id: row.get(0)?,
        rule_id: row.get(1)?,
        domain_id: row.get(2)?,
        scan_id: row.get(3)?,
        severity: parse_enum(&row.get::<String>(4)?)?,
        message: row.get(5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        triggered_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl LodeService {
    async fn query_alerts(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let mut rows = self.db().conn().query(sql, params).await?;
        let mut alerts = Vec::new();
        while let Some(row) = rows.next().await? {
            alerts.push(row_to_alert(&row)?);
        }
        Ok(alerts)
    }

    /// Record a new pending alert.
    pub async fn create_alert(
        &self,
        draft: &AlertDraft,
        triggered_at: DateTime<Utc>,
    ) -> Result<Alert, DatabaseError> {
        let triggered_at = triggered_at.trunc_subsecs(6);
        let id = self.db().generate_id(PREFIX_ALERT).await?;
        let stamp = format_datetime(triggered_at);

        self.db()
            .conn()
            .execute(
                "INSERT INTO alerts (id, rule_id, domain_id, scan_id, severity, message, status, triggered_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?8)",
                libsql::params![
                    id.as_str(),
                    draft.rule_id.as_str(),
                    draft.domain_id.as_str(),
                    draft.scan_id.as_str(),
                    draft.severity.as_str(),
                    draft.message.as_str(),
                    stamp.as_str(),
                    stamp.as_str()
                ],
            )
            .await?;
        debug!(alert = %id, rule = %draft.rule_id, "alert created");

        Ok(Alert {
            id,
            rule_id: draft.rule_id.clone(),
            domain_id: draft.domain_id.clone(),
            scan_id: draft.scan_id.clone(),
            severity: draft.severity,
            message: draft.message.clone(),
            status: AlertStatus::Pending,
            triggered_at,
        })
    }

    pub async fn get_alert(&self, id: &str) -> Result<Alert, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM alerts WHERE id = ?1");
        self.query_alerts(&sql, [id])
            .await?
            .pop()
            .ok_or(DatabaseError::NoResult)
    }

    /// Newest pending alert for `rule_id` on `domain_id` triggered at or after `since`.
    pub async fn recent_pending_alert(
        &self,
        rule_id: &str,
        domain_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<Alert>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM alerts
             WHERE rule_id = ?1 AND domain_id = ?2 AND status = 'pending' AND triggered_at >= ?3
             ORDER BY triggered_at DESC LIMIT 1"
        );
        let mut alerts = self
            .query_alerts(
                &sql,
                libsql::params![rule_id, domain_id, format_datetime(since)],
            )
            .await?;
        Ok(alerts.pop())
    }

    /// Re-trigger a pending alert with the draft's message and scan.
    ///
    /// Severity is kept from the original alert.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the alert is no longer pending.
    pub async fn refresh_pending_alert(
        &self,
        alert_id: &str,
        draft: &AlertDraft,
        triggered_at: DateTime<Utc>,
    ) -> Result<Alert, DatabaseError> {
        let current = self.get_alert(alert_id).await?;
        if current.status != AlertStatus::Pending {
            return Err(DatabaseError::InvalidState(format!(
                "Cannot refresh alert {alert_id} in status {}",
                current.status
            )));
        }

        let triggered_at = triggered_at.trunc_subsecs(6);
        let stamp = format_datetime(triggered_at);
        self.db()
            .conn()
            .execute(
                "UPDATE alerts SET message = ?1, scan_id = ?2, triggered_at = ?3, updated_at = ?4
                 WHERE id = ?5",
                libsql::params![
                    draft.message.as_str(),
                    draft.scan_id.as_str(),
                    stamp.as_str(),
                    format_datetime(Utc::now()),
                    alert_id
                ],
            )
            .await?;
        debug!(alert = alert_id, scan = %draft.scan_id, "alert refreshed");

        Ok(Alert {
            message: draft.message.clone(),
            scan_id: draft.scan_id.clone(),
            triggered_at,
            ..current
        })
    }

    /// Alerts for `domain_id`, newest first, optionally filtered by status.
    pub async fn list_alerts(
        &self,
        domain_id: &str,
        status: Option<AlertStatus>,
        limit: u32,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM alerts
             WHERE domain_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY triggered_at DESC, id LIMIT ?3"
        );
        self.query_alerts(
            &sql,
            libsql::params![domain_id, status.map(AlertStatus::as_str), i64::from(limit)],
        )
        .await
    }

    /// Move an alert to `new_status`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the lifecycle forbids the move.
    pub async fn transition_alert(
        &self,
        alert_id: &str,
        new_status: AlertStatus,
    ) -> Result<Alert, DatabaseError> {
        let current = self.get_alert(alert_id).await?;

        if !current.status.can_transition_to(new_status) {
            return Err(DatabaseError::InvalidState(format!(
                "Cannot transition alert {} from {} to {}",
                alert_id, current.status, new_status
            )));
        }

        self.db()
            .conn()
            .execute(
                "UPDATE alerts SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![new_status.as_str(), format_datetime(Utc::now()), alert_id],
            )
            .await?;

        Ok(Alert {
            status: new_status,
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use lode_core::entities::AlertRuleKind;
    use lode_core::enums::Severity;
    use pretty_assertions::assert_eq;

    use crate::test_support::{t0, test_service};

    use super::*;

    async fn service_with_rule() -> (LodeService, String) {
        let svc = test_service().await;
        let rule = svc
            .create_alert_rule("dom-acme", "drop", AlertRuleKind::default_score_drop())
            .await
            .unwrap();
        (svc, rule.id)
    }

    fn draft(rule_id: &str, scan_id: &str, message: &str) -> AlertDraft {
        AlertDraft {
            rule_id: rule_id.into(),
            domain_id: "dom-acme".into(),
            scan_id: scan_id.into(),
            severity: Severity::High,
            message: message.into(),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let (svc, rule_id) = service_with_rule().await;
        let alert = svc
            .create_alert(&draft(&rule_id, "scn-2", "dropped"), t0())
            .await
            .unwrap();
        assert_eq!(svc.get_alert(&alert.id).await.unwrap(), alert);
        assert_eq!(alert.status, AlertStatus::Pending);
    }

    #[tokio::test]
    async fn recent_pending_respects_window_and_status() {
        let (svc, rule_id) = service_with_rule().await;
        let alert = svc
            .create_alert(&draft(&rule_id, "scn-2", "dropped"), t0())
            .await
            .unwrap();

        let found = svc
            .recent_pending_alert(&rule_id, "dom-acme", t0() - Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(found.map(|a| a.id), Some(alert.id.clone()));

        let too_recent = svc
            .recent_pending_alert(&rule_id, "dom-acme", t0() + Duration::seconds(1))
            .await
            .unwrap();
        assert!(too_recent.is_none());

        svc.transition_alert(&alert.id, AlertStatus::Dismissed)
            .await
            .unwrap();
        let dismissed = svc
            .recent_pending_alert(&rule_id, "dom-acme", t0() - Duration::hours(24))
            .await
            .unwrap();
        assert!(dismissed.is_none());
    }

    #[tokio::test]
    async fn refresh_keeps_severity_and_moves_scan() {
        let (svc, rule_id) = service_with_rule().await;
        let alert = svc
            .create_alert(&draft(&rule_id, "scn-2", "dropped by 6.0"), t0())
            .await
            .unwrap();

        let mut next = draft(&rule_id, "scn-3", "dropped by 9.0");
        next.severity = Severity::Critical;
        let later = t0() + Duration::hours(3);
        let refreshed = svc.refresh_pending_alert(&alert.id, &next, later).await.unwrap();

        assert_eq!(refreshed.severity, Severity::High);
        assert_eq!(refreshed.scan_id, "scn-3");
        assert_eq!(refreshed.message, "dropped by 9.0");
        assert_eq!(refreshed.triggered_at, later);
        assert_eq!(svc.get_alert(&alert.id).await.unwrap(), refreshed);
    }

    #[tokio::test]
    async fn transitions_follow_lifecycle() {
        let (svc, rule_id) = service_with_rule().await;
        let alert = svc
            .create_alert(&draft(&rule_id, "scn-2", "dropped"), t0())
            .await
            .unwrap();

        let resolved = svc
            .transition_alert(&alert.id, AlertStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);

        let err = svc
            .transition_alert(&alert.id, AlertStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));

        let err = svc
            .refresh_pending_alert(&alert.id, &draft(&rule_id, "scn-3", "x"), t0())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[tokio::test]
    async fn list_alerts_filters_by_status() {
        let (svc, rule_id) = service_with_rule().await;
        let first = svc
            .create_alert(&draft(&rule_id, "scn-2", "first"), t0())
            .await
            .unwrap();
        svc.create_alert(&draft(&rule_id, "scn-3", "second"), t0() + Duration::hours(30))
            .await
            .unwrap();
        svc.transition_alert(&first.id, AlertStatus::Resolved)
            .await
            .unwrap();

        let all = svc.list_alerts("dom-acme", None, 10).await.unwrap();
        let messages: Vec<&str> = all.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);

        let pending = svc
            .list_alerts("dom-acme", Some(AlertStatus::Pending), 10)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message, "second");
    }
}
