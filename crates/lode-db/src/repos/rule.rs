//! Alert rule repository.

use chrono::{SubsecRound, Utc};
use lode_core::entities::{AlertRule, AlertRuleKind};
use lode_core::ids::PREFIX_RULE;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime, parse_json};
use crate::service::LodeService;

const SELECT_COLS: &str = "id, domain_id, name, config, enabled, created_at";

fn row_to_rule(row: &libsql::Row) -> Result<AlertRule, DatabaseError> {
    let kind: AlertRuleKind = serde_json::from_value(parse_json(&row.get::<String>(3)?)?)
        .map_err(|e| DatabaseError::Query(format!("Invalid rule config: {e}")))?;
    Ok(AlertRule {
        id: row.get(0)?,
        domain_id: row.get(1)?,
        name: row.get(2)?,
        kind,
        enabled: row.get::<i64>(4)? != 0,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl LodeService {
    async fn query_rules(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<AlertRule>, DatabaseError> {
        let mut rows = self.db().conn().query(sql, params).await?;
        let mut rules = Vec::new();
        while let Some(row) = rows.next().await? {
            rules.push(row_to_rule(&row)?);
        }
        Ok(rules)
    }

    /// Register an enabled rule for `domain_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Schema` if the rule does not match the
    /// `alert_rule` schema.
    pub async fn create_alert_rule(
        &self,
        domain_id: &str,
        name: &str,
        kind: AlertRuleKind,
    ) -> Result<AlertRule, DatabaseError> {
        let rule = AlertRule {
            id: self.db().generate_id(PREFIX_RULE).await?,
            domain_id: domain_id.to_string(),
            name: name.to_string(),
            enabled: true,
            kind,
            created_at: Utc::now().trunc_subsecs(6),
        };
        let value = serde_json::to_value(&rule).map_err(|e| DatabaseError::Other(e.into()))?;
        self.schema().validate("alert_rule", &value)?;
        let config = serde_json::to_string(&rule.kind).map_err(|e| DatabaseError::Other(e.into()))?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO alert_rules (id, domain_id, name, rule_type, config, enabled, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
                libsql::params![
                    rule.id.as_str(),
                    domain_id,
                    name,
                    rule.kind.as_str(),
                    config,
                    format_datetime(rule.created_at)
                ],
            )
            .await?;
        Ok(rule)
    }

    pub async fn get_alert_rule(&self, id: &str) -> Result<AlertRule, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM alert_rules WHERE id = ?1");
        self.query_rules(&sql, [id])
            .await?
            .pop()
            .ok_or(DatabaseError::NoResult)
    }

    /// Every rule for `domain_id`, oldest first.
    pub async fn list_alert_rules(&self, domain_id: &str) -> Result<Vec<AlertRule>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM alert_rules WHERE domain_id = ?1 ORDER BY created_at, id"
        );
        self.query_rules(&sql, [domain_id]).await
    }

    /// Enabled rules for `domain_id`, oldest first.
    pub async fn enabled_rules(&self, domain_id: &str) -> Result<Vec<AlertRule>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM alert_rules WHERE domain_id = ?1 AND enabled = 1
             ORDER BY created_at, id"
        );
        self.query_rules(&sql, [domain_id]).await
    }

    pub async fn set_alert_rule_enabled(
        &self,
        id: &str,
        enabled: bool,
    ) -> Result<AlertRule, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE alert_rules SET enabled = ?1 WHERE id = ?2",
                libsql::params![i64::from(enabled), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_alert_rule(id).await
    }
}
