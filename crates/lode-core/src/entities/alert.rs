use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AlertStatus, Severity};

const fn default_drop_amount() -> f64 {
    5.0
}

const fn default_drop_percent() -> f64 {
    10.0
}

const fn default_min_severity() -> Severity {
    Severity::Medium
}

const fn default_cluster_count() -> u32 {
    1
}

/// A per-domain condition evaluated against every new scan diff.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: String,
    pub domain_id: String,
    pub name: String,
    pub enabled: bool,
    pub kind: AlertRuleKind,
    pub created_at: DateTime<Utc>,
}

/// Rule condition and its thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertRuleKind {
    /// Overall score fell by at least `drop_amount` points or `drop_percent` percent.
    ScoreDrop {
        #[serde(rename = "dropAmount", default = "default_drop_amount")]
        drop_amount: f64,
        #[serde(rename = "dropPercent", default = "default_drop_percent")]
        drop_percent: f64,
    },
    /// A new issue at or above `min_severity` appeared.
    NewIssue {
        #[serde(rename = "minSeverity", default = "default_min_severity")]
        min_severity: Severity,
    },
    /// At least one issue was resolved.
    IssueResolved,
    /// At least `cluster_count` clusters regressed.
    ClusterRegression {
        #[serde(rename = "clusterCount", default = "default_cluster_count")]
        cluster_count: u32,
    },
    /// One pillar fell by at least `drop_amount` points.
    PillarScoreDrop {
        #[serde(rename = "pillarId")]
        pillar_id: String,
        #[serde(rename = "dropAmount", default = "default_drop_amount")]
        drop_amount: f64,
    },
}

impl AlertRuleKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ScoreDrop { .. } => "score_drop",
            Self::NewIssue { .. } => "new_issue",
            Self::IssueResolved => "issue_resolved",
            Self::ClusterRegression { .. } => "cluster_regression",
            Self::PillarScoreDrop { .. } => "pillar_score_drop",
        }
    }

    /// Score drop with the default thresholds (5 points or 10%).
    #[must_use]
    pub const fn default_score_drop() -> Self {
        Self::ScoreDrop {
            drop_amount: default_drop_amount(),
            drop_percent: default_drop_percent(),
        }
    }
}

/// An alert produced when a rule's condition held for a scan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub rule_id: String,
    pub domain_id: String,
    pub scan_id: String,
    pub severity: Severity,
    pub message: String,
    pub status: AlertStatus,
    pub triggered_at: DateTime<Utc>,
}

/// An alert that has been decided but not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertDraft {
    pub rule_id: String,
    pub domain_id: String,
    pub scan_id: String,
    pub severity: Severity,
    pub message: String,
}
