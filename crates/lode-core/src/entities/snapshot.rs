use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Severity;

/// Point-in-time scan result for a monitored domain. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub scan_id: String,
    pub domain_id: String,
    pub completed_at: DateTime<Utc>,
    pub overall_score: f64,
    #[serde(default)]
    pub pillar_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub issues: Vec<SnapshotIssue>,
    #[serde(default)]
    pub clusters: Vec<SnapshotCluster>,
    #[serde(default)]
    pub page_count: u32,
}

/// An issue detected by a scan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotIssue {
    pub issue_id: String,
    pub issue_code: String,
    pub severity: Severity,
    pub title: String,
}

/// Pages grouped by a shared template.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCluster {
    pub cluster_id: String,
    pub cluster_name: String,
    pub page_count: u32,
    /// Per-pillar scores for the cluster's pages, when the scan computed them.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pillar_scores: BTreeMap<String, f64>,
}
