use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ClusterStatus, IssueChange, PillarPresence, Severity};

/// Structured change report between two snapshots of the same domain.
///
/// This is the only monitoring record handed to presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanDiff {
    pub domain_id: String,
    pub previous_scan_id: String,
    pub current_scan_id: String,
    pub overall_score_delta: f64,
    /// `delta / previous * 100`, or 0 when the previous score is 0.
    pub overall_score_delta_percent: f64,
    pub score_deltas: Vec<ScoreDelta>,
    pub new_issues: Vec<IssueDelta>,
    pub resolved_issues: Vec<IssueDelta>,
    pub cluster_deltas: Vec<ClusterDelta>,
    pub page_count_delta: i64,
}

impl ScanDiff {
    /// Whether nothing moved between the two scans.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_empty(&self) -> bool {
        self.overall_score_delta == 0.0
            && self.score_deltas.iter().all(|d| d.delta == 0.0)
            && self.new_issues.is_empty()
            && self.resolved_issues.is_empty()
            && self
                .cluster_deltas
                .iter()
                .all(|c| c.status == ClusterStatus::Unchanged)
            && self.page_count_delta == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDelta {
    pub pillar_id: String,
    pub previous_score: f64,
    pub current_score: f64,
    pub delta: f64,
    pub delta_percent: f64,
    pub presence: PillarPresence,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueDelta {
    pub issue_id: String,
    pub issue_code: String,
    pub severity: Severity,
    pub title: String,
    pub status: IssueChange,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDelta {
    pub cluster_id: String,
    pub cluster_name: String,
    pub status: ClusterStatus,
    pub page_count_delta: i64,
    /// Pillar-weighted score change attributed to the cluster.
    pub score_change: f64,
}
