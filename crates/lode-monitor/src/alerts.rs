//! Alert-rule evaluation over a scan diff.
//!
//! Rules are pure predicates over an [`AlertContext`]. Persisting the
//! resulting drafts, and de-duplicating them, is the pipeline's job.

use lode_core::entities::{AlertDraft, AlertRule, AlertRuleKind, ScanDiff};
use lode_core::enums::{ClusterStatus, Severity};
use tracing::debug;

/// Everything a rule may look at for one completed scan.
#[derive(Debug, Clone, Copy)]
pub struct AlertContext<'a> {
    pub scan_id: &'a str,
    pub domain_id: &'a str,
    pub diff: &'a ScanDiff,
    pub current_score: f64,
    /// `None` for a domain's first scan.
    pub previous_score: Option<f64>,
}

impl AlertContext<'_> {
    fn regressed_clusters(&self) -> usize {
        self.diff
            .cluster_deltas
            .iter()
            .filter(|c| c.status == ClusterStatus::Regressed)
            .count()
    }

    fn new_issues_of(&self, severity: Severity) -> usize {
        self.diff
            .new_issues
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }

    fn pillar_delta(&self, pillar_id: &str) -> Option<f64> {
        self.diff
            .score_deltas
            .iter()
            .find(|d| d.pillar_id == pillar_id)
            .map(|d| d.delta)
    }
}

/// Whether the rule's condition holds.
#[must_use]
pub fn evaluate_rule(kind: &AlertRuleKind, ctx: &AlertContext<'_>) -> bool {
    match kind {
        AlertRuleKind::ScoreDrop {
            drop_amount,
            drop_percent,
        } => {
            let Some(previous) = ctx.previous_score else {
                return false;
            };
            let drop = previous - ctx.current_score;
            let drop_pct = if previous > 0.0 {
                drop / previous * 100.0
            } else {
                0.0
            };
            drop >= *drop_amount || drop_pct >= *drop_percent
        }
        AlertRuleKind::NewIssue { min_severity } => ctx
            .diff
            .new_issues
            .iter()
            .any(|issue| issue.severity.at_least(*min_severity)),
        AlertRuleKind::IssueResolved => !ctx.diff.resolved_issues.is_empty(),
        AlertRuleKind::ClusterRegression { cluster_count } => {
            ctx.regressed_clusters() >= *cluster_count as usize
        }
        AlertRuleKind::PillarScoreDrop {
            pillar_id,
            drop_amount,
        } => ctx
            .pillar_delta(pillar_id)
            .is_some_and(|delta| delta <= -*drop_amount),
    }
}

/// Human-readable alert text for a rule that fired.
#[must_use]
pub fn alert_message(kind: &AlertRuleKind, ctx: &AlertContext<'_>) -> String {
    match kind {
        AlertRuleKind::ScoreDrop { .. } => {
            let previous = ctx.previous_score.unwrap_or(ctx.current_score);
            format!(
                "Overall score dropped by {:.1} points ({:.1} from {:.1})",
                previous - ctx.current_score,
                ctx.current_score,
                previous
            )
        }
        AlertRuleKind::NewIssue { .. } => {
            let critical = ctx.new_issues_of(Severity::Critical);
            let high = ctx.new_issues_of(Severity::High);
            if critical > 0 {
                format!("{critical} critical issue(s) detected")
            } else if high > 0 {
                format!("{high} high-severity issue(s) detected")
            } else {
                format!("{} new issue(s) detected", ctx.diff.new_issues.len())
            }
        }
        AlertRuleKind::IssueResolved => {
            format!("{} issue(s) resolved", ctx.diff.resolved_issues.len())
        }
        AlertRuleKind::ClusterRegression { .. } => {
            format!("{} cluster(s) regressed", ctx.regressed_clusters())
        }
        AlertRuleKind::PillarScoreDrop { pillar_id, .. } => ctx.pillar_delta(pillar_id).map_or_else(
            || "Pillar score drop detected".to_string(),
            |delta| {
                format!(
                    "Pillar {pillar_id} score dropped by {:.1} points",
                    delta.abs()
                )
            },
        ),
    }
}

/// Severity of an alert for a rule that fired.
///
/// Score drops scale with the overall drop percent (20% critical, 10% high,
/// 5% medium). New issues take the worst new severity, floored at medium.
/// Pillar drops are high; every other rule is medium.
#[must_use]
pub fn alert_severity(kind: &AlertRuleKind, ctx: &AlertContext<'_>) -> Severity {
    match kind {
        AlertRuleKind::ScoreDrop { .. } => {
            let pct = ctx.diff.overall_score_delta_percent.abs();
            if pct >= 20.0 {
                Severity::Critical
            } else if pct >= 10.0 {
                Severity::High
            } else if pct >= 5.0 {
                Severity::Medium
            } else {
                Severity::Low
            }
        }
        AlertRuleKind::NewIssue { .. } => {
            if ctx.new_issues_of(Severity::Critical) > 0 {
                Severity::Critical
            } else if ctx.new_issues_of(Severity::High) > 0 {
                Severity::High
            } else {
                Severity::Medium
            }
        }
        AlertRuleKind::IssueResolved | AlertRuleKind::ClusterRegression { .. } => Severity::Medium,
        AlertRuleKind::PillarScoreDrop { .. } => Severity::High,
    }
}

/// Drafts for every enabled rule whose condition holds, in rule order.
#[must_use]
pub fn evaluate_alert_rules(rules: &[AlertRule], ctx: &AlertContext<'_>) -> Vec<AlertDraft> {
    rules
        .iter()
        .filter(|rule| rule.enabled && rule.domain_id == ctx.domain_id)
        .filter(|rule| evaluate_rule(&rule.kind, ctx))
        .map(|rule| {
            debug!(rule = %rule.id, kind = rule.kind.as_str(), scan = ctx.scan_id, "alert rule fired");
            AlertDraft {
                rule_id: rule.id.clone(),
                domain_id: ctx.domain_id.to_string(),
                scan_id: ctx.scan_id.to_string(),
                severity: alert_severity(&rule.kind, ctx),
                message: alert_message(&rule.kind, ctx),
            }
        })
        .collect()
}
