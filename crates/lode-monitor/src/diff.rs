//! Structural diff between two snapshots of one domain.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use lode_config::MonitorConfig;
use lode_core::entities::{
    ClusterDelta, IssueDelta, ScanDiff, ScoreDelta, Snapshot, SnapshotCluster, SnapshotIssue,
};
use lode_core::enums::{ClusterStatus, IssueChange, PillarPresence};
use tracing::debug;

use crate::error::MonitorError;

/// Tunables for cluster status classification.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Weight per pillar in the cluster score change. Unlisted pillars weigh 1.0.
    pub pillar_weights: BTreeMap<String, f64>,
}

impl DiffOptions {
    #[must_use]
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            pillar_weights: config.pillar_weights.clone(),
        }
    }

    fn weight(&self, pillar_id: &str) -> f64 {
        self.pillar_weights.get(pillar_id).copied().unwrap_or(1.0)
    }
}

/// Diff two scans with unit pillar weights. See [`diff_scans_with`].
///
/// # Errors
///
/// See [`diff_scans_with`].
pub fn diff_scans(
    previous_scan_id: &str,
    current_scan_id: &str,
    previous: Option<&Snapshot>,
    current: Option<&Snapshot>,
) -> Result<Option<ScanDiff>, MonitorError> {
    diff_scans_with(
        previous_scan_id,
        current_scan_id,
        previous,
        current,
        &DiffOptions::default(),
    )
}

/// Diff the snapshot of `previous_scan_id` against that of `current_scan_id`.
///
/// Returns `Ok(None)` when either snapshot is missing: there is nothing to
/// compare yet, which is not an error.
///
/// # Errors
///
/// - [`MonitorError::ScanMismatch`] if a snapshot's `scan_id` differs from the
///   id passed for it.
/// - [`MonitorError::DomainMismatch`] if the snapshots belong to different
///   domains.
pub fn diff_scans_with(
    previous_scan_id: &str,
    current_scan_id: &str,
    previous: Option<&Snapshot>,
    current: Option<&Snapshot>,
    options: &DiffOptions,
) -> Result<Option<ScanDiff>, MonitorError> {
    for (expected, snapshot) in [(previous_scan_id, previous), (current_scan_id, current)] {
        if let Some(snapshot) = snapshot {
            if snapshot.scan_id != expected {
                return Err(MonitorError::ScanMismatch {
                    expected: expected.to_string(),
                    found: snapshot.scan_id.clone(),
                });
            }
        }
    }

    let (Some(previous), Some(current)) = (previous, current) else {
        debug!(previous_scan_id, current_scan_id, "snapshot missing, no diff");
        return Ok(None);
    };

    if previous.domain_id != current.domain_id {
        return Err(MonitorError::DomainMismatch {
            previous: previous.domain_id.clone(),
            current: current.domain_id.clone(),
        });
    }

    let overall_score_delta = current.overall_score - previous.overall_score;
    let (new_issues, resolved_issues) = diff_issues(&previous.issues, &current.issues);

    let diff = ScanDiff {
        domain_id: current.domain_id.clone(),
        previous_scan_id: previous.scan_id.clone(),
        current_scan_id: current.scan_id.clone(),
        overall_score_delta,
        overall_score_delta_percent: percent_of(overall_score_delta, previous.overall_score),
        score_deltas: diff_pillars(&previous.pillar_scores, &current.pillar_scores),
        new_issues,
        resolved_issues,
        cluster_deltas: diff_clusters(&previous.clusters, &current.clusters, options),
        page_count_delta: i64::from(current.page_count) - i64::from(previous.page_count),
    };

    debug!(
        domain = %diff.domain_id,
        previous = %diff.previous_scan_id,
        current = %diff.current_scan_id,
        delta = diff.overall_score_delta,
        new_issues = diff.new_issues.len(),
        resolved_issues = diff.resolved_issues.len(),
        "computed scan diff"
    );
    Ok(Some(diff))
}

/// `delta / previous * 100`, or 0 when `previous` is 0.
#[allow(clippy::float_cmp)]
fn percent_of(delta: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        delta / previous * 100.0
    }
}

/// One delta per pillar present in either snapshot, ordered by pillar id.
/// A missing side counts as 0 and is flagged by `presence`.
fn diff_pillars(
    previous: &BTreeMap<String, f64>,
    current: &BTreeMap<String, f64>,
) -> Vec<ScoreDelta> {
    let pillars: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();
    pillars
        .into_iter()
        .map(|pillar_id| {
            let (previous_score, current_score, presence) =
                match (previous.get(pillar_id), current.get(pillar_id)) {
                    (Some(&p), Some(&c)) => (p, c, PillarPresence::Both),
                    (Some(&p), None) => (p, 0.0, PillarPresence::PreviousOnly),
                    (None, Some(&c)) => (0.0, c, PillarPresence::CurrentOnly),
                    (None, None) => (0.0, 0.0, PillarPresence::Both),
                };
            let delta = current_score - previous_score;
            ScoreDelta {
                pillar_id: pillar_id.clone(),
                previous_score,
                current_score,
                delta,
                delta_percent: percent_of(delta, previous_score),
                presence,
            }
        })
        .collect()
}

/// Set difference on `issue_id`, preserving each snapshot's order.
fn diff_issues(
    previous: &[SnapshotIssue],
    current: &[SnapshotIssue],
) -> (Vec<IssueDelta>, Vec<IssueDelta>) {
    (
        issues_missing_from(current, previous, IssueChange::New),
        issues_missing_from(previous, current, IssueChange::Resolved),
    )
}

/// Issues of `issues` whose id does not appear in `other`, each id once.
fn issues_missing_from(
    issues: &[SnapshotIssue],
    other: &[SnapshotIssue],
    status: IssueChange,
) -> Vec<IssueDelta> {
    let other_ids: HashSet<&str> = other.iter().map(|i| i.issue_id.as_str()).collect();
    let mut seen = HashSet::new();
    issues
        .iter()
        .filter(|issue| !other_ids.contains(issue.issue_id.as_str()))
        .filter(|issue| seen.insert(issue.issue_id.as_str()))
        .map(|issue| IssueDelta {
            issue_id: issue.issue_id.clone(),
            issue_code: issue.issue_code.clone(),
            severity: issue.severity,
            title: issue.title.clone(),
            status,
        })
        .collect()
}

/// Full outer join on `cluster_id`, ordered by cluster id.
fn diff_clusters(
    previous: &[SnapshotCluster],
    current: &[SnapshotCluster],
    options: &DiffOptions,
) -> Vec<ClusterDelta> {
    let previous: BTreeMap<&str, &SnapshotCluster> =
        previous.iter().map(|c| (c.cluster_id.as_str(), c)).collect();
    let current: BTreeMap<&str, &SnapshotCluster> =
        current.iter().map(|c| (c.cluster_id.as_str(), c)).collect();
    let ids: BTreeSet<&str> = previous.keys().chain(current.keys()).copied().collect();

    ids.into_iter()
        .filter_map(|id| match (previous.get(id), current.get(id)) {
            (None, Some(cur)) => Some(ClusterDelta {
                cluster_id: cur.cluster_id.clone(),
                cluster_name: cur.cluster_name.clone(),
                status: ClusterStatus::New,
                page_count_delta: i64::from(cur.page_count),
                score_change: 0.0,
            }),
            (Some(prev), None) => Some(ClusterDelta {
                cluster_id: prev.cluster_id.clone(),
                cluster_name: prev.cluster_name.clone(),
                status: ClusterStatus::Removed,
                page_count_delta: -i64::from(prev.page_count),
                score_change: 0.0,
            }),
            (Some(prev), Some(cur)) => Some(compare_cluster(prev, cur, options)),
            (None, None) => None,
        })
        .collect()
}

/// Weighted pillar change decides the status; page-count change breaks a
/// zero score change. Only pillars scored in both snapshots count.
fn compare_cluster(
    previous: &SnapshotCluster,
    current: &SnapshotCluster,
    options: &DiffOptions,
) -> ClusterDelta {
    let score_change: f64 = current
        .pillar_scores
        .iter()
        .filter_map(|(pillar, cur)| {
            previous
                .pillar_scores
                .get(pillar)
                .map(|prev| options.weight(pillar) * (cur - prev))
        })
        .sum();
    let page_count_delta = i64::from(current.page_count) - i64::from(previous.page_count);

    let status = if score_change > 0.0 {
        ClusterStatus::Improved
    } else if score_change < 0.0 {
        ClusterStatus::Regressed
    } else if page_count_delta > 0 {
        ClusterStatus::Improved
    } else if page_count_delta < 0 {
        ClusterStatus::Regressed
    } else {
        ClusterStatus::Unchanged
    };

    ClusterDelta {
        cluster_id: current.cluster_id.clone(),
        cluster_name: current.cluster_name.clone(),
        status,
        page_count_delta,
        score_change,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use lode_core::enums::Severity;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn snapshot(scan_id: &str, overall: f64) -> Snapshot {
        Snapshot {
            scan_id: scan_id.into(),
            domain_id: "dom-d".into(),
            completed_at: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
            overall_score: overall,
            pillar_scores: BTreeMap::new(),
            issues: Vec::new(),
            clusters: Vec::new(),
            page_count: 0,
        }
    }

    fn issue(id: &str, severity: Severity) -> SnapshotIssue {
        SnapshotIssue {
            issue_id: id.into(),
            issue_code: id.to_lowercase(),
            severity,
            title: format!("Issue {id}"),
        }
    }

    fn cluster(id: &str, pages: u32, pillars: &[(&str, f64)]) -> SnapshotCluster {
        SnapshotCluster {
            cluster_id: id.into(),
            cluster_name: id.to_uppercase(),
            page_count: pages,
            pillar_scores: pillars.iter().map(|(p, s)| ((*p).to_string(), *s)).collect(),
        }
    }

    #[test]
    fn example_scenario() {
        let mut s1 = snapshot("scn-1", 62.0);
        s1.pillar_scores.insert("content".into(), 70.0);
        s1.issues.push(issue("ISSUE_A", Severity::Critical));

        let mut s2 = snapshot("scn-2", 68.5);
        s2.pillar_scores.insert("content".into(), 75.0);
        s2.issues.push(issue("ISSUE_B", Severity::High));

        let diff = diff_scans("scn-1", "scn-2", Some(&s1), Some(&s2))
            .unwrap()
            .unwrap();

        assert!((diff.overall_score_delta - 6.5).abs() < 1e-9);
        assert!((diff.overall_score_delta_percent - 10.4839).abs() < 1e-3);
        assert_eq!(diff.score_deltas.len(), 1);
        let content = &diff.score_deltas[0];
        assert_eq!(content.pillar_id, "content");
        assert!((content.previous_score - 70.0).abs() < 1e-9);
        assert!((content.current_score - 75.0).abs() < 1e-9);
        assert!((content.delta - 5.0).abs() < 1e-9);
        assert!((content.delta_percent - 7.1429).abs() < 1e-3);
        assert_eq!(content.presence, PillarPresence::Both);

        let new: Vec<&str> = diff.new_issues.iter().map(|i| i.issue_id.as_str()).collect();
        let resolved: Vec<&str> = diff
            .resolved_issues
            .iter()
            .map(|i| i.issue_id.as_str())
            .collect();
        assert_eq!(new, vec!["ISSUE_B"]);
        assert_eq!(resolved, vec!["ISSUE_A"]);
        assert_eq!(diff.new_issues[0].status, IssueChange::New);
        assert_eq!(diff.resolved_issues[0].severity, Severity::Critical);
    }

    #[test]
    fn self_diff_is_empty() {
        let mut s = snapshot("scn-1", 55.0);
        s.pillar_scores.insert("technical".into(), 40.0);
        s.issues.push(issue("ISSUE_A", Severity::Low));
        s.clusters.push(cluster("blog", 12, &[("content", 50.0)]));
        s.page_count = 12;

        let diff = diff_scans("scn-1", "scn-1", Some(&s), Some(&s))
            .unwrap()
            .unwrap();
        assert!(diff.is_empty());
        assert!(diff.score_deltas.iter().all(|d| d.delta == 0.0));
        assert!(
            diff.cluster_deltas
                .iter()
                .all(|c| c.status == ClusterStatus::Unchanged)
        );
    }

    #[test]
    fn missing_snapshot_yields_none() {
        let s = snapshot("scn-2", 50.0);
        assert!(diff_scans("scn-1", "scn-2", None, Some(&s)).unwrap().is_none());
        assert!(diff_scans("scn-2", "scn-3", Some(&s), None).unwrap().is_none());
    }

    #[test]
    fn different_domains_are_rejected() {
        let a = snapshot("scn-1", 50.0);
        let mut b = snapshot("scn-2", 50.0);
        b.domain_id = "dom-other".into();
        let err = diff_scans("scn-1", "scn-2", Some(&a), Some(&b)).unwrap_err();
        assert!(matches!(err, MonitorError::DomainMismatch { .. }));
    }

    #[test]
    fn mismatched_scan_id_is_rejected() {
        let a = snapshot("scn-1", 50.0);
        let b = snapshot("scn-2", 50.0);
        let err = diff_scans("scn-1", "scn-9", Some(&a), Some(&b)).unwrap_err();
        assert!(
            matches!(err, MonitorError::ScanMismatch { expected, found } if expected == "scn-9" && found == "scn-2")
        );
    }

    #[test]
    fn zero_previous_score_gives_zero_percent() {
        let a = snapshot("scn-1", 0.0);
        let b = snapshot("scn-2", 30.0);
        let diff = diff_scans("scn-1", "scn-2", Some(&a), Some(&b))
            .unwrap()
            .unwrap();
        assert!((diff.overall_score_delta - 30.0).abs() < 1e-9);
        assert!(diff.overall_score_delta_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn one_sided_pillars_are_marked() {
        let mut a = snapshot("scn-1", 50.0);
        a.pillar_scores.insert("authority".into(), 20.0);
        a.pillar_scores.insert("content".into(), 0.0);
        let mut b = snapshot("scn-2", 50.0);
        b.pillar_scores.insert("technical".into(), 35.0);
        b.pillar_scores.insert("content".into(), 0.0);

        let diff = diff_scans("scn-1", "scn-2", Some(&a), Some(&b))
            .unwrap()
            .unwrap();
        let summary: Vec<(&str, f64, PillarPresence)> = diff
            .score_deltas
            .iter()
            .map(|d| (d.pillar_id.as_str(), d.delta, d.presence))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("authority", -20.0, PillarPresence::PreviousOnly),
                ("content", 0.0, PillarPresence::Both),
                ("technical", 35.0, PillarPresence::CurrentOnly),
            ]
        );
        assert!(diff.score_deltas[2].delta_percent.abs() < f64::EPSILON);
    }

    #[rstest]
    #[case::score_up(10, 10, &[("content", 50.0)], &[("content", 60.0)], ClusterStatus::Improved)]
    #[case::score_down_despite_more_pages(10, 20, &[("content", 50.0)], &[("content", 45.0)], ClusterStatus::Regressed)]
    #[case::pages_lost(10, 8, &[], &[], ClusterStatus::Regressed)]
    #[case::pages_gained(10, 11, &[("content", 50.0)], &[("content", 50.0)], ClusterStatus::Improved)]
    #[case::nothing_moved(10, 10, &[("content", 50.0)], &[("content", 50.0)], ClusterStatus::Unchanged)]
    #[case::one_sided_pillar_ignored(10, 10, &[], &[("content", 80.0)], ClusterStatus::Unchanged)]
    fn cluster_status(
        #[case] prev_pages: u32,
        #[case] cur_pages: u32,
        #[case] prev_pillars: &[(&str, f64)],
        #[case] cur_pillars: &[(&str, f64)],
        #[case] expected: ClusterStatus,
    ) {
        let mut a = snapshot("scn-1", 50.0);
        a.clusters.push(cluster("city", prev_pages, prev_pillars));
        let mut b = snapshot("scn-2", 50.0);
        b.clusters.push(cluster("city", cur_pages, cur_pillars));

        let diff = diff_scans("scn-1", "scn-2", Some(&a), Some(&b))
            .unwrap()
            .unwrap();
        assert_eq!(diff.cluster_deltas[0].status, expected);
    }

    #[test]
    fn pillar_weights_shift_cluster_status() {
        let mut a = snapshot("scn-1", 50.0);
        a.clusters
            .push(cluster("city", 10, &[("content", 50.0), ("technical", 50.0)]));
        let mut b = snapshot("scn-2", 50.0);
        b.clusters
            .push(cluster("city", 10, &[("content", 54.0), ("technical", 47.0)]));

        let unweighted = diff_scans("scn-1", "scn-2", Some(&a), Some(&b))
            .unwrap()
            .unwrap();
        assert_eq!(unweighted.cluster_deltas[0].status, ClusterStatus::Improved);

        let options = DiffOptions {
            pillar_weights: BTreeMap::from([("technical".to_string(), 2.0)]),
        };
        let weighted = diff_scans_with("scn-1", "scn-2", Some(&a), Some(&b), &options)
            .unwrap()
            .unwrap();
        assert_eq!(weighted.cluster_deltas[0].status, ClusterStatus::Regressed);
        assert!((weighted.cluster_deltas[0].score_change + 2.0).abs() < 1e-9);
    }

    #[test]
    fn new_and_removed_clusters() {
        let mut a = snapshot("scn-1", 50.0);
        a.clusters.push(cluster("old", 4, &[]));
        a.page_count = 4;
        let mut b = snapshot("scn-2", 50.0);
        b.clusters.push(cluster("fresh", 9, &[]));
        b.page_count = 9;

        let diff = diff_scans("scn-1", "scn-2", Some(&a), Some(&b))
            .unwrap()
            .unwrap();
        let statuses: Vec<(&str, ClusterStatus, i64)> = diff
            .cluster_deltas
            .iter()
            .map(|c| (c.cluster_id.as_str(), c.status, c.page_count_delta))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("fresh", ClusterStatus::New, 9),
                ("old", ClusterStatus::Removed, -4),
            ]
        );
        assert_eq!(diff.page_count_delta, 5);
    }

    #[test]
    fn diff_is_deterministic() {
        let mut a = snapshot("scn-1", 40.0);
        let mut b = snapshot("scn-2", 45.0);
        for (i, p) in ["z", "a", "m"].iter().enumerate() {
            a.pillar_scores.insert((*p).into(), 10.0 * i as f64);
            b.pillar_scores.insert((*p).into(), 12.0 * i as f64);
            a.clusters.push(cluster(p, 3, &[]));
        }
        let first = diff_scans("scn-1", "scn-2", Some(&a), Some(&b)).unwrap();
        let second = diff_scans("scn-1", "scn-2", Some(&a), Some(&b)).unwrap();
        assert_eq!(first, second);
    }
}
