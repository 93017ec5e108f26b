//! Scan completion end to end over an on-disk libSQL database.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use lode_config::MonitorConfig;
use lode_core::entities::{AlertRuleKind, Snapshot, SnapshotCluster, SnapshotIssue};
use lode_core::enums::{AlertStatus, ClusterStatus, Severity};
use lode_db::service::LodeService;
use lode_monitor::process_scan_completion;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 4, 0, 0).unwrap()
}

fn issue(id: &str, severity: Severity) -> SnapshotIssue {
    SnapshotIssue {
        issue_id: id.into(),
        issue_code: id.to_lowercase(),
        severity,
        title: format!("{id} title"),
    }
}

fn snapshot(scan_id: &str, days: i64, overall: f64, content: f64, issues: Vec<SnapshotIssue>) -> Snapshot {
    Snapshot {
        scan_id: scan_id.into(),
        domain_id: "dom-blog".into(),
        completed_at: t0() + Duration::days(days),
        overall_score: overall,
        pillar_scores: BTreeMap::from([
            ("content".to_string(), content),
            ("technical".to_string(), 80.0),
        ]),
        issues,
        clusters: vec![SnapshotCluster {
            cluster_id: "guides".into(),
            cluster_name: "Guides".into(),
            page_count: 12,
            pillar_scores: BTreeMap::from([("content".to_string(), content)]),
        }],
        page_count: 120,
    }
}

async fn service(dir: &TempDir) -> LodeService {
    let path = dir.path().join("lodestar.db");
    LodeService::new_local(path.to_str().unwrap()).await.unwrap()
}

#[tokio::test]
async fn weekly_scans_raise_and_dedupe_alerts() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir).await;
    let config = MonitorConfig::default();

    svc.create_alert_rule("dom-blog", "score drop", AlertRuleKind::default_score_drop())
        .await
        .unwrap();
    svc.create_alert_rule("dom-blog", "clusters", AlertRuleKind::ClusterRegression { cluster_count: 1 })
        .await
        .unwrap();

    svc.append_snapshot(&snapshot("scn-w1", 0, 82.0, 85.0, vec![issue("ISSUE_A", Severity::Low)]))
        .await
        .unwrap();
    let first = process_scan_completion(&svc, "dom-blog", "scn-w1", t0(), &config)
        .await
        .unwrap();
    assert!(first.diff.is_none());

    svc.append_snapshot(&snapshot("scn-w2", 7, 70.0, 60.0, vec![]))
        .await
        .unwrap();
    let second = process_scan_completion(&svc, "dom-blog", "scn-w2", t0() + Duration::days(7), &config)
        .await
        .unwrap();
    let diff = second.diff.as_ref().unwrap();
    assert_eq!(diff.previous_scan_id, "scn-w1");
    assert_eq!(diff.cluster_deltas[0].status, ClusterStatus::Regressed);
    assert_eq!(diff.resolved_issues.len(), 1);
    assert_eq!(second.alerts_created.len(), 2);

    // A corrected rerun of the same week lands within the dedup window.
    svc.append_snapshot(&snapshot("scn-w2b", 7, 68.0, 58.0, vec![]))
        .await
        .unwrap();
    let rerun = process_scan_completion(
        &svc,
        "dom-blog",
        "scn-w2b",
        t0() + Duration::days(7) + Duration::hours(2),
        &config,
    )
    .await
    .unwrap();
    assert_eq!(rerun.diff.as_ref().unwrap().previous_scan_id, "scn-w2");
    assert!(rerun.alerts_created.is_empty());

    let alerts = svc
        .list_alerts("dom-blog", Some(AlertStatus::Pending), 10)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a.scan_id == "scn-w2b" || a.scan_id == "scn-w2"));
}

#[tokio::test]
async fn reopened_database_keeps_history() {
    let dir = TempDir::new().unwrap();
    {
        let svc = service(&dir).await;
        svc.append_snapshot(&snapshot("scn-1", 0, 50.0, 50.0, vec![]))
            .await
            .unwrap();
        svc.append_snapshot(&snapshot("scn-2", 1, 55.0, 56.0, vec![]))
            .await
            .unwrap();
    }

    let svc = service(&dir).await;
    let listed = svc.list_snapshots("dom-blog", 10).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|s| s.scan_id.as_str()).collect();
    assert_eq!(ids, vec!["scn-2", "scn-1"]);

    let report = process_scan_completion(&svc, "dom-blog", "scn-2", t0() + Duration::days(1), &MonitorConfig::default())
        .await
        .unwrap();
    let diff = report.diff.unwrap();
    assert_eq!(diff.overall_score_delta, 5.0);
    assert!(report.alerts_created.is_empty());
}
