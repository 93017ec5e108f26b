use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use lode_core::entities::{AlertRuleKind, ScanDiff, Snapshot};
use lode_core::enums::{AlertStatus, Severity};
use lode_db::service::LodeService;
use lode_monitor::{DiffOptions, diff_scans_with, ensure_scan_domain, process_scan_completion};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{MonitorCommands, RuleAddArgs, RuleCommands};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotSummary<'a> {
    scan_id: &'a str,
    domain_id: &'a str,
    completed_at: DateTime<Utc>,
    overall_score: f64,
    issues: usize,
    clusters: usize,
    page_count: u32,
}

impl<'a> From<&'a Snapshot> for SnapshotSummary<'a> {
    fn from(snapshot: &'a Snapshot) -> Self {
        Self {
            scan_id: &snapshot.scan_id,
            domain_id: &snapshot.domain_id,
            completed_at: snapshot.completed_at,
            overall_score: snapshot.overall_score,
            issues: snapshot.issues.len(),
            clusters: snapshot.clusters.len(),
            page_count: snapshot.page_count,
        }
    }
}

/// Handle `lode monitor`.
pub async fn handle(
    action: &MonitorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = ctx.open_service().await?;
    let default_limit = ctx.config.general.default_limit;

    match action {
        MonitorCommands::Ingest { file } => {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let snapshot: Snapshot = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a snapshot document", file.display()))?;
            svc.append_snapshot(&snapshot).await?;
            output(&SnapshotSummary::from(&snapshot), flags.format)
        }
        MonitorCommands::Latest { domain } => {
            let latest = svc
                .latest_snapshot(domain)
                .await?
                .ok_or_else(|| anyhow!("no snapshots for domain '{domain}'"))?;
            output(&latest, flags.format)
        }
        MonitorCommands::History { domain } => {
            let snapshots = svc
                .list_snapshots(domain, effective_limit(flags, default_limit))
                .await?;
            let summaries: Vec<SnapshotSummary<'_>> = snapshots.iter().map(Into::into).collect();
            output(&summaries, flags.format)
        }
        MonitorCommands::Diff { domain, scan } => {
            let options = DiffOptions::from_config(&ctx.config.monitor);
            let diff = scan_diff(&svc, domain, scan.as_deref(), &options).await?;
            output(&diff, flags.format)
        }
        MonitorCommands::Complete { domain, scan } => {
            let report =
                process_scan_completion(&svc, domain, scan, Utc::now(), &ctx.config.monitor)
                    .await?;
            output(&report, flags.format)
        }
        MonitorCommands::Alerts { domain, status } => {
            let status = status
                .as_deref()
                .map(|raw| parse_enum::<AlertStatus>(raw, "status"))
                .transpose()?;
            let alerts = svc
                .list_alerts(domain, status, effective_limit(flags, default_limit))
                .await?;
            output(&alerts, flags.format)
        }
        MonitorCommands::Resolve { alert_id } => {
            output(&svc.transition_alert(alert_id, AlertStatus::Resolved).await?, flags.format)
        }
        MonitorCommands::Dismiss { alert_id } => {
            output(&svc.transition_alert(alert_id, AlertStatus::Dismissed).await?, flags.format)
        }
        MonitorCommands::Rule { action } => rule(&svc, action, flags).await,
    }
}

/// Diff a domain's latest scan, or `scan` when given, against its predecessor.
async fn scan_diff(
    svc: &LodeService,
    domain: &str,
    scan: Option<&str>,
    options: &DiffOptions,
) -> anyhow::Result<Option<ScanDiff>> {
    let current = match scan {
        Some(scan) => svc.find_snapshot(scan).await?,
        None => svc.latest_snapshot(domain).await?,
    }
    .ok_or_else(|| anyhow!("no snapshot to diff for domain '{domain}'"))?;
    ensure_scan_domain(&current, domain)?;
    let previous = svc.previous_snapshot(domain, &current.scan_id).await?;

    let diff = diff_scans_with(
        previous.as_ref().map_or("", |p| p.scan_id.as_str()),
        &current.scan_id,
        previous.as_ref(),
        Some(&current),
        options,
    )?;
    if diff.is_none() {
        tracing::warn!(domain, scan = %current.scan_id, "no previous snapshot to diff against");
    }
    Ok(diff)
}

async fn rule(svc: &LodeService, action: &RuleCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        RuleCommands::Add(args) => {
            let kind = rule_kind(args)?;
            let name = args.name.clone().unwrap_or_else(|| kind.as_str().to_string());
            output(&svc.create_alert_rule(&args.domain, &name, kind).await?, flags.format)
        }
        RuleCommands::List { domain } => output(&svc.list_alert_rules(domain).await?, flags.format),
        RuleCommands::Enable { id } => {
            output(&svc.set_alert_rule_enabled(id, true).await?, flags.format)
        }
        RuleCommands::Disable { id } => {
            output(&svc.set_alert_rule_enabled(id, false).await?, flags.format)
        }
    }
}

/// Build a rule condition from CLI flags. Unset thresholds take the rule
/// type's serde defaults.
fn rule_kind(args: &RuleAddArgs) -> anyhow::Result<AlertRuleKind> {
    let rule_type = args.rule_type.replace('-', "_");
    let mut doc = serde_json::Map::new();
    doc.insert("type".into(), rule_type.clone().into());
    if let Some(amount) = args.drop_amount {
        doc.insert("dropAmount".into(), amount.into());
    }
    if let Some(percent) = args.drop_percent {
        doc.insert("dropPercent".into(), percent.into());
    }
    if let Some(severity) = &args.min_severity {
        let severity: Severity = parse_enum(severity, "severity")?;
        doc.insert("minSeverity".into(), severity.as_str().into());
    }
    if let Some(count) = args.cluster_count {
        doc.insert("clusterCount".into(), count.into());
    }
    if let Some(pillar) = &args.pillar {
        doc.insert("pillarId".into(), pillar.clone().into());
    }
    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|error| anyhow!("invalid {rule_type} rule: {error}"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, TimeZone};
    use lode_monitor::MonitorError;
    use pretty_assertions::assert_eq;

    use super::*;

    fn snapshot(scan_id: &str, domain_id: &str, hours: i64, overall: f64) -> Snapshot {
        Snapshot {
            scan_id: scan_id.into(),
            domain_id: domain_id.into(),
            completed_at: Utc.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap()
                + Duration::hours(hours),
            overall_score: overall,
            pillar_scores: BTreeMap::from([("content".to_string(), overall)]),
            issues: Vec::new(),
            clusters: Vec::new(),
            page_count: 10,
        }
    }

    async fn seeded_service() -> LodeService {
        let svc = LodeService::new_local(":memory:").await.unwrap();
        for snap in [
            snapshot("scn-1", "dom-acme", 0, 60.0),
            snapshot("scn-2", "dom-acme", 24, 66.5),
            snapshot("scn-9", "dom-other", 12, 40.0),
        ] {
            svc.append_snapshot(&snap).await.unwrap();
        }
        svc
    }

    #[tokio::test]
    async fn diff_defaults_to_latest_scan() {
        let svc = seeded_service().await;
        let diff = scan_diff(&svc, "dom-acme", None, &DiffOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(diff.previous_scan_id, "scn-1");
        assert_eq!(diff.current_scan_id, "scn-2");
    }

    #[tokio::test]
    async fn first_scan_has_nothing_to_diff() {
        let svc = seeded_service().await;
        let diff = scan_diff(&svc, "dom-acme", Some("scn-1"), &DiffOptions::default())
            .await
            .unwrap();
        assert!(diff.is_none());
    }

    #[tokio::test]
    async fn scan_from_another_domain_is_rejected() {
        let svc = seeded_service().await;
        let err = scan_diff(&svc, "dom-acme", Some("scn-9"), &DiffOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MonitorError>(),
            Some(MonitorError::ForeignScan { found, .. }) if found == "dom-other"
        ));
    }

    fn args(rule_type: &str) -> RuleAddArgs {
        RuleAddArgs {
            domain: "dom-acme".into(),
            rule_type: rule_type.into(),
            name: None,
            drop_amount: None,
            drop_percent: None,
            min_severity: None,
            cluster_count: None,
            pillar: None,
        }
    }

    #[test]
    fn score_drop_uses_default_thresholds() {
        assert_eq!(
            rule_kind(&args("score-drop")).unwrap(),
            AlertRuleKind::default_score_drop()
        );
    }

    #[test]
    fn new_issue_parses_severity() {
        let mut a = args("new-issue");
        a.min_severity = Some("critical".into());
        assert_eq!(
            rule_kind(&a).unwrap(),
            AlertRuleKind::NewIssue {
                min_severity: Severity::Critical
            }
        );
    }

    #[test]
    fn pillar_drop_requires_pillar() {
        assert!(rule_kind(&args("pillar-score-drop")).is_err());
        let mut a = args("pillar_score_drop");
        a.pillar = Some("technical".into());
        a.drop_amount = Some(2.5);
        assert_eq!(
            rule_kind(&a).unwrap(),
            AlertRuleKind::PillarScoreDrop {
                pillar_id: "technical".into(),
                drop_amount: 2.5
            }
        );
    }

    #[test]
    fn unknown_rule_type_is_rejected() {
        let err = rule_kind(&args("traffic-spike")).unwrap_err();
        assert!(err.to_string().contains("traffic_spike"));
    }
}
