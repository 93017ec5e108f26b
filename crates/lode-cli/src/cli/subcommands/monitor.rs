use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Scan monitoring commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MonitorCommands {
    /// Append a snapshot from a JSON file.
    Ingest { file: PathBuf },
    /// Latest snapshot for a domain.
    Latest { domain: String },
    /// Snapshot history for a domain, newest first.
    History { domain: String },
    /// Diff a scan (default: the latest) against its predecessor.
    Diff {
        domain: String,
        #[arg(long)]
        scan: Option<String>,
    },
    /// Process a completed scan: diff, evaluate rules, record alerts.
    Complete { domain: String, scan: String },
    /// List alerts for a domain.
    Alerts {
        domain: String,
        /// pending, resolved, or dismissed
        #[arg(long)]
        status: Option<String>,
    },
    /// Mark an alert resolved.
    Resolve { alert_id: String },
    /// Dismiss an alert.
    Dismiss { alert_id: String },
    /// Alert rules.
    Rule {
        #[command(subcommand)]
        action: RuleCommands,
    },
}

/// Alert rule commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RuleCommands {
    /// Add an alert rule to a domain.
    Add(RuleAddArgs),
    /// List a domain's rules.
    List { domain: String },
    /// Enable a rule.
    Enable { id: String },
    /// Disable a rule.
    Disable { id: String },
}

/// Arguments for `lode monitor rule add`.
#[derive(Clone, Debug, Args)]
pub struct RuleAddArgs {
    pub domain: String,
    /// score-drop, new-issue, issue-resolved, cluster-regression, pillar-score-drop
    #[arg(long = "type")]
    pub rule_type: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub drop_amount: Option<f64>,
    #[arg(long)]
    pub drop_percent: Option<f64>,
    #[arg(long)]
    pub min_severity: Option<String>,
    #[arg(long)]
    pub cluster_count: Option<u32>,
    #[arg(long)]
    pub pillar: Option<String>,
}
