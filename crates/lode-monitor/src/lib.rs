//! # lode-monitor
//!
//! Change detection for monitored domains.
//!
//! - [`diff`]: structural diff between two snapshots of the same domain.
//! - [`alerts`]: alert-rule evaluation over a diff.
//! - [`pipeline`]: the scan-completion flow (load snapshots, diff, record
//!   de-duplicated alerts) over any store implementing the `lode-core` store
//!   traits.
//!
//! The diff and rule evaluation are pure functions. The pipeline only
//! suspends on store calls.

pub mod alerts;
pub mod diff;
pub mod error;
pub mod pipeline;

pub use alerts::{AlertContext, alert_message, alert_severity, evaluate_alert_rules, evaluate_rule};
pub use diff::{DiffOptions, diff_scans, diff_scans_with};
pub use error::MonitorError;
pub use pipeline::{CompletionReport, ensure_scan_domain, process_scan_completion};
