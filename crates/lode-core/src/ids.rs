//! ID prefix constants.
//!
//! Generated IDs have the shape `{prefix}-{8 hex chars}`, e.g. `scn-a3f8b2c1`.
//! Entity IDs are not generated; they come from the seed data as stable slugs.

pub const PREFIX_DOMAIN: &str = "dom";
pub const PREFIX_SCAN: &str = "scn";
pub const PREFIX_RULE: &str = "rul";
pub const PREFIX_ALERT: &str = "alr";

/// Every generated-ID prefix, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_DOMAIN, PREFIX_SCAN, PREFIX_RULE, PREFIX_ALERT];
