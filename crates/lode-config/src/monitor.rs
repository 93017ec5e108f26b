//! Monitoring configuration: alert de-duplication and cluster pillar weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_dedup_window_hours() -> u32 {
    24
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// A pending alert for the same rule inside this window is refreshed
    /// instead of duplicated.
    #[serde(default = "default_dedup_window_hours")]
    pub dedup_window_hours: u32,

    /// Weight per pillar when attributing score change to a cluster.
    /// Pillars not listed weigh 1.0.
    #[serde(default)]
    pub pillar_weights: BTreeMap<String, f64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dedup_window_hours: default_dedup_window_hours(),
            pillar_weights: BTreeMap::new(),
        }
    }
}

impl MonitorConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a negative or non-finite pillar weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (pillar, weight) in &self.pillar_weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("monitor.pillar_weights.{pillar}"),
                    reason: format!("must be a non-negative number, got {weight}"),
                });
            }
        }
        Ok(())
    }
}
