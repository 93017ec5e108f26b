//! Entity graph configuration: decay, view limits, and trusted citation domains.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_decay_factor() -> f64 {
    0.5
}

const fn default_view_limit() -> usize {
    20
}

const fn default_min_triples() -> usize {
    10
}

/// Encyclopedic and standards sites accepted as `sameAs` sources.
pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "wikidata.org",
    "britannica.com",
    "dbpedia.org",
    "schema.org",
    "w3.org",
    "ietf.org",
    "iso.org",
];

fn default_trusted_domains() -> Vec<String> {
    DEFAULT_TRUSTED_DOMAINS
        .iter()
        .map(|d| (*d).to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Strength multiplier applied per indirect hop. Must be in `(0, 1)`.
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,

    /// Default size of the connected-entities view.
    #[serde(default = "default_view_limit")]
    pub connected_limit: usize,

    /// Default page size of the used-in-pages view.
    #[serde(default = "default_view_limit")]
    pub used_in_limit: usize,

    /// Relationship tables aim for at least this many triples.
    #[serde(default = "default_min_triples")]
    pub min_triples: usize,

    /// Domains (and their subdomains) accepted for `sameAs` references.
    #[serde(default = "default_trusted_domains")]
    pub trusted_domains: Vec<String>,

    /// Seed file to load instead of the bundled registry. Empty = bundled.
    #[serde(default)]
    pub seed_path: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            decay_factor: default_decay_factor(),
            connected_limit: default_view_limit(),
            used_in_limit: default_view_limit(),
            min_triples: default_min_triples(),
            trusted_domains: default_trusted_domains(),
            seed_path: String::new(),
        }
    }
}

impl GraphConfig {
    /// Whether a seed file overrides the bundled registry.
    #[must_use]
    pub fn has_seed_override(&self) -> bool {
        !self.seed_path.is_empty()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a decay factor outside `(0, 1)`
    /// or an empty trusted-domain list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "graph.decay_factor".into(),
                reason: format!("must be in (0, 1), got {}", self.decay_factor),
            });
        }
        if self.trusted_domains.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "graph.trusted_domains".into(),
                reason: "at least one trusted domain is required".into(),
            });
        }
        Ok(())
    }
}
