//! `sameAs` citation validation.
//!
//! A reference is valid when its URL uses HTTPS and its host is a trusted
//! domain or a subdomain of one. Both checks run independently so a caller
//! sees every reason a reference fails. Validation never mutates the
//! reference.

use lode_config::{DEFAULT_TRUSTED_DOMAINS, GraphConfig};
use lode_core::entities::SameAsReference;
use lode_core::enums::CitationErrorCode;
use serde::Serialize;
use url::Url;

/// Whitelist of citation domains. Matching is case-insensitive and covers
/// subdomains (`en.wikipedia.org` matches `wikipedia.org`).
#[derive(Debug, Clone)]
pub struct TrustedDomains {
    domains: Vec<String>,
}

impl TrustedDomains {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_end_matches('.').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GraphConfig) -> Self {
        Self::new(&config.trusted_domains)
    }

    /// Whether `host` is a trusted domain or one of its subdomains.
    #[must_use]
    pub fn contains_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }
}

impl Default for TrustedDomains {
    fn default() -> Self {
        Self::new(DEFAULT_TRUSTED_DOMAINS)
    }
}

/// Outcome of validating one `sameAs` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SameAsValidation {
    pub valid: bool,
    pub errors: Vec<CitationErrorCode>,
}

impl SameAsValidation {
    fn from_errors(errors: Vec<CitationErrorCode>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    #[must_use]
    pub fn has(&self, code: CitationErrorCode) -> bool {
        self.errors.contains(&code)
    }
}

/// Check a reference's scheme and host against the whitelist.
///
/// An unparseable URL reports `INVALID_URL`, plus `NON_HTTPS_URL` unless the
/// raw text starts with `https://`, plus `DOMAIN_NOT_WHITELISTED` since no
/// host can be established.
#[must_use]
pub fn validate_same_as_reference(
    reference: &SameAsReference,
    trusted: &TrustedDomains,
) -> SameAsValidation {
    let mut errors = Vec::new();

    match Url::parse(reference.url.trim()) {
        Ok(url) => {
            if url.scheme() != "https" {
                errors.push(CitationErrorCode::NonHttpsUrl);
            }
            if !url.host_str().is_some_and(|host| trusted.contains_host(host)) {
                errors.push(CitationErrorCode::DomainNotWhitelisted);
            }
        }
        Err(_) => {
            errors.push(CitationErrorCode::InvalidUrl);
            let raw = reference.url.trim().to_ascii_lowercase();
            if !raw.starts_with("https://") {
                errors.push(CitationErrorCode::NonHttpsUrl);
            }
            errors.push(CitationErrorCode::DomainNotWhitelisted);
        }
    }

    SameAsValidation::from_errors(errors)
}
