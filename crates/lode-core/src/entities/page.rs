use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One renderable page from the site's page index.
///
/// Supplied by the site build or CMS; Lodestar never crawls pages itself.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    /// Canonical URL. `None` means the page is its own canonical.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    pub indexable: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl PageRecord {
    /// The canonical URL, falling back to the page URL.
    #[must_use]
    pub fn canonical_url(&self) -> &str {
        self.canonical.as_deref().unwrap_or(&self.url)
    }

    /// Indexable and not canonicalized to another URL.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.indexable && self.canonical_url() == self.url
    }
}

/// A page that meaningfully references an entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageReference {
    pub url: String,
    pub title: String,
    pub relevance_score: f64,
    pub indexable: bool,
    pub canonical: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, canonical: Option<&str>, indexable: bool) -> PageRecord {
        PageRecord {
            url: url.into(),
            canonical: canonical.map(String::from),
            indexable,
            title: String::new(),
            content: String::new(),
        }
    }

    #[test]
    fn self_canonical_indexable_is_eligible() {
        assert!(page("/a", None, true).is_eligible());
        assert!(page("/a", Some("/a"), true).is_eligible());
    }

    #[test]
    fn canonicalized_or_noindex_is_not_eligible() {
        assert!(!page("/a", Some("/b"), true).is_eligible());
        assert!(!page("/a", None, false).is_eligible());
    }
}
