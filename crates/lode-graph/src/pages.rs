//! The page index and the "used in pages" view.
//!
//! Relevance of a page for an entity is
//! `3 * title_mentions + body_mentions + position_bonus`, where mentions are
//! whole-word, case-insensitive matches of the entity's name or id, and the
//! bonus in `[0, 1)` rewards an early first mention in the body. More
//! mentions never lower the score.

use std::collections::HashMap;
use std::path::Path;

use lode_core::entities::{Entity, PageRecord, PageReference};
use tracing::debug;

use crate::error::GraphError;

const TITLE_WEIGHT: f64 = 3.0;

/// Pages supplied by the site build. Lodestar never crawls.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    pages: Vec<PageRecord>,
}

impl PageIndex {
    #[must_use]
    pub const fn new(pages: Vec<PageRecord>) -> Self {
        Self { pages }
    }

    /// Parse a JSON array of page records.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self::new)
    }

    /// # Errors
    ///
    /// Returns [`GraphError::PageIndex`] if the file is unreadable or malformed.
    pub fn load_path(path: &Path) -> Result<Self, GraphError> {
        let to_error = |reason: String| GraphError::PageIndex {
            path: path.to_path_buf(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| to_error(e.to_string()))?;
        let index = Self::from_json(&raw).map_err(|e| to_error(e.to_string()))?;
        debug!(path = %path.display(), pages = index.len(), "loaded page index");
        Ok(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Indexable, self-canonical pages.
    pub fn eligible(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter().filter(|page| page.is_eligible())
    }

    /// Number of eligible pages that mention both entities.
    #[must_use]
    pub fn co_mentions(&self, a: &Entity, b: &Entity) -> usize {
        let terms_a = mention_terms(&a.id, &a.name);
        let terms_b = mention_terms(&b.id, &b.name);
        self.eligible()
            .filter(|page| {
                let title = page.title.to_lowercase();
                let content = page.content.to_lowercase();
                mentions_any(&title, &content, &terms_a) && mentions_any(&title, &content, &terms_b)
            })
            .count()
    }
}

/// Pagination for [`get_used_in_pages`].
#[derive(Debug, Clone, Copy)]
pub struct UsedInOptions {
    pub limit: usize,
    pub offset: usize,
}

impl Default for UsedInOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

/// Eligible pages that mention the entity, most relevant first.
///
/// Ties on score are broken by URL so the order is total and pagination is
/// stable: consecutive `offset` windows never overlap.
#[must_use]
pub fn get_used_in_pages(
    entity_id: &str,
    entity_name: &str,
    index: &PageIndex,
    options: &UsedInOptions,
) -> Vec<PageReference> {
    let terms = mention_terms(entity_id, entity_name);

    let mut best: HashMap<&str, PageReference> = HashMap::new();
    for page in index.eligible() {
        let Some(score) = relevance(page, &terms) else {
            continue;
        };
        let keep = best
            .get(page.url.as_str())
            .is_none_or(|existing| score > existing.relevance_score);
        if keep {
            best.insert(
                page.url.as_str(),
                PageReference {
                    url: page.url.clone(),
                    title: page.title.clone(),
                    relevance_score: score,
                    indexable: page.indexable,
                    canonical: page.canonical_url().to_string(),
                },
            );
        }
    }

    let mut ranked: Vec<PageReference> = best.into_values().collect();
    ranked.sort_by(|a, b| {
        b.relevance_score
            .total_cmp(&a.relevance_score)
            .then_with(|| a.url.cmp(&b.url))
    });
    ranked
        .into_iter()
        .skip(options.offset)
        .take(options.limit)
        .collect()
}

/// Lowercased search terms for an entity: its name and its id, deduplicated.
fn mention_terms(entity_id: &str, entity_name: &str) -> Vec<String> {
    let mut terms = Vec::with_capacity(2);
    for term in [entity_name, entity_id] {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// `None` when the page does not mention the entity at all.
#[allow(clippy::cast_precision_loss)]
fn relevance(page: &PageRecord, terms: &[String]) -> Option<f64> {
    let title = page.title.to_lowercase();
    let content = page.content.to_lowercase();

    let mut title_mentions = 0;
    let mut body_mentions = 0;
    let mut first_body_mention: Option<usize> = None;
    for term in terms {
        let (count, _) = count_mentions(&title, term);
        title_mentions += count;
        let (count, first) = count_mentions(&content, term);
        body_mentions += count;
        first_body_mention = match (first_body_mention, first) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }

    if title_mentions + body_mentions == 0 {
        return None;
    }

    let bonus = first_body_mention.map_or(0.0, |pos| {
        let len = content.len() as f64;
        (len - pos as f64) / (len + 1.0)
    });
    Some(TITLE_WEIGHT * title_mentions as f64 + body_mentions as f64 + bonus)
}

fn mentions_any(title: &str, content: &str, terms: &[String]) -> bool {
    terms
        .iter()
        .any(|term| count_mentions(title, term).0 > 0 || count_mentions(content, term).0 > 0)
}

/// Whole-word occurrences of `term` in `haystack` and the byte offset of the
/// first one. Both inputs must already be lowercased.
fn count_mentions(haystack: &str, term: &str) -> (usize, Option<usize>) {
    let mut count = 0;
    let mut first = None;
    for (start, matched) in haystack.match_indices(term) {
        let end = start + matched.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        if before_ok && after_ok {
            count += 1;
            first.get_or_insert(start);
        }
    }
    (count, first)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn page(url: &str, title: &str, content: &str) -> PageRecord {
        PageRecord {
            url: url.into(),
            canonical: None,
            indexable: true,
            title: title.into(),
            content: content.into(),
        }
    }

    #[rstest]
    #[case("next.js is a framework", "next.js", 1)]
    #[case("nextjs and next.js and next.jsx", "next.js", 2)]
    #[case("reactive react-native react", "react", 2)]
    #[case("preact", "react", 0)]
    #[case("", "react", 0)]
    fn whole_word_counting(#[case] haystack: &str, #[case] term: &str, #[case] expected: usize) {
        assert_eq!(count_mentions(haystack, term).0, expected);
    }

    #[test]
    fn title_mentions_outweigh_body_mentions() {
        let titled = page("/a", "Next.js guide", "A framework.");
        let body_only = page("/b", "Guide", "Next.js is a framework. Next.js renders.");
        let terms = mention_terms("nextjs", "Next.js");
        let titled_score = relevance(&titled, &terms).unwrap();
        let body_score = relevance(&body_only, &terms).unwrap();
        assert!(titled_score > body_score, "{titled_score} <= {body_score}");
    }

    #[test]
    fn position_bonus_stays_below_one() {
        let terms = mention_terms("react", "React");
        let score = relevance(&page("/a", "", "react"), &terms).unwrap();
        assert!(score >= 1.0 && score < 2.0);
    }

    #[test]
    fn ineligible_and_unrelated_pages_are_excluded() {
        let mut noindex = page("/noindex", "React", "React");
        noindex.indexable = false;
        let mut canonicalized = page("/dupe", "React", "React");
        canonicalized.canonical = Some("/original".into());
        let index = PageIndex::new(vec![
            noindex,
            canonicalized,
            page("/unrelated", "Vue", "Vue.js only"),
            page("/react", "React hooks", "React hooks explained"),
        ]);

        let refs = get_used_in_pages("react", "React", &index, &UsedInOptions::default());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url, "/react");
        assert_eq!(refs[0].canonical, "/react");
        assert!(refs[0].indexable);
    }

    #[test]
    fn duplicate_urls_collapse_to_best_score() {
        let index = PageIndex::new(vec![
            page("/a", "", "react"),
            page("/a", "React", "react react"),
        ]);
        let refs = get_used_in_pages("react", "React", &index, &UsedInOptions::default());
        assert_eq!(refs.len(), 1);
        assert!(refs[0].relevance_score > 3.0);
    }

    #[test]
    fn pagination_windows_are_disjoint_and_sorted() {
        let pages = (0..45)
            .map(|i| {
                let body = "Next.js ".repeat(i % 7 + 1);
                page(&format!("/p/{i:02}"), "Notes", &body)
            })
            .collect();
        let index = PageIndex::new(pages);

        let first = get_used_in_pages(
            "nextjs",
            "Next.js",
            &index,
            &UsedInOptions {
                limit: 20,
                offset: 0,
            },
        );
        let second = get_used_in_pages(
            "nextjs",
            "Next.js",
            &index,
            &UsedInOptions {
                limit: 20,
                offset: 20,
            },
        );
        assert_eq!(first.len(), 20);
        assert_eq!(second.len(), 20);

        let first_urls: HashSet<_> = first.iter().map(|p| p.url.as_str()).collect();
        assert!(second.iter().all(|p| !first_urls.contains(p.url.as_str())));

        let all: Vec<f64> = first
            .iter()
            .chain(&second)
            .map(|p| p.relevance_score)
            .collect();
        assert!(all.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn co_mentions_count_pages_naming_both() {
        let make = |id: &str, name: &str| Entity {
            id: id.into(),
            name: name.into(),
            kind: lode_core::enums::EntityKind::Technology,
            slug: id.into(),
            description: None,
            relationships: vec![],
            same_as: vec![],
        };
        let index = PageIndex::new(vec![
            page("/1", "React vs Vue", ""),
            page("/2", "", "Vue and React compared"),
            page("/3", "React only", ""),
        ]);
        assert_eq!(
            index.co_mentions(&make("react", "React"), &make("vuejs", "Vue.js")),
            0
        );
        assert_eq!(index.co_mentions(&make("react", "React"), &make("vue", "Vue")), 2);
    }

    #[test]
    fn page_index_parses_json_array() {
        let index = PageIndex::from_json(
            r#"[{ "url": "/a", "indexable": true, "title": "A" },
                { "url": "/b", "indexable": false, "canonical": "/a" }]"#,
        )
        .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.eligible().count(), 1);
    }
}
