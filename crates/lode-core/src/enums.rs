//! Closed vocabularies for Lodestar: entity kinds, predicates, citation types,
//! severities, and the statuses produced by the diff engine and alerting.
//!
//! Enums use `snake_case` serialization, except [`Predicate`] whose wire names
//! are the camelCase relationship labels used in seed data and structured output.
//! [`AlertStatus`] provides `allowed_next_states()` to enforce valid transitions
//! at the application layer.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The kind of thing an entity describes. Slugs are unique per kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Technology,
    Organization,
    Concept,
    Place,
    Person,
    Product,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Technology,
        Self::Organization,
        Self::Concept,
        Self::Place,
        Self::Person,
        Self::Product,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Organization => "organization",
            Self::Concept => "concept",
            Self::Place => "place",
            Self::Person => "person",
            Self::Product => "product",
        }
    }

    /// The schema.org `Thing` subtype emitted for this kind.
    #[must_use]
    pub const fn schema_org_type(self) -> &'static str {
        match self {
            Self::Technology => "SoftwareApplication",
            Self::Organization => "Organization",
            Self::Concept => "DefinedTerm",
            Self::Place => "Place",
            Self::Person => "Person",
            Self::Product => "Product",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown entity type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Relationship label between two entities.
///
/// The vocabulary is closed: any other label fails to deserialize and
/// [`Predicate::from_str`] rejects it with [`CoreError::InvalidPredicate`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    Uses,
    CompetesWith,
    PartOf,
    CreatedBy,
    RelatedTo,
}

impl Predicate {
    pub const ALL: [Self; 5] = [
        Self::Uses,
        Self::CompetesWith,
        Self::PartOf,
        Self::CreatedBy,
        Self::RelatedTo,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uses => "uses",
            Self::CompetesWith => "competesWith",
            Self::PartOf => "partOf",
            Self::CreatedBy => "createdBy",
            Self::RelatedTo => "relatedTo",
        }
    }

    /// Whether `label` belongs to the allowed vocabulary.
    #[must_use]
    pub fn is_allowed(label: &str) -> bool {
        Self::ALL.iter().any(|p| p.as_str() == label)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Predicate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::InvalidPredicate(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ReferenceType
// ---------------------------------------------------------------------------

/// What kind of source a `sameAs` reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Wikipedia,
    Wikidata,
    Encyclopedia,
    Standard,
    Official,
    Other,
}

// ---------------------------------------------------------------------------
// CitationErrorCode
// ---------------------------------------------------------------------------

/// Reason a `sameAs` reference failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CitationErrorCode {
    NonHttpsUrl,
    DomainNotWhitelisted,
    InvalidUrl,
}

impl CitationErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonHttpsUrl => "NON_HTTPS_URL",
            Self::DomainNotWhitelisted => "DOMAIN_NOT_WHITELISTED",
            Self::InvalidUrl => "INVALID_URL",
        }
    }
}

impl fmt::Display for CitationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity shared by scan issues and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Numeric rank: critical 4, high 3, medium 2, low 1.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Whether `self` is at least as severe as `floor`.
    #[must_use]
    pub const fn at_least(self, floor: Self) -> bool {
        self.rank() >= floor.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PillarPresence
// ---------------------------------------------------------------------------

/// Which snapshots a pillar appeared in.
///
/// A one-sided pillar is diffed against an implicit baseline of 0; the marker
/// keeps that distinguishable from a pillar that really scored 0 in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PillarPresence {
    Both,
    CurrentOnly,
    PreviousOnly,
}

// ---------------------------------------------------------------------------
// IssueChange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueChange {
    New,
    Resolved,
}

// ---------------------------------------------------------------------------
// ClusterStatus
// ---------------------------------------------------------------------------

/// How a page cluster changed between two scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStatus {
    New,
    Removed,
    Improved,
    Regressed,
    Unchanged,
}

impl ClusterStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Removed => "removed",
            Self::Improved => "improved",
            Self::Regressed => "regressed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AlertStatus
// ---------------------------------------------------------------------------

/// Lifecycle of an alert.
///
/// ```text
/// pending → resolved
///         → dismissed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl AlertStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Resolved, Self::Dismissed],
            Self::Resolved | Self::Dismissed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
