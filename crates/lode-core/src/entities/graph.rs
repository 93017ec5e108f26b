use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Predicate;
use crate::errors::CoreError;

/// A subject–predicate–object statement shown in an entity's relationship table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: Predicate,
    pub object: String,
}

impl Triple {
    #[must_use]
    pub fn new(subject: impl Into<String>, predicate: Predicate, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Build a triple from an untyped predicate label.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPredicate`] if `predicate` is not in the
    /// vocabulary. The triple is rejected, never silently dropped.
    pub fn parse(
        subject: impl Into<String>,
        predicate: &str,
        object: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(subject, Predicate::from_str(predicate)?, object))
    }
}

/// An entity reachable from another entity, ranked by `strength` in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedEntity {
    pub entity_id: String,
    pub relationship_type: Predicate,
    pub strength: f64,
    /// Intermediate entity for indirect connections; `None` for direct ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

impl ConnectedEntity {
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.via.is_none()
    }
}
