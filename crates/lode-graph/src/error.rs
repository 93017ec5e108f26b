//! Error types for lode-graph.

use std::path::PathBuf;

use lode_core::enums::EntityKind;
use lode_schema::SchemaError;
use thiserror::Error;

/// Reasons a seed document is refused. A registry is either fully valid or
/// not loaded at all.
#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not JSON, or JSON that does not deserialize into a seed document.
    #[error("malformed seed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seed document violates the entity schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("duplicate entity id '{0}'")]
    DuplicateId(String),

    #[error("entity keyed '{key}' declares id '{id}'")]
    IdMismatch { key: String, id: String },

    #[error("duplicate slug '{slug}' for type {kind}")]
    DuplicateSlug { kind: EntityKind, slug: String },

    #[error("entity '{entity_id}' relates to unknown entity '{target_id}'")]
    DanglingRelationship {
        entity_id: String,
        target_id: String,
    },

    #[error("relationship {entity_id} -> {target_id} has strength {strength} outside [0, 1]")]
    InvalidStrength {
        entity_id: String,
        target_id: String,
        strength: f64,
    },
}

/// Errors from entity graph derivations.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    RegistryLoad(#[from] RegistryLoadError),

    /// A derivation was requested for an entity the registry does not hold.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("decay factor must be in (0, 1), got {0}")]
    InvalidDecayFactor(f64),

    #[error("failed to load page index from {path}: {reason}")]
    PageIndex { path: PathBuf, reason: String },
}
