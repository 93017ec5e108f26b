use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_ORG_CONTEXT: &str = "https://schema.org";

/// schema.org JSON-LD record describing one entity, ready to embed in a page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntitySchemaRecord {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub schema_type: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub identifier: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Validated citation URLs only. Omitted when none survive validation.
    #[serde(rename = "sameAs", default, skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub about: Vec<SchemaThing>,
}

/// Reference to a related entity inside `about`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SchemaThing {
    #[serde(rename = "@type")]
    pub schema_type: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
}

/// Fragment identifier used as `@id` for an entity.
#[must_use]
pub fn entity_fragment_id(entity_id: &str) -> String {
    format!("#entity-{entity_id}")
}
