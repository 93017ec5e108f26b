use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, Predicate, ReferenceType};

/// A concept, technology, organization, place, person, or product the site
/// writes about. Read-only after the registry is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// URL-safe identifier, unique within `kind`.
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub same_as: Vec<SameAsReference>,
}

/// Outgoing typed edge from one entity to another.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub predicate: Predicate,
    pub target_entity_id: String,
    /// Edge weight in `[0, 1]`; absent means 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

impl Relationship {
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.strength.unwrap_or(1.0)
    }
}

/// External citation asserting an entity's identity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SameAsReference {
    pub url: String,
    pub source: String,
    #[serde(rename = "type")]
    pub kind: ReferenceType,
    #[serde(default)]
    pub verified: bool,
}

/// Versioned seed document: `{ "version": "...", "entities": { id: Entity } }`.
///
/// The `entities` map keeps every key as written, so a duplicated id in the
/// source document survives deserialization and can be reported.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EntitySeed {
    pub version: String,
    #[serde(with = "keyed_entities")]
    #[schemars(with = "std::collections::BTreeMap<String, Entity>")]
    pub entities: Vec<(String, Entity)>,
}

mod keyed_entities {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::Entity;

    pub fn serialize<S: Serializer>(
        entries: &[(String, Entity)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, entity) in entries {
            map.serialize_entry(key, entity)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, Entity)>, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(String, Entity)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of entity id to entity")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, entity)) = access.next_entry::<String, Entity>()? {
                    entries.push((key, entity));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
