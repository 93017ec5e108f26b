//! The entity registry: a validated, read-only view over a seed document.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use lode_config::GraphConfig;
use lode_core::entities::{Entity, EntitySeed, Relationship};
use lode_core::enums::EntityKind;
use lode_schema::SchemaRegistry;
use serde::Serialize;
use tracing::debug;

use crate::citation::{SameAsValidation, TrustedDomains, validate_same_as_reference};
use crate::error::RegistryLoadError;

const BUNDLED_SEED: &str = include_str!("../seed/entities.json");

/// Entities keyed by id, with a per-type slug index.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    version: String,
    entities: BTreeMap<String, Entity>,
    slugs: HashMap<(EntityKind, String), String>,
}

/// Validation result for one `sameAs` reference of one entity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationAudit {
    pub entity_id: String,
    pub url: String,
    pub source: String,
    pub validation: SameAsValidation,
}

/// Load the seed bundled with this crate.
///
/// # Errors
///
/// Returns [`RegistryLoadError`] if the bundled seed fails validation.
pub fn load_registry() -> Result<EntityRegistry, RegistryLoadError> {
    EntityRegistry::from_json(BUNDLED_SEED)
}

/// Load `graph.seed_path` when configured, otherwise the bundled seed.
///
/// # Errors
///
/// Returns [`RegistryLoadError`] if the seed cannot be read or fails validation.
pub fn load_configured_registry(config: &GraphConfig) -> Result<EntityRegistry, RegistryLoadError> {
    if config.has_seed_override() {
        EntityRegistry::load_path(Path::new(&config.seed_path))
    } else {
        load_registry()
    }
}

impl EntityRegistry {
    /// Parse and validate a seed document.
    ///
    /// The document is checked against the `entity_seed` JSON Schema first,
    /// then deserialized with duplicate map keys preserved so they can be
    /// reported.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryLoadError`] for malformed JSON, schema violations,
    /// duplicate ids or slugs, key/id mismatches, dangling relationship
    /// targets, and strengths outside `[0, 1]`.
    pub fn from_json(raw: &str) -> Result<Self, RegistryLoadError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        SchemaRegistry::new().validate("entity_seed", &value)?;
        let seed: EntitySeed = serde_json::from_str(raw)?;
        Self::from_seed(seed)
    }

    /// # Errors
    ///
    /// Returns [`RegistryLoadError::Io`] if the file cannot be read, or any
    /// error from [`Self::from_json`].
    pub fn load_path(path: &Path) -> Result<Self, RegistryLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json(&raw)?;
        debug!(path = %path.display(), entities = registry.len(), "loaded entity seed");
        Ok(registry)
    }

    /// Build a registry from an already-deserialized seed.
    ///
    /// # Errors
    ///
    /// See [`Self::from_json`]; schema validation is not repeated here.
    pub fn from_seed(seed: EntitySeed) -> Result<Self, RegistryLoadError> {
        let mut entities = BTreeMap::new();
        let mut slugs = HashMap::new();

        for (key, entity) in seed.entities {
            if key != entity.id {
                return Err(RegistryLoadError::IdMismatch { key, id: entity.id });
            }
            if entities.contains_key(&entity.id) {
                return Err(RegistryLoadError::DuplicateId(entity.id));
            }
            let slug_key = (entity.kind, entity.slug.clone());
            if slugs.contains_key(&slug_key) {
                return Err(RegistryLoadError::DuplicateSlug {
                    kind: entity.kind,
                    slug: entity.slug,
                });
            }
            slugs.insert(slug_key, entity.id.clone());
            entities.insert(entity.id.clone(), entity);
        }

        for entity in entities.values() {
            for rel in &entity.relationships {
                if !entities.contains_key(&rel.target_entity_id) {
                    return Err(RegistryLoadError::DanglingRelationship {
                        entity_id: entity.id.clone(),
                        target_id: rel.target_entity_id.clone(),
                    });
                }
                if let Some(strength) = rel.strength {
                    if !(0.0..=1.0).contains(&strength) {
                        return Err(RegistryLoadError::InvalidStrength {
                            entity_id: entity.id.clone(),
                            target_id: rel.target_entity_id.clone(),
                            strength,
                        });
                    }
                }
            }
        }

        debug!(version = %seed.version, entities = entities.len(), "entity registry ready");
        Ok(Self {
            version: seed.version,
            entities,
            slugs,
        })
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    #[must_use]
    pub fn get_entity_by_id(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Slugs are only unique within a type, so the type is part of the key.
    #[must_use]
    pub fn get_entity_by_slug(&self, slug: &str, kind: EntityKind) -> Option<&Entity> {
        self.slugs
            .get(&(kind, slug.to_string()))
            .and_then(|id| self.entities.get(id))
    }

    /// Relationships held by other entities that point at `id`, in id order
    /// of the source entity.
    pub fn incoming<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = (&'a Entity, &'a Relationship)> + 'a {
        self.entities.values().flat_map(move |source| {
            source
                .relationships
                .iter()
                .filter(move |rel| rel.target_entity_id == id)
                .map(move |rel| (source, rel))
        })
    }

    /// Validate every `sameAs` reference in the registry.
    #[must_use]
    pub fn audit_citations(&self, trusted: &TrustedDomains) -> Vec<CitationAudit> {
        self.entities
            .values()
            .flat_map(|entity| {
                entity.same_as.iter().map(|reference| CitationAudit {
                    entity_id: entity.id.clone(),
                    url: reference.url.clone(),
                    source: reference.source.clone(),
                    validation: validate_same_as_reference(reference, trusted),
                })
            })
            .collect()
    }

    /// Ids of entities with no relationships in either direction.
    #[must_use]
    pub fn isolated_entities(&self) -> Vec<&str> {
        let targeted: HashSet<&str> = self
            .entities
            .values()
            .flat_map(|e| e.relationships.iter().map(|r| r.target_entity_id.as_str()))
            .collect();
        self.entities
            .values()
            .filter(|e| e.relationships.is_empty() && !targeted.contains(e.id.as_str()))
            .map(|e| e.id.as_str())
            .collect()
    }
}
