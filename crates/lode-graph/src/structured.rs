//! schema.org JSON-LD for entity pages.

use lode_core::entities::{EntitySchemaRecord, SCHEMA_ORG_CONTEXT, SchemaThing, entity_fragment_id};
use tracing::warn;

use crate::citation::{TrustedDomains, validate_same_as_reference};
use crate::registry::EntityRegistry;

/// Structured-data record for `entity_id`, or `None` if it is not registered.
///
/// Only `sameAs` references that pass validation are emitted; the rest are
/// logged and skipped. `about` lists each relationship target once, in seed
/// order.
#[must_use]
pub fn generate_entity_schema(
    entity_id: &str,
    registry: &EntityRegistry,
    trusted: &TrustedDomains,
) -> Option<EntitySchemaRecord> {
    let entity = registry.get_entity_by_id(entity_id)?;

    let same_as = entity
        .same_as
        .iter()
        .filter(|reference| {
            let validation = validate_same_as_reference(reference, trusted);
            if !validation.valid {
                warn!(
                    entity = %entity.id,
                    url = %reference.url,
                    errors = ?validation.errors,
                    "skipping invalid sameAs reference"
                );
            }
            validation.valid
        })
        .map(|reference| reference.url.clone())
        .collect();

    let mut about: Vec<SchemaThing> = Vec::new();
    for rel in &entity.relationships {
        let Some(target) = registry.get_entity_by_id(&rel.target_entity_id) else {
            continue;
        };
        let id = entity_fragment_id(&target.id);
        if about.iter().any(|thing| thing.id == id) {
            continue;
        }
        about.push(SchemaThing {
            schema_type: target.kind.schema_org_type().to_string(),
            id,
            name: target.name.clone(),
        });
    }

    Some(EntitySchemaRecord {
        context: SCHEMA_ORG_CONTEXT.to_string(),
        schema_type: entity.kind.schema_org_type().to_string(),
        id: entity_fragment_id(&entity.id),
        identifier: entity.id.clone(),
        name: entity.name.clone(),
        description: entity.description.clone(),
        same_as,
        about,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::registry::load_registry;

    fn mixed_registry() -> EntityRegistry {
        EntityRegistry::from_json(
            r#"{
                "version": "test",
                "entities": {
                    "sge": {
                        "id": "sge", "name": "Google SGE", "type": "product", "slug": "sge",
                        "relationships": [
                            { "predicate": "createdBy", "targetEntityId": "google" },
                            { "predicate": "relatedTo", "targetEntityId": "google", "strength": 0.4 }
                        ],
                        "sameAs": [
                            { "url": "https://en.wikipedia.org/wiki/Search_Generative_Experience", "source": "Wikipedia", "type": "wikipedia", "verified": true },
                            { "url": "http://en.wikipedia.org/wiki/SGE", "source": "Wikipedia", "type": "wikipedia" },
                            { "url": "https://example.com/sge", "source": "Blog", "type": "other" }
                        ]
                    },
                    "google": { "id": "google", "name": "Google", "type": "organization", "slug": "google",
                        "sameAs": [{ "url": "https://blog.example.com/google", "source": "Blog", "type": "other" }] }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn nextjs_schema_shape() {
        let registry = load_registry().unwrap();
        let schema =
            generate_entity_schema("nextjs", &registry, &TrustedDomains::default()).unwrap();
        assert_eq!(schema.context, "https://schema.org");
        assert_eq!(schema.schema_type, "SoftwareApplication");
        assert_eq!(schema.id, "#entity-nextjs");
        assert!(!schema.same_as.is_empty());
        assert!(!schema.about.is_empty());
    }

    #[test]
    fn invalid_same_as_entries_are_never_emitted() {
        let registry = mixed_registry();
        let schema = generate_entity_schema("sge", &registry, &TrustedDomains::default()).unwrap();
        assert_eq!(
            schema.same_as,
            vec!["https://en.wikipedia.org/wiki/Search_Generative_Experience".to_string()]
        );
        assert_eq!(
            schema.about,
            vec![SchemaThing {
                schema_type: "Organization".into(),
                id: "#entity-google".into(),
                name: "Google".into(),
            }]
        );
    }

    #[test]
    fn all_invalid_references_omit_same_as() {
        let registry = mixed_registry();
        let schema =
            generate_entity_schema("google", &registry, &TrustedDomains::default()).unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json.get("sameAs").is_none());
        assert!(json.get("about").is_none());
        assert_eq!(json["@type"], "Organization");
    }

    #[test]
    fn unknown_entity_yields_none() {
        assert!(
            generate_entity_schema("nope", &mixed_registry(), &TrustedDomains::default())
                .is_none()
        );
    }
}
