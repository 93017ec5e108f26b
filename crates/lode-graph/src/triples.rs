//! Relationship tables: subject–predicate–object triples for one entity.

use std::collections::HashSet;

use lode_core::entities::Triple;

use crate::error::GraphError;
use crate::registry::EntityRegistry;

/// Every triple derivable for `entity_id`: its outgoing relationships in seed
/// order, then relationships other entities hold towards it.
///
/// Subjects and objects are entity display names. Duplicate relationships
/// (same subject id, predicate, and object id) are dropped, keeping the first
/// occurrence. Nothing is padded or truncated, so the table
/// holds at least ten triples whenever ten are derivable.
///
/// # Errors
///
/// Returns [`GraphError::EntityNotFound`] if `entity_id` is not in the registry.
pub fn generate_relationship_table(
    entity_id: &str,
    registry: &EntityRegistry,
) -> Result<Vec<Triple>, GraphError> {
    let entity = registry
        .get_entity_by_id(entity_id)
        .ok_or_else(|| GraphError::EntityNotFound(entity_id.to_string()))?;

    let outgoing = entity.relationships.iter().filter_map(|rel| {
        registry
            .get_entity_by_id(&rel.target_entity_id)
            .map(|target| (entity, rel.predicate, target))
    });
    let incoming = registry
        .incoming(entity_id)
        .filter(|(source, _)| source.id != entity.id)
        .map(|(source, rel)| (source, rel.predicate, entity));

    // Keyed on ids: distinct entities may share a display name.
    let mut seen = HashSet::new();
    Ok(outgoing
        .chain(incoming)
        .filter(|&(subject, predicate, object)| {
            seen.insert((subject.id.as_str(), predicate, object.id.as_str()))
        })
        .map(|(subject, predicate, object)| Triple::new(&subject.name, predicate, &object.name))
        .collect())
}
