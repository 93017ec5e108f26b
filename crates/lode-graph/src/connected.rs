//! Connected entities over the registry's relationship graph.
//!
//! Edges are directed as written in the seed but connectivity ignores
//! direction: an entity is connected to whatever it points at and whatever
//! points at it.

use std::collections::{BTreeMap, HashMap};

use lode_config::GraphConfig;
use lode_core::entities::ConnectedEntity;
use lode_core::enums::Predicate;
use rustworkx_core::connectivity::connected_components;
use rustworkx_core::petgraph::Direction;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use rustworkx_core::petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::error::GraphError;
use crate::pages::PageIndex;
use crate::registry::EntityRegistry;

/// Edge payload: the relationship label and its weight (1.0 when unset).
#[derive(Debug, Clone, Copy)]
struct RelationEdge {
    predicate: Predicate,
    strength: f64,
}

/// Size and connectivity of the entity graph.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub entities: usize,
    pub relationships: usize,
    pub components: usize,
}

/// Directed graph with one node per registry entity.
pub struct EntityGraph<'a> {
    registry: &'a EntityRegistry,
    graph: DiGraph<&'a str, RelationEdge>,
    id_to_index: HashMap<&'a str, NodeIndex>,
}

impl<'a> EntityGraph<'a> {
    #[must_use]
    pub fn build(registry: &'a EntityRegistry) -> Self {
        let mut graph = DiGraph::new();
        let mut id_to_index = HashMap::with_capacity(registry.len());

        for entity in registry.iter() {
            let idx = graph.add_node(entity.id.as_str());
            id_to_index.insert(entity.id.as_str(), idx);
        }
        for entity in registry.iter() {
            let src = id_to_index[entity.id.as_str()];
            for rel in &entity.relationships {
                // Load-time validation guarantees the target exists.
                if let Some(&dst) = id_to_index.get(rel.target_entity_id.as_str()) {
                    graph.add_edge(
                        src,
                        dst,
                        RelationEdge {
                            predicate: rel.predicate,
                            strength: rel.weight(),
                        },
                    );
                }
            }
        }

        Self {
            registry,
            graph,
            id_to_index,
        }
    }

    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            entities: self.graph.node_count(),
            relationships: self.graph.edge_count(),
            components: connected_components(&self.graph).len(),
        }
    }

    /// Every edge touching `node`, in either direction, as
    /// `(other end, edge)`. Self-loops are skipped.
    fn incident(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, RelationEdge)> + '_ {
        let outgoing = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), *e.weight()));
        let incoming = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), *e.weight()));
        outgoing.chain(incoming).filter(move |(other, _)| *other != node)
    }

    /// Direct neighbours at strength 1.0, then entities one intermediate hop
    /// away at `decay_factor * first hop strength * second hop strength`.
    ///
    /// When several edges or paths reach the same entity the strongest wins;
    /// equal strengths fall back to predicate order, then to the
    /// alphabetically first intermediate.
    #[allow(clippy::float_cmp)]
    fn candidates(&self, start: NodeIndex, decay_factor: f64) -> Vec<ConnectedEntity> {
        let mut direct: BTreeMap<&str, (NodeIndex, RelationEdge)> = BTreeMap::new();
        for (other, edge) in self.incident(start) {
            let id = self.graph[other];
            let replace = direct
                .get(id)
                .is_none_or(|(_, current)| stronger(&edge, current));
            if replace {
                direct.insert(id, (other, edge));
            }
        }

        let mut indirect: BTreeMap<&str, (Predicate, f64, &str)> = BTreeMap::new();
        for (&via, &(via_idx, first)) in &direct {
            for (other, hop) in self.incident(via_idx) {
                let id = self.graph[other];
                if other == start || direct.contains_key(id) {
                    continue;
                }
                let strength = decay_factor * first.strength * hop.strength;
                let replace = indirect.get(id).is_none_or(|&(predicate, current, _)| {
                    strength > current || (strength == current && hop.predicate < predicate)
                });
                if replace {
                    indirect.insert(id, (hop.predicate, strength, via));
                }
            }
        }

        direct
            .into_iter()
            .map(|(id, (_, edge))| ConnectedEntity {
                entity_id: id.to_string(),
                relationship_type: edge.predicate,
                strength: 1.0,
                via: None,
            })
            .chain(
                indirect
                    .into_iter()
                    .map(|(id, (predicate, strength, via))| ConnectedEntity {
                        entity_id: id.to_string(),
                        relationship_type: predicate,
                        strength,
                        via: Some(via.to_string()),
                    }),
            )
            .collect()
    }
}

#[allow(clippy::float_cmp)]
fn stronger(candidate: &RelationEdge, current: &RelationEdge) -> bool {
    candidate.strength > current.strength
        || (candidate.strength == current.strength && candidate.predicate < current.predicate)
}

/// Options for [`get_connected_entities`].
#[derive(Debug, Clone, Copy)]
pub struct ConnectedOptions {
    pub limit: usize,
    pub min_strength: f64,
    /// Multiplier for one-hop indirect connections, in `(0, 1)`.
    pub decay_factor: f64,
}

impl Default for ConnectedOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            min_strength: 0.0,
            decay_factor: 0.5,
        }
    }
}

impl ConnectedOptions {
    #[must_use]
    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            limit: config.connected_limit,
            min_strength: 0.0,
            decay_factor: config.decay_factor,
        }
    }
}

/// Entities connected to `entity_id`, strongest first.
///
/// Equal strengths are ordered by how many eligible pages mention both
/// entities (more first), then by entity id.
///
/// # Errors
///
/// Returns [`GraphError::InvalidDecayFactor`] unless `options.decay_factor`
/// lies in `(0, 1)`, and [`GraphError::EntityNotFound`] if `entity_id` is not
/// in the registry.
pub fn get_connected_entities(
    entity_id: &str,
    registry: &EntityRegistry,
    page_index: &PageIndex,
    options: &ConnectedOptions,
) -> Result<Vec<ConnectedEntity>, GraphError> {
    if !(options.decay_factor > 0.0 && options.decay_factor < 1.0) {
        return Err(GraphError::InvalidDecayFactor(options.decay_factor));
    }
    let graph = EntityGraph::build(registry);
    let (entity, start) = registry
        .get_entity_by_id(entity_id)
        .zip(graph.id_to_index.get(entity_id).copied())
        .ok_or_else(|| GraphError::EntityNotFound(entity_id.to_string()))?;

    let mut ranked: Vec<(ConnectedEntity, usize)> = graph
        .candidates(start, options.decay_factor)
        .into_iter()
        .filter(|c| c.strength >= options.min_strength)
        .map(|c| {
            let co_mentions = graph
                .registry
                .get_entity_by_id(&c.entity_id)
                .map_or(0, |other| page_index.co_mentions(entity, other));
            (c, co_mentions)
        })
        .collect();

    ranked.sort_by(|(a, a_pages), (b, b_pages)| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| b_pages.cmp(a_pages))
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });

    Ok(ranked
        .into_iter()
        .take(options.limit)
        .map(|(c, _)| c)
        .collect())
}
