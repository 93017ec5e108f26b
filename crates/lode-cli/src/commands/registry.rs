use anyhow::Context;
use lode_graph::{CitationAudit, EntityGraph, EntityRegistry, GraphSummary, generate_relationship_table};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RegistryCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistryCheckResponse<'a> {
    version: &'a str,
    graph: GraphSummary,
    citations_checked: usize,
    invalid_citations: Vec<CitationAudit>,
    isolated_entities: Vec<&'a str>,
    /// Entities whose relationship table is shorter than `graph.min_triples`.
    thin_entities: Vec<ThinEntity<'a>>,
}

#[derive(Debug, Serialize)]
struct ThinEntity<'a> {
    id: &'a str,
    triples: usize,
}

/// Handle `lode registry`.
pub fn handle(action: &RegistryCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        RegistryCommands::Check { seed } => {
            let loaded;
            let registry = match seed {
                Some(path) => {
                    loaded = EntityRegistry::load_path(path)
                        .with_context(|| format!("seed {} failed to load", path.display()))?;
                    &loaded
                }
                None => &ctx.registry,
            };
            let response = check(registry, ctx)?;
            output(&response, flags.format)
        }
    }
}

fn check<'a>(registry: &'a EntityRegistry, ctx: &AppContext) -> anyhow::Result<RegistryCheckResponse<'a>> {
    let audits = registry.audit_citations(&ctx.trusted);
    let citations_checked = audits.len();

    let mut thin_entities = Vec::new();
    for entity in registry.iter() {
        let triples = generate_relationship_table(&entity.id, registry)?.len();
        if triples < ctx.config.graph.min_triples {
            thin_entities.push(ThinEntity {
                id: &entity.id,
                triples,
            });
        }
    }

    Ok(RegistryCheckResponse {
        version: registry.version(),
        graph: EntityGraph::build(registry).summary(),
        citations_checked,
        invalid_citations: audits.into_iter().filter(|a| !a.validation.valid).collect(),
        isolated_entities: registry.isolated_entities(),
        thin_entities,
    })
}
