use std::path::Path;

use anyhow::{Context, anyhow};
use lode_core::entities::Entity;
use lode_core::enums::EntityKind;
use lode_graph::{
    ConnectedOptions, EntityRegistry, PageIndex, UsedInOptions, generate_entity_schema,
    generate_relationship_table, get_connected_entities, get_used_in_pages,
};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EntityCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lode entity`.
pub fn handle(action: &EntityCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let graph = &ctx.config.graph;
    match action {
        EntityCommands::Show { id } => output(require(&ctx.registry, id)?, flags.format),
        EntityCommands::Slug { slug, kind } => {
            let kind: EntityKind = kind.parse()?;
            let entity = ctx
                .registry
                .get_entity_by_slug(slug, kind)
                .ok_or_else(|| anyhow!("no {kind} with slug '{slug}'"))?;
            output(entity, flags.format)
        }
        EntityCommands::Schema { id } => {
            let schema = generate_entity_schema(id, &ctx.registry, &ctx.trusted)
                .ok_or_else(|| anyhow!("entity '{id}' not found"))?;
            output(&schema, flags.format)
        }
        EntityCommands::Triples { id } => {
            output(&generate_relationship_table(id, &ctx.registry)?, flags.format)
        }
        EntityCommands::Connected {
            id,
            pages,
            min_strength,
        } => {
            let index = match pages {
                Some(path) => load_pages(path)?,
                None => PageIndex::default(),
            };
            let mut options = ConnectedOptions::from_config(graph);
            options.limit = limit_for(flags, graph.connected_limit);
            if let Some(min) = min_strength {
                options.min_strength = *min;
            }
            let connected = get_connected_entities(id, &ctx.registry, &index, &options)?;
            output(&connected, flags.format)
        }
        EntityCommands::Pages { id, pages, offset } => {
            let entity = require(&ctx.registry, id)?;
            let index = load_pages(pages)?;
            let options = UsedInOptions {
                limit: limit_for(flags, graph.used_in_limit),
                offset: *offset as usize,
            };
            output(
                &get_used_in_pages(&entity.id, &entity.name, &index, &options),
                flags.format,
            )
        }
    }
}

fn require<'a>(registry: &'a EntityRegistry, id: &str) -> anyhow::Result<&'a Entity> {
    registry
        .get_entity_by_id(id)
        .ok_or_else(|| anyhow!("entity '{id}' not found"))
}

fn load_pages(path: &Path) -> anyhow::Result<PageIndex> {
    PageIndex::load_path(path).with_context(|| format!("failed to load page index {}", path.display()))
}

fn limit_for(flags: &GlobalFlags, configured: usize) -> usize {
    let fallback = u32::try_from(configured).unwrap_or(u32::MAX);
    effective_limit(flags, fallback) as usize
}
