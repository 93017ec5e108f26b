use std::path::PathBuf;

use clap::Subcommand;

/// Entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EntityCommands {
    /// Show an entity by ID.
    Show { id: String },
    /// Look up an entity by slug and type.
    Slug {
        slug: String,
        #[arg(long = "type")]
        kind: String,
    },
    /// schema.org JSON-LD for an entity page.
    Schema { id: String },
    /// Subject-predicate-object table for an entity.
    Triples { id: String },
    /// Entities connected to an entity, strongest first.
    Connected {
        id: String,
        /// Page index JSON used to break ties by co-mentions.
        #[arg(long)]
        pages: Option<PathBuf>,
        #[arg(long)]
        min_strength: Option<f64>,
    },
    /// Indexable pages that mention an entity.
    Pages {
        id: String,
        /// Page index JSON.
        #[arg(long)]
        pages: PathBuf,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}
