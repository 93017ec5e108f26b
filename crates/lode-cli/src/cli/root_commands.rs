use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CitationCommands, EntityCommands, MonitorCommands, RegistryCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Entity registry health.
    Registry {
        #[command(subcommand)]
        action: RegistryCommands,
    },
    /// Entity lookups and derived views.
    Entity {
        #[command(subcommand)]
        action: EntityCommands,
    },
    /// Citation (`sameAs`) validation.
    Citation {
        #[command(subcommand)]
        action: CitationCommands,
    },
    /// Scan snapshots, diffs, and alerts.
    Monitor {
        #[command(subcommand)]
        action: MonitorCommands,
    },
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `lode schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name; lists all registered names when omitted.
    pub name: Option<String>,
}
