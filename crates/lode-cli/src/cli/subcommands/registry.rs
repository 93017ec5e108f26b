use std::path::PathBuf;

use clap::Subcommand;

/// Entity registry commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RegistryCommands {
    /// Load the registry and audit every citation.
    Check {
        /// Seed file to check instead of the configured one.
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}
