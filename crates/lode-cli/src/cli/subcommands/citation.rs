use clap::Subcommand;

/// Citation commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CitationCommands {
    /// Validate one `sameAs` URL against the trusted domains.
    Check {
        url: String,
        #[arg(long, default_value = "cli")]
        source: String,
    },
}
