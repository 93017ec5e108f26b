use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Registry { action } => commands::registry::handle(&action, ctx, flags),
        Commands::Entity { action } => commands::entity::handle(&action, ctx, flags),
        Commands::Citation { action } => commands::citation::handle(&action, ctx, flags),
        Commands::Monitor { action } => commands::monitor::handle(&action, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
