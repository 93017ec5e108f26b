use anyhow::bail;
use lode_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `lode schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    match &args.name {
        None => output(&registry.list(), flags.format),
        Some(name) => match registry.get(name) {
            Some(schema) => output(schema, flags.format),
            None => bail!(
                "unknown schema '{name}'; available: {}",
                registry.list().join(", ")
            ),
        },
    }
}
