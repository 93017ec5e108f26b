use lode_core::entities::SameAsReference;
use lode_core::enums::ReferenceType;
use lode_graph::validate_same_as_reference;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CitationCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CitationCheckResponse<'a> {
    url: &'a str,
    source: &'a str,
    valid: bool,
    errors: Vec<&'static str>,
}

/// Handle `lode citation`.
pub fn handle(action: &CitationCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CitationCommands::Check { url, source } => {
            let reference = SameAsReference {
                url: url.clone(),
                source: source.clone(),
                kind: ReferenceType::Other,
                verified: false,
            };
            let validation = validate_same_as_reference(&reference, &ctx.trusted);
            output(
                &CitationCheckResponse {
                    url,
                    source,
                    valid: validation.valid,
                    errors: validation.errors.iter().map(|code| code.as_str()).collect(),
                },
                flags.format,
            )
        }
    }
}
