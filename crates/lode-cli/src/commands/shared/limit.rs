use crate::cli::GlobalFlags;

/// Global `--limit` when given, otherwise the configured fallback.
#[must_use]
pub fn effective_limit(flags: &GlobalFlags, fallback: u32) -> u32 {
    flags.limit.unwrap_or(fallback)
}
