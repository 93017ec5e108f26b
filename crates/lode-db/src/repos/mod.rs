//! Repository modules for monitoring state.
//!
//! Each module adds methods to `LodeService` via `impl LodeService` blocks.

pub mod alert;
pub mod rule;
pub mod snapshot;
