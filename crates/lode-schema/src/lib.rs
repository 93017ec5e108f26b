//! # lode-schema
//!
//! JSON Schema generation, validation, and registry for Lodestar.
//!
//! Record types are defined in `lode-core` with `#[derive(JsonSchema)]`.
//! This crate builds their schemas once and validates JSON values against
//! them: seed documents when the entity registry loads, snapshots at the
//! persistence boundary, and `lode schema` output for external tooling.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
