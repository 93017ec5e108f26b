//! # lode-graph
//!
//! The entity graph behind Lodestar's entity pages.
//!
//! - [`EntityRegistry`]: the validated, read-only set of entities loaded from a
//!   seed document (bundled or external).
//! - [`citation`]: `sameAs` validation against the trusted-domain whitelist.
//! - [`structured`]: schema.org JSON-LD records for entity pages.
//! - [`triples`], [`connected`], [`pages`]: the three derived entity-page views
//!   (relationship table, connected entities, used-in pages).
//!
//! Everything here is synchronous and allocation-only. A registry is immutable
//! after load and can be shared by reference.

pub mod citation;
pub mod connected;
pub mod error;
pub mod pages;
pub mod registry;
pub mod structured;
pub mod triples;

pub use citation::{SameAsValidation, TrustedDomains, validate_same_as_reference};
pub use connected::{ConnectedOptions, EntityGraph, GraphSummary, get_connected_entities};
pub use error::{GraphError, RegistryLoadError};
pub use pages::{PageIndex, UsedInOptions, get_used_in_pages};
pub use registry::{CitationAudit, EntityRegistry, load_configured_registry, load_registry};
pub use structured::generate_entity_schema;
pub use triples::generate_relationship_table;
