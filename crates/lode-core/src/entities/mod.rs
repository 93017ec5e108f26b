//! Record structs for all Lodestar domain objects.
//!
//! Every struct derives `Serialize`, `Deserialize`, and `JsonSchema`. Field
//! names serialize as camelCase: these records are the JSON contract handed
//! to renderers and stored at the persistence boundary.

mod alert;
mod diff;
mod entity;
mod graph;
mod page;
mod snapshot;
mod structured;

pub use alert::{Alert, AlertDraft, AlertRule, AlertRuleKind};
pub use diff::{ClusterDelta, IssueDelta, ScanDiff, ScoreDelta};
pub use entity::{Entity, EntitySeed, Relationship, SameAsReference};
pub use graph::{ConnectedEntity, Triple};
pub use page::{PageRecord, PageReference};
pub use snapshot::{Snapshot, SnapshotCluster, SnapshotIssue};
pub use structured::{EntitySchemaRecord, SCHEMA_ORG_CONTEXT, SchemaThing, entity_fragment_id};
