mod citation;
mod entity;
mod monitor;
mod registry;

pub use citation::CitationCommands;
pub use entity::EntityCommands;
pub use monitor::{MonitorCommands, RuleAddArgs, RuleCommands};
pub use registry::RegistryCommands;
