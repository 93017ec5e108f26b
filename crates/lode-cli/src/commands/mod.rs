pub mod citation;
pub mod dispatch;
pub mod entity;
pub mod monitor;
pub mod registry;
pub mod schema;
pub mod shared;
