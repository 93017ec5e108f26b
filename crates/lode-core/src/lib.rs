//! # lode-core
//!
//! Core types, ID prefixes, store contracts, and error types for Lodestar.
//!
//! This crate provides the foundational types shared across all Lodestar crates:
//! - Entity graph records (entities, relationships, `sameAs` citations, triples)
//! - Page index records and page references
//! - Scan snapshots, scan diffs, alert rules, and alerts
//! - Closed vocabularies (entity kinds, predicates, severities, statuses)
//! - Store traits implemented by the persistence layer
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod store;
