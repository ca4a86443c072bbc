//! Domain model for the module resource.
//!
//! # Responsibility
//! - Define the single persisted entity and caller input shape.
//! - Hold the rule set checked before persistence.
//!
//! # Invariants
//! - Every persisted module is identified by a store-assigned `ModuleId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod module;
