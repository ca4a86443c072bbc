//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the module data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to storage errors.

pub mod module_repo;
