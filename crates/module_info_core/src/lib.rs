//! Core domain logic for the module catalogue.
//! This crate is the single source of truth for module invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validator;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::module::{
    validate_module, validate_module_input, Module, ModuleId, ModuleInput, EXAM_TYPES_MAX,
    INITIAL_VERSION, MIN_MODULE_ID, MODULE_NAME_MAX_BYTES,
};
pub use repo::module_repo::{ModuleRepository, RepoError, RepoResult, SqliteModuleRepository};
pub use service::module_service::{ModuleService, ServiceError, ServiceResult};
pub use validator::{matches, permitted_value, unique, FieldErrors, Validator, EMAIL_RX};

/// Minimal liveness probe for wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
