//! Module use-case service.
//!
//! # Responsibility
//! - Provide create / show / edit / remove entry points for outer layers.
//! - Run `validate_module_input` and `validate_module` before any repository
//!   write.
//!
//! # Invariants
//! - A candidate that fails validation never reaches the repository.
//! - Repository errors are passed through unchanged inside `ServiceError::Repo`.
//! - Log lines carry ids and status only, never module names.

use crate::model::module::{
    validate_module, validate_module_input, Module, ModuleId, ModuleInput,
};
use crate::repo::module_repo::{ModuleRepository, RepoError};
use crate::validator::{FieldErrors, Validator};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for module use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Candidate failed one or more field rules.
    Validation(FieldErrors),
    /// Repository failure, including `NotFound` and `Conflict`.
    Repo(RepoError),
}

impl ServiceError {
    /// Returns `true` when the target module does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repo(RepoError::NotFound(_)))
    }

    /// Status code an HTTP adapter should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::Repo(RepoError::NotFound(_)) => 404,
            Self::Repo(RepoError::Conflict { .. }) => 409,
            Self::Repo(_) => 500,
        }
    }

    /// Caller-facing message; storage details are never exposed.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(_) => "the provided module failed validation".to_string(),
            Self::Repo(RepoError::NotFound(_)) => {
                "the requested resource could not be found".to_string()
            }
            Self::Repo(RepoError::Conflict { .. }) => {
                "unable to update the record due to an edit conflict, please try again"
                    .to_string()
            }
            Self::Repo(_) => {
                "the server encountered a problem and could not process your request".to_string()
            }
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "module validation failed:")?;
                for (field, message) in errors {
                    write!(f, " {field}={message};")?;
                }
                Ok(())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for module CRUD operations.
pub struct ModuleService<R: ModuleRepository> {
    repo: R,
}

impl<R: ModuleRepository> ModuleService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates `input` and inserts it as a new module.
    ///
    /// Returns the stored module with id, timestamps and version populated.
    pub fn create(&self, input: ModuleInput) -> ServiceResult<Module> {
        let started_at = Instant::now();
        let mut v = Validator::new();
        validate_module_input(&mut v, &input);
        let mut module = Module::from(input);
        ensure_valid(v, &module)?;

        match self.repo.insert(&mut module) {
            Ok(()) => {
                info!(
                    "event=module_insert module=service status=ok id={} version={} duration_ms={}",
                    module.id,
                    module.version,
                    started_at.elapsed().as_millis()
                );
                Ok(module)
            }
            Err(err) => Err(log_repo_failure("module_insert", None, started_at, err)),
        }
    }

    /// Fetches one module by identity.
    pub fn show(&self, id: ModuleId) -> ServiceResult<Module> {
        let started_at = Instant::now();
        match self.repo.get(id) {
            Ok(module) => {
                debug!(
                    "event=module_get module=service status=ok id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(module)
            }
            Err(err) => Err(log_repo_failure("module_get", Some(id), started_at, err)),
        }
    }

    /// Replaces caller-owned fields of an existing module.
    ///
    /// The version observed by the initial fetch guards the write, so a
    /// concurrent edit between fetch and write yields `RepoError::Conflict`.
    pub fn edit(&self, id: ModuleId, input: ModuleInput) -> ServiceResult<Module> {
        let started_at = Instant::now();
        let mut module = self
            .repo
            .get(id)
            .map_err(|err| log_repo_failure("module_update", Some(id), started_at, err))?;

        let mut v = Validator::new();
        validate_module_input(&mut v, &input);
        module.apply(input);
        ensure_valid(v, &module)?;

        match self.repo.update(&mut module) {
            Ok(version) => {
                info!(
                    "event=module_update module=service status=ok id={id} version={version} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(module)
            }
            Err(err) => Err(log_repo_failure("module_update", Some(id), started_at, err)),
        }
    }

    /// Permanently removes one module.
    pub fn remove(&self, id: ModuleId) -> ServiceResult<()> {
        let started_at = Instant::now();
        match self.repo.delete(id) {
            Ok(()) => {
                info!(
                    "event=module_delete module=service status=ok id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => Err(log_repo_failure("module_delete", Some(id), started_at, err)),
        }
    }
}

fn ensure_valid(mut v: Validator, module: &Module) -> ServiceResult<()> {
    validate_module(&mut v, module);
    if v.valid() {
        return Ok(());
    }

    let errors = v.into_errors();
    debug!(
        "event=module_validate module=service status=invalid fields={}",
        errors.keys().cloned().collect::<Vec<_>>().join(",")
    );
    Err(ServiceError::Validation(errors))
}

fn log_repo_failure(
    event: &str,
    id: Option<ModuleId>,
    started_at: Instant,
    err: RepoError,
) -> ServiceError {
    let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let elapsed = started_at.elapsed().as_millis();
    match &err {
        RepoError::NotFound(_) => debug!(
            "event={event} module=service status=not_found id={id} duration_ms={elapsed}"
        ),
        RepoError::Conflict {
            expected_version, ..
        } => warn!(
            "event={event} module=service status=conflict id={id} expected_version={expected_version} duration_ms={elapsed}"
        ),
        other => error!(
            "event={event} module=service status=error id={id} duration_ms={elapsed} error={other}"
        ),
    }
    ServiceError::Repo(err)
}
