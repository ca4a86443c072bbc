//! Module domain model and validation rules.
//!
//! # Responsibility
//! - Define the single persisted `Module` record and its wire shape.
//! - Provide the rule set that must hold before any write.
//!
//! # Invariants
//! - `id`, `created_at`, `updated_at` and `version` are written only by the
//!   repository layer.
//! - `module_name` is non-empty and at most `MODULE_NAME_MAX_BYTES` bytes.
//! - `module_duration` is strictly positive.
//! - `exam_types` holds 1..=`EXAM_TYPES_MAX` distinct values.

use crate::validator::{unique, Validator};
use serde::{Deserialize, Serialize};

/// Store-assigned identity of a module row.
pub type ModuleId = i64;

/// Smallest identity the store can assign.
pub const MIN_MODULE_ID: ModuleId = 1;
/// Version assigned to freshly inserted rows.
pub const INITIAL_VERSION: i32 = 1;
/// Upper bound for `name`, measured in UTF-8 bytes.
pub const MODULE_NAME_MAX_BYTES: usize = 500;
/// Upper bound for the number of exam types.
pub const EXAM_TYPES_MAX: usize = 5;

/// Persisted module record.
///
/// Timestamps are Unix epoch milliseconds and never leave the process through
/// serde. Zero-valued duration and empty exam types are omitted on output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub id: ModuleId,
    #[serde(skip)]
    pub created_at: i64,
    #[serde(skip)]
    pub updated_at: i64,
    #[serde(rename = "module_name")]
    pub name: String,
    #[serde(
        rename = "module_duration",
        default,
        skip_serializing_if = "is_zero"
    )]
    pub duration: i32,
    #[serde(rename = "exam_type", default, skip_serializing_if = "Vec::is_empty")]
    pub exam_types: Vec<String>,
    #[serde(default)]
    pub version: i32,
}

/// Caller-supplied module fields.
///
/// Used by create/edit flows; identity, timestamps and version are never
/// accepted from callers. `exam_types` is `None` when the field was absent
/// (or `null`), which is reported apart from an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleInput {
    #[serde(rename = "module_name", default)]
    pub name: String,
    #[serde(rename = "module_duration", default)]
    pub duration: i32,
    #[serde(rename = "exam_type", default)]
    pub exam_types: Option<Vec<String>>,
}

impl Module {
    /// Creates an unsaved module candidate.
    ///
    /// Store-owned fields stay zeroed until `insert` writes them back.
    pub fn new(name: impl Into<String>, duration: i32, exam_types: Vec<String>) -> Self {
        Self {
            name: name.into(),
            duration,
            exam_types,
            ..Self::default()
        }
    }

    /// Overwrites caller-owned fields from `input`.
    pub fn apply(&mut self, input: ModuleInput) {
        self.name = input.name;
        self.duration = input.duration;
        self.exam_types = input.exam_types.unwrap_or_default();
    }
}

impl From<ModuleInput> for Module {
    fn from(input: ModuleInput) -> Self {
        Self::new(
            input.name,
            input.duration,
            input.exam_types.unwrap_or_default(),
        )
    }
}

/// Records presence failures that only exist on raw caller input.
///
/// Run before `validate_module` on the same validator so that a missing
/// `exam_type` wins over the cardinality rules for that field.
pub fn validate_module_input(v: &mut Validator, input: &ModuleInput) {
    v.check(input.exam_types.is_some(), "exam_type", "must be provided");
}

/// Applies every module rule to `module`, accumulating failures in `v`.
///
/// Rules run in a fixed order and never short-circuit; `v.valid()` reflects
/// whether `module` may be persisted once this returns.
pub fn validate_module(v: &mut Validator, module: &Module) {
    v.check(!module.name.is_empty(), "module_name", "must be provided");
    v.check(
        module.name.len() <= MODULE_NAME_MAX_BYTES,
        "module_name",
        "must not be more than 500 bytes long",
    );

    v.check(module.duration != 0, "module_duration", "must be provided");
    v.check(
        module.duration > 0,
        "module_duration",
        "must be a positive integer",
    );

    v.check(
        !module.exam_types.is_empty(),
        "exam_type",
        "must contain at least 1 exam type",
    );
    v.check(
        module.exam_types.len() <= EXAM_TYPES_MAX,
        "exam_type",
        "must not contain more than 5 exam types",
    );
    v.check(
        unique(&module.exam_types),
        "exam_type",
        "must not contain duplicate values",
    );
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}
