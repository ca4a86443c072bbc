//! Module repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create / fetch / full-update / delete over `module_info`.
//! - Own identity, timestamp and version stamping for every row.
//! - Translate store-level absence into `RepoError::NotFound`.
//!
//! # Invariants
//! - Identities below `MIN_MODULE_ID` resolve to `NotFound` without I/O.
//! - `update` is a compare-and-swap on `version`: it only writes when the
//!   stored version equals the caller's observed version, and bumps it by one.
//! - Deletes are hard deletes; a second delete of the same id is `NotFound`.
//! - No validation happens here; callers run `validate_module` first.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::module::{Module, ModuleId, MIN_MODULE_ID};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MODULE_TABLE: &str = "module_info";
const MODULE_COLUMNS: &[&str] = &[
    "id",
    "created_at",
    "updated_at",
    "module_name",
    "module_duration",
    "exam_type",
    "version",
];

const MODULE_SELECT_SQL: &str = "SELECT
    id,
    created_at,
    updated_at,
    module_name,
    module_duration,
    exam_type,
    version
FROM module_info";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for module persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying store failure.
    Db(DbError),
    /// No live row exists for the identity.
    NotFound(ModuleId),
    /// The row exists but its version moved past the caller's observed one.
    Conflict {
        id: ModuleId,
        expected_version: i32,
    },
    /// A persisted row could not be decoded.
    InvalidData(String),
    /// Connection schema is behind what this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "module not found: {id}"),
            Self::Conflict {
                id,
                expected_version,
            } => write!(
                f,
                "edit conflict on module {id}: version {expected_version} is stale"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted module data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for module CRUD operations.
pub trait ModuleRepository {
    /// Inserts `module` and writes store-assigned fields back into it.
    fn insert(&self, module: &mut Module) -> RepoResult<()>;
    /// Fetches one module by identity.
    fn get(&self, id: ModuleId) -> RepoResult<Module>;
    /// Overwrites mutable fields when `module.version` is still current.
    ///
    /// Returns the new version, which is also written back into `module`.
    fn update(&self, module: &mut Module) -> RepoResult<i32>;
    /// Permanently removes one module.
    fn delete(&self, id: ModuleId) -> RepoResult<()>;
}

/// SQLite-backed module repository.
pub struct SqliteModuleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteModuleRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema does
    ///   not carry the `module_info` shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ModuleRepository for SqliteModuleRepository<'_> {
    fn insert(&self, module: &mut Module) -> RepoResult<()> {
        let exam_types = encode_exam_types(&module.exam_types)?;

        let (id, created_at, updated_at, version) = self.conn.query_row(
            "INSERT INTO module_info (module_name, module_duration, exam_type)
             VALUES (?1, ?2, ?3)
             RETURNING id, created_at, updated_at, version;",
            params![module.name.as_str(), module.duration, exam_types],
            |row| {
                Ok((
                    row.get::<_, ModuleId>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i32>(3)?,
                ))
            },
        )?;

        module.id = id;
        module.created_at = created_at;
        module.updated_at = updated_at;
        module.version = version;
        Ok(())
    }

    fn get(&self, id: ModuleId) -> RepoResult<Module> {
        if id < MIN_MODULE_ID {
            return Err(RepoError::NotFound(id));
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{MODULE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_module_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn update(&self, module: &mut Module) -> RepoResult<i32> {
        if module.id < MIN_MODULE_ID {
            return Err(RepoError::NotFound(module.id));
        }

        let exam_types = encode_exam_types(&module.exam_types)?;
        let stamped = self
            .conn
            .query_row(
                "UPDATE module_info
                 SET
                    module_name = ?1,
                    module_duration = ?2,
                    exam_type = ?3,
                    version = version + 1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?4 AND version = ?5
                 RETURNING version, updated_at;",
                params![
                    module.name.as_str(),
                    module.duration,
                    exam_types,
                    module.id,
                    module.version,
                ],
                |row| Ok((row.get::<_, i32>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        let Some((version, updated_at)) = stamped else {
            return Err(self.classify_missed_update(module));
        };

        module.version = version;
        module.updated_at = updated_at;
        Ok(version)
    }

    fn delete(&self, id: ModuleId) -> RepoResult<()> {
        if id < MIN_MODULE_ID {
            return Err(RepoError::NotFound(id));
        }

        let changed = self
            .conn
            .execute("DELETE FROM module_info WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

impl SqliteModuleRepository<'_> {
    /// Decides why a guarded update touched zero rows.
    fn classify_missed_update(&self, module: &Module) -> RepoError {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM module_info WHERE id = ?1);",
            [module.id],
            |row| row.get::<_, bool>(0),
        );

        match exists {
            Ok(true) => RepoError::Conflict {
                id: module.id,
                expected_version: module.version,
            },
            Ok(false) => RepoError::NotFound(module.id),
            Err(err) => err.into(),
        }
    }
}

fn parse_module_row(row: &Row<'_>) -> RepoResult<Module> {
    let id: ModuleId = row.get("id")?;
    let exam_type_text: String = row.get("exam_type")?;
    let exam_types = serde_json::from_str::<Vec<String>>(&exam_type_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid exam_type value in module_info.exam_type for id {id}: {err}"
        ))
    })?;

    Ok(Module {
        id,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        name: row.get("module_name")?,
        duration: row.get("module_duration")?,
        exam_types,
        version: row.get("version")?,
    })
}

fn encode_exam_types(exam_types: &[String]) -> RepoResult<String> {
    serde_json::to_string(exam_types)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode exam_type: {err}")))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [MODULE_TABLE],
        |row| row.get::<_, bool>(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(MODULE_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([MODULE_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(&column) = MODULE_COLUMNS
        .iter()
        .find(|column| !present.iter().any(|name| name.as_str() == **column))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: MODULE_TABLE,
            column,
        });
    }

    Ok(())
}
