//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `module_info_core` linkage and the create/edit/remove flow.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `module_info_cli [DB_PATH] [LOG_DIR]`. Without `DB_PATH` an
//! in-memory database is used; without `LOG_DIR` logging stays disabled.

use module_info_core::db::{open_db, open_db_in_memory};
use module_info_core::{
    init_logging, LoggingConfig, ModuleInput, ModuleService, SqliteModuleRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("module_info_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next();
    let log_dir = args.next();

    if let Some(log_dir) = log_dir {
        let config = LoggingConfig::with_default_level(log_dir)?;
        init_logging(&config)?;
    }

    println!("module_info_core ping={}", module_info_core::ping());
    println!("module_info_core version={}", module_info_core::core_version());

    let conn = match db_path.as_deref() {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;
    let repo = SqliteModuleRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = ModuleService::new(repo);

    let created = service
        .create(ModuleInput {
            name: "Algorithms".to_string(),
            duration: 90,
            exam_types: Some(vec!["written".to_string()]),
        })
        .map_err(|err| err.to_string())?;
    println!("created id={} version={}", created.id, created.version);

    let edited = service
        .edit(
            created.id,
            ModuleInput {
                name: "Algorithms II".to_string(),
                duration: 120,
                exam_types: Some(vec!["written".to_string(), "oral".to_string()]),
            },
        )
        .map_err(|err| err.to_string())?;
    println!("edited id={} version={}", edited.id, edited.version);

    service.remove(edited.id).map_err(|err| err.to_string())?;
    let gone = service
        .show(edited.id)
        .err()
        .is_some_and(|err| err.is_not_found());
    println!("removed id={} not_found={gone}", edited.id);

    log::logger().flush();
    Ok(())
}
