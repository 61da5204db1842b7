//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, database and repository end to end.
//! - Print the first catalogue page summary for quick local checks.

use log::error;
use profession_core::db::FileDatabase;
use profession_core::{CoreConfig, ProfessionRepository, SqliteProfessionRepository};
use std::process::ExitCode;

const FIRST_PAGE_SIZE: u32 = 10;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("profession_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        profession_core::init_logging(config.log_level, log_dir)?;
    }

    println!("profession_core ping={}", profession_core::ping());
    println!(
        "profession_core version={}",
        profession_core::core_version()
    );

    let database = FileDatabase::open(&config.db_path)
        .map_err(|err| format!("database open failed: {err}"))?;
    let repo = SqliteProfessionRepository::try_new(database)
        .map_err(|err| format!("repository init failed: {err}"))?;
    let page = repo
        .list_page(0, FIRST_PAGE_SIZE)
        .map_err(|err| format!("list failed: {err}"))?;

    let meta = page.pagination;
    println!("db_path={}", repo.source().path().display());
    println!(
        "current_page={} per_page={} total_items={} total_pages={}",
        meta.current_page, meta.per_page, meta.total_items, meta.total_pages
    );
    for profession in &page.items {
        println!("{}\t{}", profession.id, profession.name);
    }
    Ok(())
}
