mod access;
mod analytics;
mod config;
mod db;
mod export;
mod forms;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let (config_dir, data_dir) = project_dirs()?;

    let config = config::Config::load(&config_dir.join("config.toml"))?
        .apply_env(|key| std::env::var(key).ok());
    logging::init(&data_dir.join("expensetui.log"), &config.log_level)?;

    let db_path = config.database_path(data_dir.join("expensetui.db"));
    let mut db = db::Database::open(&db_path)?;

    let user = run::take_user_flag(&mut args).unwrap_or_else(|| config.user.clone());
    let owner = db.ensure_owner(&user)?;
    tracing::info!(owner = %owner, db = %db_path.display(), "Starting");

    match args.len() {
        1 => run::as_tui(&mut db, owner),
        2.. => run::as_cli(&args, &mut db, &owner),
        _ => {
            eprintln!("Usage: expensetui [--user <name>] [command]");
            Ok(())
        }
    }
}

fn project_dirs() -> Result<(PathBuf, PathBuf)> {
    let proj_dirs = directories::ProjectDirs::from("com", "expensetui", "ExpenseTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let config_dir = proj_dirs.config_dir().to_path_buf();
    let data_dir = proj_dirs.data_dir().to_path_buf();
    for dir in [&config_dir, &data_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok((config_dir, data_dir))
}
