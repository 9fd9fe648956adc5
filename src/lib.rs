pub mod catalog;
pub mod console;
pub mod db;
pub mod debounce;
pub mod locale;
pub mod presentation;
pub mod settings;
mod utils;

use std::{io, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use db::Database;
use log::info;
use presentation::{
    feedback::{TerminalBell, TerminalNotice},
    MoodController,
};
use settings::SettingsStore;

pub const DATABASE_FILE: &str = "moodtracker.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

/// Where the journal and settings live, given an environment lookup.
///
/// `MOODLOG_HOME` wins, then the XDG data directory, then `~/.local/share`.
pub fn resolve_data_dir<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(home) = non_empty("MOODLOG_HOME") {
        return PathBuf::from(home);
    }
    if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("moodlog");
    }
    if let Some(home) = non_empty("HOME") {
        return PathBuf::from(home).join(".local/share/moodlog");
    }
    PathBuf::from(".moodlog")
}

pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    info!("moodlog starting up...");

    let app_data_dir = resolve_data_dir(|key| std::env::var(key).ok());
    std::fs::create_dir_all(&app_data_dir).with_context(|| {
        format!("failed to create data directory {}", app_data_dir.display())
    })?;

    let database = Database::new(app_data_dir.join(DATABASE_FILE))?;
    let settings_store = SettingsStore::new(app_data_dir.join(SETTINGS_FILE))?;
    let settings = settings_store.snapshot();

    let controller = MoodController::new(
        database,
        settings.catalog,
        settings.locale,
        settings.feedback,
        Arc::new(TerminalBell),
        Arc::new(TerminalNotice),
    );

    println!("{}\n", console::HELP);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    console::run(&controller, stdin, &mut stdout).await?;

    info!("moodlog shutting down");
    Ok(())
}
