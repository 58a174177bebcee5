pub mod commands;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod metrics;
pub mod models;
pub mod session;
pub mod settings;
pub mod storage;
pub mod store;
pub mod utils;
pub mod validation;

mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use db::Database;
use session::SessionManager;
use settings::SettingsStore;
use storage::StoragePort;

pub use error::SurveyError;

pub struct AppState<S: StoragePort = Database> {
    pub manager: SessionManager<S>,
    pub settings: SettingsStore,
}

impl AppState<Database> {
    /// Opens the SQLite store and settings file under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let database = Database::new(data_dir.join(db::DATABASE_FILE_NAME))?;
        let settings = SettingsStore::new(data_dir.join(settings::SETTINGS_FILE_NAME))?;

        Ok(Self {
            manager: SessionManager::new(database),
            settings,
        })
    }
}

/// Platform data directory for the app, e.g. `~/.local/share/workshop-pulse`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workshop-pulse")
}

pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::logging::init(cli.verbose);

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    log::debug!("Using data directory {}", data_dir.display());

    let state = AppState::open(&data_dir)?;
    cli::dispatch(&state, cli)
}
