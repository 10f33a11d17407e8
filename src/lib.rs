use anyhow::{Context, Result};

pub mod cli;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod forms;
pub mod manager;
pub mod matrix;
pub mod models;
pub mod roster;
pub mod schema;
pub mod settings;
pub mod web;

pub use error::GradebookError;

use crate::manager::GradebookManager;
use crate::settings::Settings;

/// Opens the database named by the configuration (`config.toml`, environment, `.env`).
pub fn create_default_manager() -> Result<(Settings, GradebookManager)> {
    let settings = Settings::load().context("could not load configuration")?;

    let manager = GradebookManager::open(&settings.database.url)
        .with_context(|| format!("could not open database {}", settings.database.url))?;

    Ok((settings, manager))
}
