//! Runtime configuration for embedding callers.
//!
//! # Invariants
//! - An absent database path means a private in-memory store.
//! - Logging starts only when a log directory is configured.

use crate::logging::{self, default_log_level, LoggingError};
use crate::repo::generic_repo::RepoResult;
use crate::repo::unit_of_work::UnitOfWork;
use serde::Deserialize;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "DRIVER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "DRIVER_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "DRIVER_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    /// Must be absolute when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `DRIVER_DB_PATH`, `DRIVER_LOG_LEVEL` and `DRIVER_LOG_DIR`;
    /// unset or blank variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(path) = read(DB_PATH_ENV) {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Opens and migrates the configured store.
    pub fn open_unit_of_work(&self) -> RepoResult<UnitOfWork> {
        match &self.database_path {
            Some(path) => UnitOfWork::open(path),
            None => UnitOfWork::open_in_memory(),
        }
    }

    /// Starts file logging when `log_dir` is set; otherwise does nothing.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        let Some(dir) = &self.log_dir else {
            return Ok(());
        };
        let dir = dir.to_str().ok_or_else(|| {
            LoggingError::InvalidDirectory(format!(
                "log_dir `{}` is not valid UTF-8",
                dir.display()
            ))
        })?;
        logging::init_logging(&self.log_level, dir)
    }
}
