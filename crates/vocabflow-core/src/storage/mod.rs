mod backup;
mod config;
pub mod database;

pub use backup::{LibraryBundle, BACKUP_VERSION};
pub use config::{Config, ProgressConfig, ScheduleConfig, SessionConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `VOCABFLOW_DATA_DIR` wins when set. Otherwise `~/.config/vocabflow[-dev]/`
/// based on VOCABFLOW_ENV (set VOCABFLOW_ENV=dev for the development directory).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("VOCABFLOW_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("VOCABFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("vocabflow-dev")
            } else {
                base_dir.join("vocabflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
