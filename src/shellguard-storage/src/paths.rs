//! OS-aware storage paths.
//!
//! - **Windows**: `%APPDATA%\shellguard\`
//! - **macOS**: `~/Library/Application Support/shellguard/`
//! - **Linux**: `~/.local/share/shellguard/`

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, StorageError};

/// Application directory name under the OS data dir.
pub const APP_NAME: &str = "shellguard";

/// History database file name.
pub const HISTORY_DB_FILE: &str = "history.db";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SHELLGUARD_DATA_DIR";

/// Data directory, honoring the env override.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(val) = std::env::var(DATA_DIR_ENV) {
        if !val.is_empty() {
            let path = PathBuf::from(val);
            debug!(path = %path.display(), "using SHELLGUARD_DATA_DIR override");
            return Ok(path);
        }
    }

    let base = dirs::data_dir().ok_or(StorageError::HomeDirNotFound)?;
    Ok(base.join(APP_NAME))
}

/// Full path of the history database.
pub fn history_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(HISTORY_DB_FILE))
}
