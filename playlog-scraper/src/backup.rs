//! Database backup copies
//!
//! A backup is a plain file copy named after the UTC time it was taken,
//! e.g. `2024-03-09_02-05PM_plays.db`.

use chrono::{DateTime, Utc};
use playlog_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Backup file name for `file_name` taken at `at`
pub fn backup_name(file_name: &str, at: DateTime<Utc>) -> String {
    format!("{}{}", at.format("%Y-%m-%d_%I-%M%p_"), file_name)
}

/// Copy the database into `target_dir`, or beside the database if `None`.
///
/// The target directory is created if needed. Returns the backup's path.
pub fn backup_database(db_path: &Path, target_dir: Option<&Path>, at: DateTime<Utc>) -> Result<PathBuf> {
    if !db_path.is_file() {
        return Err(Error::NotFound(format!("Database file '{}'", db_path.display())));
    }

    let file_name = db_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("Database path '{}' has no file name", db_path.display())))?;

    let dir = match target_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.to_path_buf()
        }
        None => db_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let backup_path = dir.join(backup_name(file_name, at));
    std::fs::copy(db_path, &backup_path)?;
    info!(source = %db_path.display(), backup = %backup_path.display(), "Database backed up");

    Ok(backup_path)
}
