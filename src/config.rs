use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides the default database location
pub const DB_ENV_VAR: &str = "RESTAURANT_DB";

/// File name used inside the default data directory
pub const DB_FILE_NAME: &str = "restaurant.db";

/// Resolve the database path: explicit argument, then `RESTAURANT_DB`, then
/// the per-user data directory
pub fn resolve_db_path(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match custom_path {
        Some(path) => path,
        None => match std::env::var_os(DB_ENV_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        },
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {:?}", parent))?;
    }

    Ok(path)
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "restaurant-records")
        .context("Could not determine data directory")?;
    Ok(proj_dirs.data_dir().join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let wanted = dir.path().join("nested").join("r.db");

        let path = resolve_db_path(Some(wanted.clone())).unwrap();
        assert_eq!(path, wanted);
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_bare_file_name() {
        let path = resolve_db_path(Some(PathBuf::from(DB_FILE_NAME))).unwrap();
        assert_eq!(path, PathBuf::from(DB_FILE_NAME));
    }
}
