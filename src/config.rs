use std::path::PathBuf;
use anyhow::{anyhow, Result};
use directories::ProjectDirs;

/// Overrides the per-user installation path.
pub const USER_DIR_ENV: &str = "FPAK_USER_DIR";
/// Overrides the system-wide installation path.
pub const SYSTEM_DIR_ENV: &str = "FPAK_SYSTEM_DIR";

pub const DEFAULT_SYSTEM_DIR: &str = "/var/lib/fpak";

/// Where each installation scope lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub user_dir: PathBuf,
    pub system_dir: PathBuf,
}

impl Config {
    pub fn new(user_dir: impl Into<PathBuf>, system_dir: impl Into<PathBuf>) -> Self {
        Config {
            user_dir: user_dir.into(),
            system_dir: system_dir.into(),
        }
    }

    /// Reads `FPAK_USER_DIR` and `FPAK_SYSTEM_DIR`, falling back to the
    /// platform data directory and [`DEFAULT_SYSTEM_DIR`].
    pub fn from_env() -> Result<Config> {
        let user_dir = match std::env::var_os(USER_DIR_ENV) {
            Some(path) => PathBuf::from(path),
            None => get_default_user_dir()?,
        };
        let system_dir = std::env::var_os(SYSTEM_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_DIR));
        Ok(Config::new(user_dir, system_dir))
    }
}

pub fn get_default_user_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "fpak", "fpak")
        .ok_or_else(|| anyhow!("Could not get project directories"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
