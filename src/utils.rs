use dirs::data_dir;
use once_cell::sync::Lazy;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "chorus-calendar";

/// Per-user data directory, or `./chorus-calendar` when the platform has none.
static DATA_ROOT: Lazy<PathBuf> =
    Lazy::new(|| data_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR));

pub fn config_path() -> PathBuf {
    DATA_ROOT.join("config.json")
}

pub fn default_log_dir() -> PathBuf {
    DATA_ROOT.join("logs")
}

pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
