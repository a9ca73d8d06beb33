use std::{
    ffi::OsString,
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;
use simplelog::{
    ColorChoice, Config, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

use crate::config::AppConfig;
use crate::utils;

pub const LOG_FILE_NAME: &str = "chorus-calendar.log";
pub const MAX_LOG_BYTES: u64 = 10_240;
pub const LOG_BACKUPS: usize = 10;

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_location_level(LevelFilter::Info)
        .build()
}

/// Install the global logger: the terminal (stderr, so rendered output on stdout stays
/// clean) when `log_to_stdout` is set, otherwise a size-rotated file in the log dir.
pub fn init(config: &AppConfig) -> Result<()> {
    if config.log_to_stdout {
        TermLogger::init(
            LevelFilter::Info,
            log_config(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )
        .context("unable to install terminal logger")?;
    } else {
        let path = config.log_dir().join(LOG_FILE_NAME);
        let file = open_log_file(&path)?;
        WriteLogger::init(LevelFilter::Info, log_config(), file)
            .context("unable to install file logger")?;
    }

    info!("Starting calendar generator");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    utils::ensure_parent(path)
        .with_context(|| format!("unable to create log directory for {}", path.display()))?;
    rotate_if_needed(path, MAX_LOG_BYTES, LOG_BACKUPS)
        .with_context(|| format!("unable to rotate {}", path.display()))?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("unable to open {}", path.display()))
}

pub fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Shift `path` to `path.1` (and older backups up by one) once it reaches `max_bytes`.
/// At most `backups` numbered files are kept. Returns whether a rotation happened.
pub fn rotate_if_needed(path: &Path, max_bytes: u64, backups: usize) -> io::Result<bool> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if size < max_bytes {
        return Ok(false);
    }
    if backups == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..backups).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            fs::rename(&from, backup_path(path, index + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_bytes(path: &Path, len: usize) {
        fs::write(path, vec![b'x'; len]).expect("write log file");
    }

    #[test]
    fn small_or_missing_files_are_left_alone() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(LOG_FILE_NAME);
        assert!(!rotate_if_needed(&path, 100, 3).expect("missing file"));

        write_bytes(&path, 10);
        assert!(!rotate_if_needed(&path, 100, 3).expect("small file"));
        assert!(path.exists());
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn full_file_moves_to_first_backup() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(LOG_FILE_NAME);
        write_bytes(&path, 100);

        assert!(rotate_if_needed(&path, 100, 3).expect("rotate"));
        assert!(!path.exists());
        assert_eq!(fs::metadata(backup_path(&path, 1)).expect("backup").len(), 100);
    }

    #[test]
    fn backups_shift_and_oldest_is_dropped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(LOG_FILE_NAME);
        write_bytes(&backup_path(&path, 1), 1);
        write_bytes(&backup_path(&path, 2), 2);
        write_bytes(&backup_path(&path, 3), 3);
        write_bytes(&path, 50);

        assert!(rotate_if_needed(&path, 10, 3).expect("rotate"));
        let len = |index| fs::metadata(backup_path(&path, index)).expect("backup").len();
        assert_eq!(len(1), 50);
        assert_eq!(len(2), 1);
        assert_eq!(len(3), 2);
        assert!(!backup_path(&path, 4).exists());
    }

    #[test]
    fn backup_names_append_index() {
        let path = Path::new("/var/log/chorus-calendar.log");
        assert_eq!(
            backup_path(path, 7),
            PathBuf::from("/var/log/chorus-calendar.log.7")
        );
    }
}
