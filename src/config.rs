use std::{env, fmt, fs, path::Path, path::PathBuf, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CalendarError, Result};
use crate::parsing::DEFAULT_TIME_ZONE;
use crate::utils;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_USER_AGENT: &str = concat!("chorus-calendar/", env!("CARGO_PKG_VERSION"));

/// Process-wide settings, built once at startup and passed down explicitly.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Session signing key for the web front end; generated when not provided.
    pub secret_key: String,
    /// Log to the terminal instead of the rotated file. The terminal logger writes to
    /// stderr so rendered calendars on stdout stay clean.
    pub log_to_stdout: bool,
    pub time_zone: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: generate_secret_key(),
            log_to_stdout: false,
            time_zone: DEFAULT_TIME_ZONE.name().to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_dir: None,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("secret_key", &"<redacted>")
            .field("log_to_stdout", &self.log_to_stdout)
            .field("time_zone", &self.time_zone)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl AppConfig {
    /// Defaults, then the JSON config file if present, then environment overrides.
    pub fn load() -> Self {
        let path = utils::config_path();
        let file_config = read_config(&path).unwrap_or_else(|err| {
            eprintln!("ignoring config file: {err:#}");
            AppConfig::default()
        });
        file_config.with_env(|key| env::var(key).ok())
    }

    /// Apply `SECRET_KEY`, `LOG_TO_STDOUT`, `CALENDAR_TIME_ZONE` and `CALENDAR_LOG_DIR`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("SECRET_KEY").filter(|value| !value.is_empty()) {
            self.secret_key = secret;
        }
        if let Some(flag) = lookup("LOG_TO_STDOUT") {
            self.log_to_stdout = !flag.is_empty();
        }
        if let Some(zone) = lookup("CALENDAR_TIME_ZONE").filter(|value| !value.is_empty()) {
            self.time_zone = zone;
        }
        if let Some(dir) = lookup("CALENDAR_LOG_DIR").filter(|value| !value.is_empty()) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn tz(&self) -> Result<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| CalendarError::Validation(format!("unknown time zone: {}", self.time_zone)))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(utils::default_log_dir)
    }
}

fn generate_secret_key() -> String {
    Uuid::new_v4().simple().to_string()
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {}", path.display()))
}
