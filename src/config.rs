//! Environment-driven configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `CLINSIGHT_DB_PATH` | `clinsight.db` |
//! | `CLINSIGHT_PATIENTS_FILE` | built-in demo directory |
//! | `CLINSIGHT_SEED_DEMO_USERS` | `true` |
//! | `CLINSIGHT_REDIRECT_DELAY_MS` | `1500` |
//! | `CLINSIGHT_LOG_MODE` | `auto` (`file` on a TTY, else `stdout`) |
//! | `CLINSIGHT_LOG_FILE` | `clinsight.log` |

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::time::Duration;

use crate::ClinsightError;

/// Delay before leaving the sign-up success screen.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub patients_file: Option<PathBuf>,
    pub seed_demo_users: bool,
    pub redirect_delay: Duration,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("clinsight.db"),
            patients_file: None,
            seed_demo_users: true,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("clinsight.log"),
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ClinsightError> {
    match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        other => Err(ClinsightError::Config(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `ClinsightError::Config` for malformed values.
    pub fn from_env() -> Result<Self, ClinsightError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns `ClinsightError::Config` for malformed values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClinsightError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("CLINSIGHT_DB_PATH").filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path.trim());
        }

        config.patients_file = lookup("CLINSIGHT_PATIENTS_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(|v| PathBuf::from(v.trim()));

        if let Some(v) = lookup("CLINSIGHT_SEED_DEMO_USERS") {
            config.seed_demo_users = parse_bool("CLINSIGHT_SEED_DEMO_USERS", &v)?;
        }

        if let Some(v) = lookup("CLINSIGHT_REDIRECT_DELAY_MS") {
            let ms: u64 = v.trim().parse().map_err(|_| {
                ClinsightError::Config(format!(
                    "CLINSIGHT_REDIRECT_DELAY_MS must be milliseconds, got '{v}'"
                ))
            })?;
            config.redirect_delay = Duration::from_millis(ms);
        }

        if let Some(v) = lookup("CLINSIGHT_LOG_MODE") {
            config.log_mode = match v.trim() {
                "file" => LogMode::File,
                "stdout" => LogMode::Stdout,
                "auto" | "" => LogMode::Auto,
                other => {
                    return Err(ClinsightError::Config(format!(
                        "CLINSIGHT_LOG_MODE must be file, stdout or auto, got '{other}'"
                    )))
                }
            };
        }

        if let Some(path) = lookup("CLINSIGHT_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            config.log_file = PathBuf::from(path.trim());
        }

        Ok(config)
    }

    /// Open the log file for appending, creating its directory first.
    ///
    /// # Errors
    /// Returns `ClinsightError::Io` if the directory or file cannot be created.
    pub fn open_log_file(&self) -> Result<File, ClinsightError> {
        if let Some(parent) = self.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("Should parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.redirect_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CLINSIGHT_DB_PATH", "/tmp/c.db"),
            ("CLINSIGHT_PATIENTS_FILE", "patients.json"),
            ("CLINSIGHT_SEED_DEMO_USERS", "no"),
            ("CLINSIGHT_REDIRECT_DELAY_MS", "250"),
            ("CLINSIGHT_LOG_MODE", "stdout"),
        ]))
        .expect("Should parse");

        assert_eq!(config.db_path, PathBuf::from("/tmp/c.db"));
        assert_eq!(config.patients_file, Some(PathBuf::from("patients.json")));
        assert!(!config.seed_demo_users);
        assert_eq!(config.redirect_delay, Duration::from_millis(250));
        assert_eq!(config.log_mode, LogMode::Stdout);
    }

    #[test]
    fn test_malformed_values_rejected() {
        let bad_delay = AppConfig::from_lookup(lookup(&[("CLINSIGHT_REDIRECT_DELAY_MS", "soon")]));
        assert!(matches!(bad_delay, Err(ClinsightError::Config(_))));

        let bad_mode = AppConfig::from_lookup(lookup(&[("CLINSIGHT_LOG_MODE", "syslog")]));
        assert!(matches!(bad_mode, Err(ClinsightError::Config(_))));
    }

    #[test]
    fn test_log_file_directory_created() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let config = AppConfig {
            log_file: dir.path().join("logs/nested/clinsight.log"),
            ..AppConfig::default()
        };

        config.open_log_file().expect("Should open");
        assert!(config.log_file.exists());
    }

    #[test]
    fn test_log_file_directory_failure_reported() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").expect("Should write");
        let config = AppConfig {
            log_file: blocker.join("clinsight.log"),
            ..AppConfig::default()
        };

        assert!(matches!(config.open_log_file(), Err(ClinsightError::Io(_))));
    }
}
