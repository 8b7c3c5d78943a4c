//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables (and an optional
//! `.env` file). It provides thread-safe access and mutation for tests or overrides.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    /// Overrides the definition's evaluation timeout when set.
    pub evaluation_timeout_ms: Option<u64>,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn parse_or<T: FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "exam-marker".into()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "grader=info,marker=info,code_runner=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "grader.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            evaluation_timeout_ms: non_empty("EVALUATION_TIMEOUT_MS")
                .map(|_| parse_or("EVALUATION_TIMEOUT_MS", 0u64))
                .filter(|ms| *ms > 0),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// A poisoned lock is recovered; the configuration is plain data.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_log_file(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_file = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_evaluation_timeout_ms(value: Option<u64>) {
        AppConfig::set_field(|cfg| cfg.evaluation_timeout_ms = value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults_and_overrides() {
        unsafe {
            env::remove_var("LOG_FILE");
            env::set_var("LOG_TO_STDOUT", "true");
            env::set_var("EVALUATION_TIMEOUT_MS", "250");
        }

        let cfg = AppConfig::from_env();
        assert_eq!(cfg.log_file, "grader.log");
        assert!(cfg.log_to_stdout);
        assert_eq!(cfg.evaluation_timeout_ms, Some(250));

        unsafe {
            env::remove_var("LOG_TO_STDOUT");
            env::remove_var("EVALUATION_TIMEOUT_MS");
        }
    }

    #[test]
    #[serial]
    fn test_malformed_timeout_is_ignored() {
        unsafe {
            env::set_var("EVALUATION_TIMEOUT_MS", "soon");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.evaluation_timeout_ms, None);
        unsafe {
            env::remove_var("EVALUATION_TIMEOUT_MS");
        }
    }

    #[test]
    #[serial]
    fn test_setters_override_global() {
        AppConfig::set_log_file("exam-run.log");
        AppConfig::set_evaluation_timeout_ms(Some(1500));
        {
            let cfg = AppConfig::global();
            assert_eq!(cfg.log_file, "exam-run.log");
            assert_eq!(cfg.evaluation_timeout_ms, Some(1500));
        }
        AppConfig::reset();
    }
}
