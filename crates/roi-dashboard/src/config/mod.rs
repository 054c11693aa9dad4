use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::assessment::DEFAULT_THRESHOLD_PERCENT;

/// Distinguishes runtime behavior for different stages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the dashboard tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub assessment: AssessmentConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let store_path = env::var("DASHBOARD_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".roi-dashboard/store.json"));

        let threshold_percent = match env::var("ASSESSMENT_THRESHOLD_PERCENT") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_THRESHOLD_PERCENT,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig { store_path },
            assessment: AssessmentConfig { threshold_percent },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidThreshold(raw.to_string()))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold(raw.to_string()));
    }
    Ok(value)
}

/// Location of the key-value file used for saved responses and filters.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub store_path: PathBuf,
}

/// Assessment gate settings.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub threshold_percent: f64,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidThreshold(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold(raw) => write!(
                f,
                "ASSESSMENT_THRESHOLD_PERCENT must be a number between 0 and 100 (got '{raw}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("DASHBOARD_STORE_PATH");
        env::remove_var("ASSESSMENT_THRESHOLD_PERCENT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(
            config.storage.store_path,
            PathBuf::from(".roi-dashboard/store.json")
        );
        assert_eq!(config.assessment.threshold_percent, 70.0);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ASSESSMENT_THRESHOLD_PERCENT", "140");
        let err = AppConfig::load().expect_err("threshold above 100 rejected");
        assert!(matches!(err, ConfigError::InvalidThreshold(raw) if raw == "140"));
        reset_env();
    }

    #[test]
    fn reads_environment_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("ASSESSMENT_THRESHOLD_PERCENT", " 65.5 ");
        env::set_var("DASHBOARD_STORE_PATH", "/tmp/dashboard.json");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.assessment.threshold_percent, 65.5);
        assert_eq!(
            config.storage.store_path,
            PathBuf::from("/tmp/dashboard.json")
        );
        reset_env();
    }
}
