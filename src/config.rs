//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! Classification bands are fixed and not configurable;
//! only the analysis and alerting thresholds are tunable.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub alerts: AlertConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analyzer thresholds
///
/// Percentages are on a 0-100 scale. All comparisons are strict (`>`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    /// Minimum correlation strength for a food to count as a trigger
    #[serde(default = "default_food_trigger_threshold")]
    pub food_trigger_threshold: f64,

    /// Strength above which a food trigger is high risk
    #[serde(default = "default_high_risk_food_threshold")]
    pub high_risk_food_threshold: f64,

    /// Minimum correlation strength for an activity to be reported
    #[serde(default = "default_activity_threshold")]
    pub activity_threshold: f64,

    /// Candidates considered per correlation before filtering
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,

    /// Items named in a single recommendation
    #[serde(default = "default_surfaced_limit")]
    pub surfaced_limit: usize,

    /// Abnormal rate above which a time period is high risk
    #[serde(default = "default_high_risk_period_threshold")]
    pub high_risk_period_threshold: f64,

    /// Readings in each trend window
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Mean difference (mg/dL) needed to call a trend
    #[serde(default = "default_trend_delta")]
    pub trend_delta: f64,

    #[serde(default = "default_min_trend_readings")]
    pub min_trend_readings: usize,

    #[serde(default = "default_min_pattern_readings")]
    pub min_pattern_readings: usize,

    /// Occurrences before a symptom counts as frequent
    #[serde(default = "default_frequent_symptom_count")]
    pub frequent_symptom_count: usize,

    /// Below this many readings a regular-testing nudge is added
    #[serde(default = "default_regular_testing_target")]
    pub regular_testing_target: usize,

    /// Abnormal percentage above which an appointment is recommended
    #[serde(default = "default_appointment_threshold")]
    pub appointment_threshold: f64,

    /// Abnormal percentage above which a pattern review is recommended
    #[serde(default = "default_review_threshold")]
    pub review_threshold: f64,
}

fn default_food_trigger_threshold() -> f64 {
    40.0
}

fn default_high_risk_food_threshold() -> f64 {
    60.0
}

fn default_activity_threshold() -> f64 {
    30.0
}

fn default_candidate_limit() -> usize {
    10
}

fn default_surfaced_limit() -> usize {
    3
}

fn default_high_risk_period_threshold() -> f64 {
    40.0
}

fn default_trend_window() -> usize {
    7
}

fn default_trend_delta() -> f64 {
    5.0
}

fn default_min_trend_readings() -> usize {
    2
}

fn default_min_pattern_readings() -> usize {
    5
}

fn default_frequent_symptom_count() -> usize {
    2
}

fn default_regular_testing_target() -> usize {
    20
}

fn default_appointment_threshold() -> f64 {
    30.0
}

fn default_review_threshold() -> f64 {
    15.0
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            food_trigger_threshold: default_food_trigger_threshold(),
            high_risk_food_threshold: default_high_risk_food_threshold(),
            activity_threshold: default_activity_threshold(),
            candidate_limit: default_candidate_limit(),
            surfaced_limit: default_surfaced_limit(),
            high_risk_period_threshold: default_high_risk_period_threshold(),
            trend_window: default_trend_window(),
            trend_delta: default_trend_delta(),
            min_trend_readings: default_min_trend_readings(),
            min_pattern_readings: default_min_pattern_readings(),
            frequent_symptom_count: default_frequent_symptom_count(),
            regular_testing_target: default_regular_testing_target(),
            appointment_threshold: default_appointment_threshold(),
            review_threshold: default_review_threshold(),
        }
    }
}

/// Abnormal-reading alert configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AlertConfig {
    /// Trailing window in days
    #[serde(default = "default_alert_window_days")]
    pub window_days: i64,

    /// Abnormal readings in the window needed to raise an alert
    #[serde(default = "default_alert_min_abnormal")]
    pub min_abnormal: usize,
}

fn default_alert_window_days() -> i64 {
    7
}

fn default_alert_min_abnormal() -> usize {
    3
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            window_days: default_alert_window_days(),
            min_abnormal: default_alert_min_abnormal(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("glucotrack").join("config.toml")),
            Some(PathBuf::from("/etc/glucotrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Logging overrides
        if let Ok(level) = std::env::var("GLUCOTRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GLUCOTRACK_LOG_FORMAT") {
            self.logging.format = format;
        }

        // Alert overrides
        if let Ok(days) = std::env::var("GLUCOTRACK_ALERT_WINDOW_DAYS") {
            if let Ok(d) = days.parse() {
                self.alerts.window_days = d;
            }
        }
        if let Ok(count) = std::env::var("GLUCOTRACK_ALERT_MIN_ABNORMAL") {
            if let Ok(c) = count.parse() {
                self.alerts.min_abnormal = c;
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Glucotrack Configuration
#
# Environment variables override these settings:
# - GLUCOTRACK_LOG_LEVEL
# - GLUCOTRACK_LOG_FORMAT
# - GLUCOTRACK_ALERT_WINDOW_DAYS
# - GLUCOTRACK_ALERT_MIN_ABNORMAL
#
# Classification bands (fasting 70/100/125, non-fasting 70/140/199) are fixed.

[analyzer]
# Minimum % of a food's readings that are abnormal for it to count as a trigger
food_trigger_threshold = 40.0

# Triggers above this % are high risk
high_risk_food_threshold = 60.0

# Minimum % for an activity to be reported
activity_threshold = 30.0

# Candidates considered per correlation before filtering
candidate_limit = 10

# Items named in a single recommendation
surfaced_limit = 3

# Abnormal rate % above which a time of day is high risk
high_risk_period_threshold = 40.0

# Readings compared at each end of the history for trend detection
trend_window = 7

# Mean difference in mg/dL needed to report a trend
trend_delta = 5.0

# Minimum readings for trend and pattern analysis
min_trend_readings = 2
min_pattern_readings = 5

# Occurrences before a symptom is called frequent
frequent_symptom_count = 2

# Below this many readings, recommend testing more regularly
regular_testing_target = 20

# Abnormal % thresholds for the overall recommendation
appointment_threshold = 30.0
review_threshold = 15.0

[alerts]
# Trailing window in days
window_days = 7

# Abnormal or borderline readings in the window needed to raise an alert
min_abnormal = 3

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_round_trips() {
        let parsed = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(parsed.analyzer, AnalyzerConfig::default());
        assert_eq!(parsed.alerts, AlertConfig::default());
        assert_eq!(parsed.logging.level, "info");
        assert_eq!(parsed.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::parse(
            r#"
[analyzer]
trend_window = 10

[logging]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(parsed.analyzer.trend_window, 10);
        assert_eq!(parsed.analyzer.food_trigger_threshold, 40.0);
        assert_eq!(parsed.alerts.min_abnormal, 3);
        assert_eq!(parsed.logging.format, "json");
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[alerts]\nwindow_days = 14").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.alerts.window_days, 14);
        assert_eq!(config.alerts.min_abnormal, 3);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analyzer\ntrend_window = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
