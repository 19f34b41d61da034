//! # Glucotrack
//!
//! Blood-glucose reading classification and insight engine.
//!
//! ## Features
//!
//! - **Rule-based classification**: fasting and non-fasting bands with one
//!   actionable insight per reading
//! - **Correlation analysis**: food, activity, time-of-day and symptom
//!   associations with abnormal readings
//! - **Pattern detection**: weekly, meal, variability and testing consistency
//! - **Recommendations**: prioritized, personalized recommendations
//! - **Alerts**: abnormal-reading threshold rule over a trailing window
//!
//! ## Modules
//!
//! - [`readings`]: Reading model, status vocabulary, timestamp parsing
//! - [`classifier`]: Per-reading classification
//! - [`analyzer`]: History analysis and reports
//! - [`records`]: Storage-facing status collapse and insight records
//! - [`alerts`]: Abnormal-reading alert rule
//! - [`import`]: CSV and JSON reading import
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use glucotrack::{classify, Analyzer, Reading, ReadingStatus, StoredStatus};
//!
//! let result = classify(132.0, true, Some("toast"), None, 7);
//! assert_eq!(result.status, ReadingStatus::High);
//! assert_eq!(StoredStatus::from(result.status), StoredStatus::Abnormal);
//!
//! let readings = vec![
//!     Reading::new(132.0, "2024-01-15 07:00:00").fasting(true).status(result.status),
//!     Reading::new(118.0, "2024-01-16 07:05:00").fasting(true),
//! ];
//! let trend = Analyzer::default().analyze_trends(&readings);
//! println!("{}", trend.message);
//! ```
//!
//! Classification and analysis are pure, synchronous computations over
//! data the caller has already fetched. Nothing in this crate performs
//! network or database I/O.

pub mod alerts;
pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod import;
pub mod readings;
pub mod records;

// Re-export top-level types for convenience
pub use readings::{Reading, ReadingError, ReadingResult, StatusLabel, TimePeriod};

pub use classifier::{
    classify, ClassificationRequest, ClassificationResult, Insight, InsightKind, Priority,
    ReadingStatus, Severity, RULE_CONFIDENCE,
};

pub use analyzer::{
    AnalysisReport, Analyzer, Correlations, PatternAnalysis, PatternReport, Recommendation,
    Report, Summary, Trend, TrendAnalysis,
};

pub use records::{InsightRecord, StoredStatus};

pub use alerts::{Alert, AlertRule};

pub use import::{load_readings, CsvImporter, ImportError};

pub use config::{AlertConfig, AnalyzerConfig, Config, ConfigError, LoggingConfig};
