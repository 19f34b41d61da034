//! Reading Classifier
//!
//! Rule-based classification of a single glucose reading into a clinical
//! status, with one actionable insight per reading.
//!
//! Fasting and non-fasting readings use separate bands:
//!
//! ```text
//!              low     normal      prediabetic   high
//! fasting      < 70    70..=100    101..=125     > 125
//! non-fasting  < 70    70..=140    141..=199     >= 200
//! ```
//!
//! Upper bounds are inclusive for the lower band. There is no validation or
//! clamping: every numeric input maps to a status.

use crate::readings::StatusLabel;
use serde::{Deserialize, Serialize};

/// Confidence reported by the rule-based path. Not a calibrated probability.
pub const RULE_CONFIDENCE: f64 = 0.90;

/// Four-way clinical status produced by the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Low,
    Normal,
    Prediabetic,
    High,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Low => "low",
            ReadingStatus::Normal => "normal",
            ReadingStatus::Prediabetic => "prediabetic",
            ReadingStatus::High => "high",
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ReadingStatus> for StatusLabel {
    fn from(status: ReadingStatus) -> Self {
        match status {
            ReadingStatus::Low => StatusLabel::Low,
            ReadingStatus::Normal => StatusLabel::Normal,
            ReadingStatus::Prediabetic => StatusLabel::Prediabetic,
            ReadingStatus::High => StatusLabel::High,
        }
    }
}

/// Clinical severity of a classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Priority shared by insights and recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Kind of per-reading insight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Alert,
    Warning,
    Success,
}

/// An actionable message attached to a classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    pub priority: Priority,
}

/// Classifier output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub status: ReadingStatus,
    pub severity: Severity,
    pub confidence: f64,
    /// Highest priority first
    pub insights: Vec<Insight>,
}

/// A reading submitted for classification
///
/// Context fields are accepted for interface stability; the rule-based path
/// only looks at `value` and `fasting`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    pub value: f64,
    #[serde(default)]
    pub fasting: bool,
    #[serde(default)]
    pub food_intake: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    /// Hour of day the reading was submitted (0-23)
    #[serde(default = "default_time_of_day")]
    pub time_of_day: u32,
}

fn default_time_of_day() -> u32 {
    12
}

impl ClassificationRequest {
    pub fn new(value: f64, fasting: bool) -> Self {
        Self {
            value,
            fasting,
            food_intake: None,
            activity: None,
            time_of_day: default_time_of_day(),
        }
    }

    /// Classify this request
    pub fn classify(&self) -> ClassificationResult {
        classify(
            self.value,
            self.fasting,
            self.food_intake.as_deref(),
            self.activity.as_deref(),
            self.time_of_day,
        )
    }
}

/// Classify a reading
pub fn classify(
    value: f64,
    fasting: bool,
    food_intake: Option<&str>,
    activity: Option<&str>,
    time_of_day: u32,
) -> ClassificationResult {
    let (status, severity) = if fasting {
        fasting_band(value)
    } else {
        non_fasting_band(value)
    };

    tracing::trace!(
        value,
        fasting,
        food_intake = food_intake.unwrap_or(""),
        activity = activity.unwrap_or(""),
        time_of_day,
        status = %status,
        "Classified reading"
    );

    ClassificationResult {
        status,
        severity,
        confidence: RULE_CONFIDENCE,
        insights: vec![insight_for(status, value)],
    }
}

fn fasting_band(value: f64) -> (ReadingStatus, Severity) {
    if value < 70.0 {
        (ReadingStatus::Low, Severity::High)
    } else if value <= 100.0 {
        (ReadingStatus::Normal, Severity::Low)
    } else if value <= 125.0 {
        (ReadingStatus::Prediabetic, Severity::Medium)
    } else {
        (ReadingStatus::High, Severity::High)
    }
}

fn non_fasting_band(value: f64) -> (ReadingStatus, Severity) {
    if value < 70.0 {
        (ReadingStatus::Low, Severity::High)
    } else if value <= 140.0 {
        (ReadingStatus::Normal, Severity::Low)
    } else if value <= 199.0 {
        (ReadingStatus::Prediabetic, Severity::Medium)
    } else {
        (ReadingStatus::High, Severity::High)
    }
}

fn insight_for(status: ReadingStatus, value: f64) -> Insight {
    let (kind, message, priority) = match status {
        ReadingStatus::Low => (
            InsightKind::Alert,
            format!("Blood sugar is low ({} mg/dL). Consume 15-20g of carbs.", value),
            Priority::High,
        ),
        ReadingStatus::High => (
            InsightKind::Alert,
            format!(
                "Blood sugar is elevated ({} mg/dL). Monitor and consult doctor.",
                value
            ),
            Priority::High,
        ),
        ReadingStatus::Prediabetic => (
            InsightKind::Warning,
            format!(
                "Reading is in prediabetic range ({} mg/dL). Lifestyle changes may help.",
                value
            ),
            Priority::Medium,
        ),
        ReadingStatus::Normal => (
            InsightKind::Success,
            format!("Blood sugar is normal ({} mg/dL). Keep it up!", value),
            Priority::Low,
        ),
    };

    Insight {
        kind,
        message,
        priority,
    }
}
