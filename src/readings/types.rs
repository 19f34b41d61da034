//! Core data types for glucose readings
//!
//! This module defines the vocabulary shared by the classifier and the analyzer:
//! - `Reading`: one timestamped blood-glucose measurement plus context
//! - `StatusLabel`: any status a stored reading may carry
//! - `TimePeriod`: fixed local-time windows used for time-of-day bucketing

use super::error::{ReadingError, ReadingResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// A single blood-glucose reading as handed over by the reading store
///
/// `value` is optional because stored rows can carry a missing or
/// non-numeric value; such rows count as readings but never contribute to
/// averages. `timestamp` is kept as the raw text so that a malformed value
/// only degrades the time-based sections of an analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Glucose value in mg/dL
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: Option<f64>,
    /// Whether the reading was taken fasting
    #[serde(default, deserialize_with = "lenient_flag")]
    pub fasting: bool,
    /// What was eaten before the reading
    #[serde(default, alias = "food_intake")]
    pub food_intake: Option<String>,
    /// Physical activity around the reading
    #[serde(default)]
    pub activity: Option<String>,
    /// When the reading was taken (local time)
    #[serde(default, alias = "reading_date", alias = "date_time")]
    pub timestamp: String,
    /// Symptoms reported with the reading
    #[serde(default, alias = "symptoms_notes")]
    pub symptoms_notes: Option<String>,
    /// Free-text note
    #[serde(default, alias = "additional_note", alias = "additionalNote")]
    pub notes: Option<String>,
    /// Status recorded for the reading, if classified
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<StatusLabel>,
}

impl Reading {
    /// Create a reading with a value and timestamp and no context
    pub fn new(value: f64, timestamp: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            fasting: false,
            food_intake: None,
            activity: None,
            timestamp: timestamp.into(),
            symptoms_notes: None,
            notes: None,
            status: None,
        }
    }

    /// Builder method: replace the value (use `None` for a missing value)
    pub fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = value;
        self
    }

    /// Builder method: set the fasting flag
    pub fn fasting(mut self, fasting: bool) -> Self {
        self.fasting = fasting;
        self
    }

    /// Builder method: set food intake
    pub fn food(mut self, food: impl Into<String>) -> Self {
        self.food_intake = Some(food.into());
        self
    }

    /// Builder method: set activity
    pub fn activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    /// Builder method: set symptoms
    pub fn symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.symptoms_notes = Some(symptoms.into());
        self
    }

    /// Builder method: set the free-text note
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method: set the recorded status
    pub fn status(mut self, status: impl Into<StatusLabel>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// The value if present and finite
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }

    /// Trimmed food intake, `None` when absent or blank
    pub fn food_label(&self) -> Option<&str> {
        non_blank(self.food_intake.as_deref())
    }

    /// Trimmed activity, `None` when absent or blank
    pub fn activity_label(&self) -> Option<&str> {
        non_blank(self.activity.as_deref())
    }

    /// Symptom text, falling back to the free-text note
    pub fn symptom_text(&self) -> Option<&str> {
        non_blank(self.symptoms_notes.as_deref()).or_else(|| non_blank(self.notes.as_deref()))
    }

    /// Whether the recorded status counts as abnormal
    pub fn is_abnormal(&self) -> bool {
        self.status.map(|s| s.is_flagged()).unwrap_or(false)
    }

    /// Parse the timestamp into a local date-time
    pub fn parsed_timestamp(&self) -> ReadingResult<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Status recorded against a reading
///
/// Covers both the four-way classifier vocabulary and the three-way storage
/// vocabulary, since histories can contain either.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    Low,
    Normal,
    Prediabetic,
    High,
    Borderline,
    Abnormal,
}

impl StatusLabel {
    /// Whether the status counts toward the abnormal percentage
    ///
    /// The set is {abnormal, borderline, high, low}. `Prediabetic` is not in
    /// it even though its storage form, `Borderline`, is.
    pub fn is_flagged(&self) -> bool {
        matches!(
            self,
            StatusLabel::Abnormal | StatusLabel::Borderline | StatusLabel::High | StatusLabel::Low
        )
    }

    /// Name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Low => "low",
            StatusLabel::Normal => "normal",
            StatusLabel::Prediabetic => "prediabetic",
            StatusLabel::High => "high",
            StatusLabel::Borderline => "borderline",
            StatusLabel::Abnormal => "abnormal",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusLabel {
    type Err = ReadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(StatusLabel::Low),
            "normal" => Ok(StatusLabel::Normal),
            "prediabetic" => Ok(StatusLabel::Prediabetic),
            "high" => Ok(StatusLabel::High),
            "borderline" => Ok(StatusLabel::Borderline),
            "abnormal" => Ok(StatusLabel::Abnormal),
            _ => Err(ReadingError::UnknownStatus(s.to_string())),
        }
    }
}

/// Fixed local-time windows for time-of-day analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    /// 06:00 - 11:59
    Morning,
    /// 12:00 - 17:59
    Afternoon,
    /// 18:00 - 21:59
    Evening,
    /// 22:00 - 05:59, wrapping midnight
    Night,
}

impl TimePeriod {
    /// Bucket an hour of day (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimePeriod::Morning,
            12..=17 => TimePeriod::Afternoon,
            18..=21 => TimePeriod::Evening,
            _ => TimePeriod::Night,
        }
    }

    /// Bucket a local date-time
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self::from_hour(timestamp.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Morning => "morning",
            TimePeriod::Afternoon => "afternoon",
            TimePeriod::Evening => "evening",
            TimePeriod::Night => "night",
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a reading timestamp into local wall-clock time
///
/// Accepts RFC 3339 (offset kept as wall clock), RFC 2822 as emitted by
/// JSON encoders of HTTP date headers, SQL-style date-times with optional
/// fractional seconds, and bare dates (midnight).
pub fn parse_timestamp(raw: &str) -> ReadingResult<NaiveDateTime> {
    let text = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_local());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt.naive_local());
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(ReadingError::MalformedTimestamp(raw.to_string()))
}

/// Accept numbers, numeric strings and null; anything else becomes missing
fn lenient_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Accept booleans, 0/1 and "true"/"false"; null is false
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        serde_json::Value::String(s) => parse_flag(&s),
        _ => false,
    })
}

/// Interpret common textual booleans
pub fn parse_flag(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "t"
    )
}

/// Unknown or absent statuses are treated as unclassified
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<StatusLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}
