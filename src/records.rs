//! Storage-facing records
//!
//! Mappings the reading store applies to classifier output before
//! persisting it. The classifier keeps its four-way vocabulary; the
//! three-way collapse lives here so storage can change independently.

use crate::classifier::{ClassificationResult, ReadingStatus};
use crate::readings::StatusLabel;
use serde::{Deserialize, Serialize};

/// Three-way status used for storage, display and filtering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StoredStatus {
    Normal,
    Borderline,
    Abnormal,
}

impl From<ReadingStatus> for StoredStatus {
    fn from(status: ReadingStatus) -> Self {
        match status {
            ReadingStatus::Low | ReadingStatus::High => StoredStatus::Abnormal,
            ReadingStatus::Prediabetic => StoredStatus::Borderline,
            ReadingStatus::Normal => StoredStatus::Normal,
        }
    }
}

impl From<StatusLabel> for StoredStatus {
    fn from(status: StatusLabel) -> Self {
        match status {
            StatusLabel::Low | StatusLabel::High | StatusLabel::Abnormal => StoredStatus::Abnormal,
            StatusLabel::Prediabetic | StatusLabel::Borderline => StoredStatus::Borderline,
            StatusLabel::Normal => StoredStatus::Normal,
        }
    }
}

impl From<StoredStatus> for StatusLabel {
    fn from(status: StoredStatus) -> Self {
        match status {
            StoredStatus::Normal => StatusLabel::Normal,
            StoredStatus::Borderline => StatusLabel::Borderline,
            StoredStatus::Abnormal => StatusLabel::Abnormal,
        }
    }
}

impl StoredStatus {
    /// Whether the stored status should count toward alerting
    pub fn needs_attention(&self) -> bool {
        !matches!(self, StoredStatus::Normal)
    }
}

/// An AI insight row derived from a classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightRecord {
    /// e.g. "Reading: 180 mg/dL - prediabetic"
    pub pattern: String,
    /// Up to the first two insight messages, joined
    pub insight: String,
    pub suggestion: String,
    pub confidence: f64,
}

impl InsightRecord {
    /// Derive the insight row for a classified reading
    ///
    /// Returns `None` when the classification carries no insights, in which
    /// case nothing should be recorded.
    pub fn from_classification(value: f64, result: &ClassificationResult) -> Option<Self> {
        if result.insights.is_empty() {
            return None;
        }

        let insight = result
            .insights
            .iter()
            .take(2)
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let suggestion = result
            .insights
            .first()
            .map(|i| i.message.clone())
            .unwrap_or_else(|| "Continue monitoring".to_string());

        Some(Self {
            pattern: format!("Reading: {} mg/dL - {}", value, result.status),
            insight,
            suggestion,
            confidence: result.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, Insight, InsightKind, Priority, Severity};

    #[test]
    fn test_collapse_classifier_status() {
        assert_eq!(StoredStatus::from(ReadingStatus::Low), StoredStatus::Abnormal);
        assert_eq!(StoredStatus::from(ReadingStatus::High), StoredStatus::Abnormal);
        assert_eq!(StoredStatus::from(ReadingStatus::Prediabetic), StoredStatus::Borderline);
        assert_eq!(StoredStatus::from(ReadingStatus::Normal), StoredStatus::Normal);
    }

    #[test]
    fn test_collapse_is_idempotent_on_stored_labels() {
        for stored in [StoredStatus::Normal, StoredStatus::Borderline, StoredStatus::Abnormal] {
            assert_eq!(StoredStatus::from(StatusLabel::from(stored)), stored);
        }
    }

    #[test]
    fn test_insight_record_from_classification() {
        let result = classify(180.0, false, None, None, 12);
        let record = InsightRecord::from_classification(180.0, &result).unwrap();

        assert_eq!(record.pattern, "Reading: 180 mg/dL - prediabetic");
        assert_eq!(
            record.insight,
            "Reading is in prediabetic range (180 mg/dL). Lifestyle changes may help."
        );
        assert_eq!(record.suggestion, record.insight);
        assert_eq!(record.confidence, 0.90);
    }

    #[test]
    fn test_insight_record_joins_first_two_messages() {
        let insight = |message: &str| Insight {
            kind: InsightKind::Alert,
            message: message.to_string(),
            priority: Priority::High,
        };
        let result = ClassificationResult {
            status: ReadingStatus::High,
            severity: Severity::High,
            confidence: 0.9,
            insights: vec![insight("first"), insight("second"), insight("third")],
        };

        let record = InsightRecord::from_classification(250.0, &result).unwrap();
        assert_eq!(record.insight, "first; second");
        assert_eq!(record.suggestion, "first");
    }

    #[test]
    fn test_no_record_without_insights() {
        let mut result = classify(90.0, true, None, None, 12);
        result.insights.clear();
        assert!(InsightRecord::from_classification(90.0, &result).is_none());
    }
}
