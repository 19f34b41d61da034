//! Reading Analyzer
//!
//! Descriptive analysis of one patient's reading history:
//!
//! - **summary**: totals, mean value and abnormal percentage
//! - **correlations**: food, activity, time-of-day and symptom correlations
//! - **patterns**: weekly, meal, variability and consistency patterns
//! - **trends**: recent vs. earliest reading means
//! - **recommendations**: prioritized recommendations from the above
//! - **report**: full report composition
//!
//! All entry points borrow an in-memory snapshot and never mutate it.
//! Insufficient data is reported through result shapes, not errors, and
//! timestamp-dependent sections degrade to empty on malformed timestamps.
//!
//! # Example
//!
//! ```rust
//! use glucotrack::analyzer::Analyzer;
//! use glucotrack::readings::{Reading, StatusLabel};
//!
//! let readings = vec![
//!     Reading::new(95.0, "2024-01-15 07:30:00").fasting(true).status(StatusLabel::Normal),
//!     Reading::new(182.0, "2024-01-15 13:10:00").food("pizza").status(StatusLabel::Borderline),
//! ];
//!
//! let analyzer = Analyzer::default();
//! let report = analyzer.analyze(&readings);
//! assert_eq!(report.summary.total_readings, 2);
//! assert_eq!(report.summary.abnormal_percentage, 50.0);
//! ```

pub mod correlations;
pub mod patterns;
pub mod recommendations;
pub mod report;
pub mod summary;
pub mod trends;

pub use correlations::{
    ActivityImpact, Correlations, FoodTrigger, Impact, PeriodStats, RiskLevel,
    SymptomAssociation, SymptomSource, SYMPTOM_KEYWORDS,
};
pub use patterns::{
    Consistency, ConsistencyLevel, DayAverage, InsufficientData, MealPattern, PatternAnalysis,
    PatternReport, Variability, WeeklyPattern,
};
pub use recommendations::{Recommendation, RecommendationCategory};
pub use report::Report;
pub use summary::Summary;
pub use trends::{Trend, TrendAnalysis};

use crate::config::AnalyzerConfig;
use crate::readings::Reading;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Correlation and recommendation report for one patient
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: Summary,
    pub correlations: Correlations,
    pub personalized_recommendations: Vec<Recommendation>,
}

/// Stateless analyzer parameterised by thresholds
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Summary, correlations and recommendations
    ///
    /// An empty history yields a zero summary, empty correlations and a
    /// single "keep tracking" recommendation.
    pub fn analyze(&self, readings: &[Reading]) -> AnalysisReport {
        tracing::debug!(readings = readings.len(), "Analyzing readings");

        let summary = Summary::from_readings(readings);
        let correlations = Correlations::compute(readings, &self.config);
        let personalized_recommendations =
            recommendations::synthesize(&summary, &correlations, &self.config);

        AnalysisReport {
            summary,
            correlations,
            personalized_recommendations,
        }
    }

    /// Direction of the history; needs at least two readings
    pub fn analyze_trends(&self, readings: &[Reading]) -> TrendAnalysis {
        trends::analyze_trends(readings, &self.config)
    }

    /// Weekly, meal, variability and consistency patterns
    pub fn identify_patterns(&self, readings: &[Reading]) -> PatternAnalysis {
        let required = self.config.min_pattern_readings;
        if readings.len() < required {
            return PatternAnalysis::InsufficientData(InsufficientData {
                message: format!(
                    "Need at least {} readings for pattern analysis; have {}",
                    required,
                    readings.len()
                ),
                required,
                available: readings.len(),
            });
        }

        PatternAnalysis::Found(PatternReport::compute(readings))
    }

    /// Analysis plus trend for a patient, stamped with the current time
    pub fn generate_report(&self, user_id: i64, readings: &[Reading]) -> Report {
        self.generate_report_at(user_id, readings, Utc::now())
    }

    /// Same as [`Analyzer::generate_report`] with an explicit generation time
    pub fn generate_report_at(
        &self,
        user_id: i64,
        readings: &[Reading],
        generated_at: DateTime<Utc>,
    ) -> Report {
        Report::new(
            user_id,
            generated_at,
            self.analyze(readings),
            self.analyze_trends(readings),
        )
    }
}

/// Pair each reading with its parsed timestamp
///
/// Returns `None` (after logging) if any timestamp is malformed, so the
/// calling section can degrade to empty without failing the report.
pub(crate) fn timestamped<'a>(
    readings: &'a [Reading],
    section: &str,
) -> Option<Vec<(NaiveDateTime, &'a Reading)>> {
    let parsed: Result<Vec<_>, _> = readings
        .iter()
        .map(|r| r.parsed_timestamp().map(|at| (at, r)))
        .collect();

    match parsed {
        Ok(stamped) => Some(stamped),
        Err(e) => {
            tracing::warn!(section, error = %e, "Skipping section with malformed timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readings::StatusLabel;

    fn history() -> Vec<Reading> {
        vec![
            Reading::new(92.0, "2024-01-15 07:00:00").fasting(true).status(StatusLabel::Normal),
            Reading::new(210.0, "2024-01-15 13:00:00")
                .food("pizza")
                .status(StatusLabel::High),
            Reading::new(205.0, "2024-01-16 13:30:00")
                .food("pizza")
                .symptoms("headache")
                .status(StatusLabel::High),
            Reading::new(118.0, "2024-01-16 19:00:00")
                .activity("walking")
                .status(StatusLabel::Normal),
            Reading::new(64.0, "2024-01-17 23:30:00")
                .activity("walking")
                .symptoms("headache")
                .status(StatusLabel::Low),
        ]
    }

    #[test]
    fn test_analyze_empty_history() {
        let report = Analyzer::default().analyze(&[]);
        assert_eq!(report.summary.total_readings, 0);
        assert_eq!(report.summary.average_value, None);
        assert!(report.correlations.food_triggers.is_empty());
        assert!(report.correlations.time_patterns.is_empty());
        assert_eq!(report.personalized_recommendations.len(), 1);
        assert_eq!(report.personalized_recommendations[0].title, "Keep tracking");
    }

    #[test]
    fn test_analyze_full_history() {
        let report = Analyzer::default().analyze(&history());

        assert_eq!(report.summary.total_readings, 5);
        assert_eq!(report.summary.abnormal_percentage, 60.0);

        let pizza = &report.correlations.food_triggers[0];
        assert_eq!(pizza.item, "pizza");
        assert_eq!(pizza.correlation_strength, 100.0);
        assert_eq!(pizza.risk_level, RiskLevel::High);

        let walking = &report.correlations.activity_impacts[0];
        assert_eq!(walking.item, "walking");
        assert_eq!(walking.correlation_strength, 50.0);
        assert_eq!(walking.impact, Impact::Beneficial);

        assert_eq!(report.correlations.time_patterns.len(), 4);

        let titles: Vec<&str> = report
            .personalized_recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles[0], "Limit high-risk foods");
        assert!(titles.contains(&"Schedule an appointment"));
        assert!(titles.contains(&"Discuss recurring symptoms"));
    }

    #[test]
    fn test_malformed_timestamp_only_degrades_time_sections() {
        let mut readings = history();
        readings[2].timestamp = "sometime tuesday".to_string();
        let analyzer = Analyzer::default();

        let report = analyzer.analyze(&readings);
        assert!(report.correlations.time_patterns.is_empty());
        assert_eq!(report.summary.total_readings, 5);
        assert!(!report.correlations.food_triggers.is_empty());

        let patterns = analyzer.identify_patterns(&readings);
        let found = patterns.report().unwrap();
        assert!(found.weekly_patterns.is_none());
        assert!(found.consistency.is_none());
        assert!(found.variability.is_some());
        assert_eq!(found.meal_patterns.with_meal_readings, 2);
    }

    #[test]
    fn test_identify_patterns_needs_five_readings() {
        let analyzer = Analyzer::default();
        let readings = history();

        let short = analyzer.identify_patterns(&readings[..4]);
        assert!(short.is_insufficient());
        let json = serde_json::to_value(&short).unwrap();
        assert!(json["message"].as_str().unwrap().starts_with("Need at least 5 readings"));

        let enough = analyzer.identify_patterns(&readings);
        assert!(!enough.is_insufficient());
        let json = serde_json::to_value(&enough).unwrap();
        assert!(json.get("weeklyPatterns").is_some());
        assert!(json.get("mealPatterns").is_some());
    }

    #[test]
    fn test_trends_and_patterns_do_not_mutate_input() {
        let analyzer = Analyzer::default();
        let readings = history();
        let snapshot = readings.clone();

        let first = (analyzer.analyze_trends(&readings), analyzer.identify_patterns(&readings));
        let second = (analyzer.analyze_trends(&readings), analyzer.identify_patterns(&readings));

        assert_eq!(readings, snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let json = serde_json::to_value(Analyzer::default().analyze(&history())).unwrap();
        assert!(json["summary"]["totalReadings"].is_number());
        assert!(json["correlations"]["foodTriggers"].is_array());
        assert_eq!(json["correlations"]["foodTriggers"][0]["riskLevel"], "high");
        assert!(json["correlations"]["timePatterns"]["night"].is_object());
        assert!(json["personalizedRecommendations"].is_array());
    }
}
