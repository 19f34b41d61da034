//! Recommendation Synthesis
//!
//! Turns correlations and the summary into an ordered list of
//! recommendations. Pattern-derived entries come first in a fixed order,
//! followed by the overall status entry.

use super::correlations::{Correlations, Impact, RiskLevel};
use super::summary::Summary;
use crate::classifier::Priority;
use crate::config::AnalyzerConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Diet,
    Activity,
    Timing,
    Symptoms,
    General,
    Monitoring,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub actionable: bool,
}

impl Recommendation {
    fn new(
        category: RecommendationCategory,
        priority: Priority,
        title: &str,
        message: String,
    ) -> Self {
        Self {
            category,
            priority,
            title: title.to_string(),
            message,
            actionable: true,
        }
    }
}

/// Build recommendations for one patient
pub fn synthesize(
    summary: &Summary,
    correlations: &Correlations,
    config: &AnalyzerConfig,
) -> Vec<Recommendation> {
    let surfaced = config.surfaced_limit;
    let mut recommendations = Vec::new();

    // Triggers arrive ranked by strength; only the strongest few are named
    let top_foods = &correlations.food_triggers
        [..surfaced.min(correlations.food_triggers.len())];

    let high_risk_foods = names(
        top_foods
            .iter()
            .filter(|f| f.risk_level == RiskLevel::High)
            .map(|f| f.item.as_str()),
        surfaced,
    );
    if !high_risk_foods.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Diet,
            Priority::High,
            "Limit high-risk foods",
            format!(
                "Readings after {} are frequently abnormal. Consider reducing these foods or discussing alternatives with your specialist.",
                high_risk_foods
            ),
        ));
    }

    let medium_risk_foods = names(
        top_foods
            .iter()
            .filter(|f| f.risk_level == RiskLevel::Medium)
            .map(|f| f.item.as_str()),
        surfaced,
    );
    if !medium_risk_foods.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Diet,
            Priority::Medium,
            "Watch portion sizes",
            format!(
                "{} sometimes coincide with abnormal readings. Try smaller portions or pairing them with fiber and protein.",
                capitalize(&medium_risk_foods)
            ),
        ));
    }

    let beneficial = names(
        correlations
            .activity_impacts
            .iter()
            .filter(|a| a.impact == Impact::Beneficial)
            .map(|a| a.item.as_str()),
        surfaced,
    );
    if !beneficial.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Activity,
            Priority::High,
            "Keep up helpful activities",
            format!(
                "Your readings average lower around {}. Keeping these in your routine may help your control.",
                beneficial
            ),
        ));
    }

    let detrimental = names(
        correlations
            .activity_impacts
            .iter()
            .filter(|a| a.impact == Impact::Detrimental)
            .map(|a| a.item.as_str()),
        surfaced,
    );
    if !detrimental.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Activity,
            Priority::Medium,
            "Review activity timing",
            format!(
                "Your readings average higher around {}. Check glucose before and after these activities.",
                detrimental
            ),
        ));
    }

    let risky_periods = names(
        correlations
            .time_patterns
            .iter()
            .filter(|(_, stats)| stats.abnormal_rate > config.high_risk_period_threshold)
            .map(|(period, _)| period.as_str()),
        usize::MAX,
    );
    if !risky_periods.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Timing,
            Priority::High,
            "Monitor high-risk times",
            format!(
                "Abnormal readings are common in the {}. Test more often at these times.",
                risky_periods
            ),
        ));
    }

    let frequent_symptoms = names(
        correlations
            .symptom_associations
            .iter()
            .filter(|s| s.occurrences >= config.frequent_symptom_count)
            .map(|s| s.symptom.as_str()),
        surfaced,
    );
    if !frequent_symptoms.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Symptoms,
            Priority::High,
            "Discuss recurring symptoms",
            format!(
                "{} keep appearing with abnormal readings. Mention them at your next appointment.",
                capitalize(&frequent_symptoms)
            ),
        ));
    }

    if summary.total_readings > 0 {
        recommendations.push(general_status(summary, config));

        if summary.total_readings < config.regular_testing_target {
            recommendations.push(Recommendation::new(
                RecommendationCategory::Monitoring,
                Priority::Medium,
                "Test regularly",
                format!(
                    "Only {} readings are on record. Regular testing gives more reliable insights.",
                    summary.total_readings
                ),
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationCategory::General,
            Priority::Low,
            "Keep tracking",
            "Continue logging readings with meals and activities so patterns can be identified."
                .to_string(),
        ));
    }

    recommendations
}

fn general_status(summary: &Summary, config: &AnalyzerConfig) -> Recommendation {
    let pct = summary.abnormal_percentage;

    if pct > config.appointment_threshold {
        Recommendation::new(
            RecommendationCategory::General,
            Priority::High,
            "Schedule an appointment",
            format!(
                "{:.0}% of your readings are outside the normal range. Schedule an appointment with your specialist.",
                pct
            ),
        )
    } else if pct > config.review_threshold {
        Recommendation::new(
            RecommendationCategory::General,
            Priority::Medium,
            "Review your patterns",
            format!(
                "{:.0}% of your readings are outside the normal range. Review the patterns above for likely causes.",
                pct
            ),
        )
    } else {
        Recommendation {
            actionable: false,
            ..Recommendation::new(
                RecommendationCategory::General,
                Priority::Low,
                "Good control",
                "Most of your readings are in range. Keep up your current routine.".to_string(),
            )
        }
    }
}

/// Join up to `limit` distinct names (case-insensitive) as "a, b and c"
fn names<'a>(items: impl Iterator<Item = &'a str>, limit: usize) -> String {
    let mut unique: Vec<&str> = Vec::new();
    for item in items {
        if unique.len() == limit {
            break;
        }
        if !unique.iter().any(|u| u.eq_ignore_ascii_case(item)) {
            unique.push(item);
        }
    }
    let items = unique;
    match items.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
