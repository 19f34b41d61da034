//! Context Correlations
//!
//! Relates reading context (food, activity, time of day, symptoms) to
//! abnormal readings. Correlation strength here is a plain co-occurrence
//! rate: the share of a context value's readings that carry a flagged
//! status, on a 0-100 scale.
//!
//! Activity impact compares the activity's own mean against the overall
//! mean. It is a heuristic, not a causal or significance-tested result.

use super::summary::Tally;
use super::timestamped;
use crate::config::AnalyzerConfig;
use crate::readings::{Reading, TimePeriod};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Free-text keywords scanned for in symptom notes
pub const SYMPTOM_KEYWORDS: [&str; 8] = [
    "stress", "tired", "sick", "pain", "headache", "dizzy", "nausea", "fatigue",
];

const REPORTED_SYMPTOM_LIMIT: usize = 5;
const SYMPTOM_LIMIT: usize = 10;

/// All correlation sections of an analysis
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Correlations {
    pub food_triggers: Vec<FoodTrigger>,
    pub activity_impacts: Vec<ActivityImpact>,
    /// Empty when any timestamp is malformed
    pub time_patterns: BTreeMap<TimePeriod, PeriodStats>,
    pub symptom_associations: Vec<SymptomAssociation>,
}

impl Correlations {
    pub fn compute(readings: &[Reading], config: &AnalyzerConfig) -> Self {
        Self {
            food_triggers: food_triggers(readings, config),
            activity_impacts: activity_impacts(readings, config),
            time_patterns: time_patterns(readings),
            symptom_associations: symptom_associations(readings),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Medium,
    High,
}

/// A food that frequently coincides with abnormal readings
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodTrigger {
    pub item: String,
    pub abnormal_count: usize,
    pub total_count: usize,
    pub correlation_strength: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Beneficial,
    Detrimental,
}

/// An activity that coincides with abnormal readings
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityImpact {
    pub item: String,
    pub abnormal_count: usize,
    pub total_count: usize,
    pub correlation_strength: f64,
    pub impact: Impact,
    pub avg_reading: Option<f64>,
}

/// Per time-of-day statistics
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub total_readings: usize,
    pub abnormal_readings: usize,
    pub abnormal_rate: f64,
    pub avg_value: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SymptomSource {
    /// Exact symptom text as entered
    Reported,
    /// Keyword found inside free text
    Keyword,
}

/// A symptom seen alongside abnormal readings
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAssociation {
    pub symptom: String,
    pub occurrences: usize,
    pub source: SymptomSource,
}

/// Context value with its abnormal/total tally
struct Candidate<'a> {
    item: &'a str,
    tally: Tally,
}

impl Candidate<'_> {
    fn strength(&self) -> f64 {
        self.tally.abnormal_rate()
    }
}

/// Group readings by a context label and keep the most frequent abnormal ones
///
/// Candidates are the labels seen on abnormal readings, ranked by abnormal
/// count (ties by label) and cut to `limit` before any strength filtering.
fn ranked_candidates<'a>(
    readings: &'a [Reading],
    label: impl Fn(&'a Reading) -> Option<&'a str>,
    limit: usize,
) -> Vec<Candidate<'a>> {
    let mut groups: HashMap<&'a str, Tally> = HashMap::new();
    for reading in readings {
        if let Some(item) = label(reading) {
            groups.entry(item).or_default().add(reading);
        }
    }

    let mut candidates: Vec<Candidate<'a>> = groups
        .into_iter()
        .filter(|(_, tally)| tally.abnormal > 0)
        .map(|(item, tally)| Candidate { item, tally })
        .collect();

    candidates.sort_by(|a, b| {
        b.tally
            .abnormal
            .cmp(&a.tally.abnormal)
            .then_with(|| a.item.cmp(b.item))
    });
    candidates.truncate(limit);
    candidates
}

fn by_strength_desc(candidates: &mut [Candidate<'_>]) {
    candidates.sort_by(|a, b| {
        b.strength()
            .partial_cmp(&a.strength())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Foods whose readings are abnormal more than the trigger threshold
pub fn food_triggers(readings: &[Reading], config: &AnalyzerConfig) -> Vec<FoodTrigger> {
    let mut candidates = ranked_candidates(readings, Reading::food_label, config.candidate_limit);
    candidates.retain(|c| c.strength() > config.food_trigger_threshold);
    by_strength_desc(&mut candidates);

    candidates
        .into_iter()
        .map(|c| {
            let strength = c.strength();
            FoodTrigger {
                item: c.item.to_string(),
                abnormal_count: c.tally.abnormal,
                total_count: c.tally.total,
                correlation_strength: strength,
                risk_level: if strength > config.high_risk_food_threshold {
                    RiskLevel::High
                } else {
                    RiskLevel::Medium
                },
            }
        })
        .collect()
}

/// Activities whose readings are abnormal more than the activity threshold
pub fn activity_impacts(readings: &[Reading], config: &AnalyzerConfig) -> Vec<ActivityImpact> {
    let overall = Tally::over(readings).mean();

    let mut candidates =
        ranked_candidates(readings, Reading::activity_label, config.candidate_limit);
    candidates.retain(|c| c.strength() > config.activity_threshold);
    by_strength_desc(&mut candidates);

    candidates
        .into_iter()
        .map(|c| {
            let avg_reading = c.tally.mean();
            let impact = match (avg_reading, overall) {
                (Some(own), Some(all)) if own < all => Impact::Beneficial,
                _ => Impact::Detrimental,
            };
            ActivityImpact {
                item: c.item.to_string(),
                abnormal_count: c.tally.abnormal,
                total_count: c.tally.total,
                correlation_strength: c.strength(),
                impact,
                avg_reading,
            }
        })
        .collect()
}

/// Abnormal rates per time of day; empty buckets are omitted
pub fn time_patterns(readings: &[Reading]) -> BTreeMap<TimePeriod, PeriodStats> {
    let Some(stamped) = timestamped(readings, "time_patterns") else {
        return BTreeMap::new();
    };

    let mut buckets: BTreeMap<TimePeriod, Tally> = BTreeMap::new();
    for (at, reading) in stamped {
        buckets.entry(TimePeriod::of(&at)).or_default().add(reading);
    }

    buckets
        .into_iter()
        .map(|(period, tally)| {
            (
                period,
                PeriodStats {
                    total_readings: tally.total,
                    abnormal_readings: tally.abnormal,
                    abnormal_rate: tally.abnormal_rate(),
                    avg_value: tally.mean(),
                },
            )
        })
        .collect()
}

/// Symptoms reported with abnormal readings
///
/// Combines the most frequent exact symptom entries with a keyword scan of
/// all free text on those readings.
pub fn symptom_associations(readings: &[Reading]) -> Vec<SymptomAssociation> {
    let abnormal: Vec<&Reading> = readings.iter().filter(|r| r.is_abnormal()).collect();

    let mut reported: HashMap<&str, usize> = HashMap::new();
    for reading in &abnormal {
        if let Some(text) = reading.symptom_text() {
            *reported.entry(text).or_insert(0) += 1;
        }
    }

    let mut reported: Vec<(&str, usize)> = reported.into_iter().collect();
    reported.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    reported.truncate(REPORTED_SYMPTOM_LIMIT);

    let mut associations: Vec<SymptomAssociation> = reported
        .into_iter()
        .map(|(symptom, occurrences)| SymptomAssociation {
            symptom: symptom.to_string(),
            occurrences,
            source: SymptomSource::Reported,
        })
        .collect();

    let texts: Vec<String> = abnormal.iter().map(|r| free_text(r)).collect();
    for keyword in SYMPTOM_KEYWORDS {
        let occurrences = texts.iter().filter(|t| t.contains(keyword)).count();
        if occurrences > 0 {
            associations.push(SymptomAssociation {
                symptom: keyword.to_string(),
                occurrences,
                source: SymptomSource::Keyword,
            });
        }
    }

    // Stable sort keeps reported entries ahead of keyword hits on ties
    associations.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    associations.truncate(SYMPTOM_LIMIT);
    associations
}

/// Lower-cased symptoms and note text of one reading
fn free_text(reading: &Reading) -> String {
    [reading.symptoms_notes.as_deref(), reading.notes.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
