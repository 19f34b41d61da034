//! Pattern Detection
//!
//! Weekly, meal, variability and consistency patterns over a reading
//! history. Sections that depend on timestamps come back as `None` when a
//! timestamp cannot be parsed; the remaining sections are unaffected.

use super::summary::{mean, sample_std_dev, Tally};
use super::timestamped;
use chrono::{Datelike, Weekday};
use serde::Serialize;

use crate::readings::Reading;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Result of pattern identification
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PatternAnalysis {
    /// Too few readings for pattern detection
    InsufficientData(InsufficientData),
    Found(PatternReport),
}

impl PatternAnalysis {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, PatternAnalysis::InsufficientData(_))
    }

    pub fn report(&self) -> Option<&PatternReport> {
        match self {
            PatternAnalysis::Found(report) => Some(report),
            PatternAnalysis::InsufficientData(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InsufficientData {
    pub message: String,
    pub required: usize,
    pub available: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub weekly_patterns: Option<WeeklyPattern>,
    pub meal_patterns: MealPattern,
    pub variability: Option<Variability>,
    pub consistency: Option<Consistency>,
}

impl PatternReport {
    pub fn compute(readings: &[Reading]) -> Self {
        Self {
            weekly_patterns: weekly_pattern(readings),
            meal_patterns: meal_pattern(readings),
            variability: variability(readings),
            consistency: consistency(readings),
        }
    }
}

/// Mean value for one day of the week
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayAverage {
    pub day: String,
    pub readings: usize,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPattern {
    /// Monday first; days without numeric values are left out
    pub day_averages: Vec<DayAverage>,
    pub best_day: String,
    pub worst_day: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPattern {
    pub with_meal_readings: usize,
    pub without_meal_readings: usize,
    pub with_meal_average: Option<f64>,
    pub without_meal_average: Option<f64>,
    /// with-meal mean minus without-meal mean
    pub difference: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variability {
    pub standard_deviation: Option<f64>,
    /// Standard deviation as a percentage of the mean
    pub coefficient_of_variation: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyLevel {
    High,
    Medium,
    Low,
}

impl ConsistencyLevel {
    /// high below 48h between readings, medium below 96h
    pub fn from_mean_gap(hours: f64) -> Self {
        if hours < 48.0 {
            ConsistencyLevel::High
        } else if hours < 96.0 {
            ConsistencyLevel::Medium
        } else {
            ConsistencyLevel::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Consistency {
    pub average_gap_hours: f64,
    pub max_gap_hours: f64,
    pub consistency: ConsistencyLevel,
}

/// Full English weekday name
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Per-weekday means with the best (lowest) and worst (highest) day
///
/// Ties go to the day earliest in the week.
pub fn weekly_pattern(readings: &[Reading]) -> Option<WeeklyPattern> {
    let stamped = timestamped(readings, "weekly_patterns")?;

    let mut days = [Tally::default(); 7];
    for (at, reading) in stamped {
        days[at.weekday().num_days_from_monday() as usize].add(reading);
    }

    let day_averages: Vec<DayAverage> = WEEK
        .iter()
        .zip(days.iter())
        .filter_map(|(day, tally)| {
            tally.mean().map(|average| DayAverage {
                day: day_name(*day).to_string(),
                readings: tally.total,
                average,
            })
        })
        .collect();

    let mut best = day_averages.first()?;
    let mut worst = best;
    for day in &day_averages[1..] {
        if day.average < best.average {
            best = day;
        }
        if day.average > worst.average {
            worst = day;
        }
    }

    Some(WeeklyPattern {
        best_day: best.day.clone(),
        worst_day: worst.day.clone(),
        day_averages,
    })
}

/// Readings with food intake against readings without
pub fn meal_pattern(readings: &[Reading]) -> MealPattern {
    let (with_meal, without_meal): (Vec<&Reading>, Vec<&Reading>) =
        readings.iter().partition(|r| r.food_label().is_some());

    let with_tally = Tally::over(with_meal);
    let without_tally = Tally::over(without_meal);
    let with_meal_average = with_tally.mean();
    let without_meal_average = without_tally.mean();

    MealPattern {
        with_meal_readings: with_tally.total,
        without_meal_readings: without_tally.total,
        with_meal_average,
        without_meal_average,
        difference: with_meal_average
            .zip(without_meal_average)
            .map(|(meal, none)| meal - none),
    }
}

/// Spread of numeric values; `None` when there are none
pub fn variability(readings: &[Reading]) -> Option<Variability> {
    let values: Vec<f64> = readings.iter().filter_map(Reading::numeric_value).collect();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = mean(&values)?;
    let standard_deviation = sample_std_dev(&values);

    Some(Variability {
        standard_deviation,
        coefficient_of_variation: standard_deviation
            .filter(|_| avg != 0.0)
            .map(|sd| sd / avg * 100.0),
        min,
        max,
        range: max - min,
    })
}

/// Regularity of testing from gaps between consecutive readings
pub fn consistency(readings: &[Reading]) -> Option<Consistency> {
    let mut times: Vec<_> = timestamped(readings, "consistency")?
        .into_iter()
        .map(|(at, _)| at)
        .collect();
    times.sort();

    let gaps: Vec<f64> = times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 3600.0)
        .collect();

    let average_gap_hours = mean(&gaps)?;
    let max_gap_hours = gaps.iter().copied().fold(0.0, f64::max);

    Some(Consistency {
        average_gap_hours,
        max_gap_hours,
        consistency: ConsistencyLevel::from_mean_gap(average_gap_hours),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-15 is a Monday
    fn on(day: u32, hour: u32, value: f64) -> Reading {
        Reading::new(value, format!("2024-01-{:02} {:02}:00:00", day, hour))
    }

    #[test]
    fn test_weekly_best_and_worst_day() {
        let readings = vec![
            on(15, 8, 120.0), // Monday
            on(15, 20, 140.0),
            on(16, 8, 100.0), // Tuesday
            on(20, 8, 180.0), // Saturday
        ];

        let weekly = weekly_pattern(&readings).unwrap();
        assert_eq!(weekly.day_averages.len(), 3);
        assert_eq!(weekly.day_averages[0].day, "Monday");
        assert_eq!(weekly.day_averages[0].average, 130.0);
        assert_eq!(weekly.day_averages[0].readings, 2);
        assert_eq!(weekly.best_day, "Tuesday");
        assert_eq!(weekly.worst_day, "Saturday");
    }

    #[test]
    fn test_weekly_ties_go_to_earliest_day() {
        let readings = vec![on(17, 8, 110.0), on(15, 8, 110.0), on(19, 8, 110.0)];
        let weekly = weekly_pattern(&readings).unwrap();
        assert_eq!(weekly.best_day, "Monday");
        assert_eq!(weekly.worst_day, "Monday");
    }

    #[test]
    fn test_weekly_degrades_on_malformed_timestamp() {
        let readings = vec![on(15, 8, 110.0), Reading::new(120.0, "last tuesday")];
        assert!(weekly_pattern(&readings).is_none());
    }

    #[test]
    fn test_meal_pattern_difference() {
        let readings = vec![
            on(15, 8, 160.0).food("pasta"),
            on(15, 12, 180.0).food("burger"),
            on(15, 18, 100.0),
            on(15, 22, 110.0).food(" "),
        ];

        let meal = meal_pattern(&readings);
        assert_eq!(meal.with_meal_readings, 2);
        assert_eq!(meal.without_meal_readings, 2);
        assert_eq!(meal.with_meal_average, Some(170.0));
        assert_eq!(meal.without_meal_average, Some(105.0));
        assert_eq!(meal.difference, Some(65.0));
    }

    #[test]
    fn test_meal_pattern_one_sided() {
        let readings = vec![on(15, 8, 100.0), on(16, 8, 120.0)];
        let meal = meal_pattern(&readings);
        assert_eq!(meal.with_meal_average, None);
        assert_eq!(meal.difference, None);
    }

    #[test]
    fn test_variability() {
        let readings = vec![
            on(15, 8, 2.0),
            on(15, 9, 4.0),
            on(15, 10, 4.0),
            on(15, 11, 4.0),
            on(15, 12, 5.0),
            on(15, 13, 5.0),
            on(15, 14, 7.0),
            on(15, 15, 9.0),
            Reading::new(0.0, "2024-01-15 16:00:00").with_value(None),
        ];

        let spread = variability(&readings).unwrap();
        let sd = spread.standard_deviation.unwrap();
        assert!((sd - 2.138089935).abs() < 1e-6);
        assert!((spread.coefficient_of_variation.unwrap() - sd / 5.0 * 100.0).abs() < 1e-9);
        assert_eq!(spread.min, 2.0);
        assert_eq!(spread.max, 9.0);
        assert_eq!(spread.range, 7.0);
    }

    #[test]
    fn test_variability_without_values() {
        let readings = vec![Reading::new(0.0, "2024-01-15").with_value(None)];
        assert!(variability(&readings).is_none());
    }

    #[test]
    fn test_consistency_sorts_before_measuring_gaps() {
        let readings = vec![on(17, 8, 100.0), on(15, 8, 100.0), on(16, 8, 100.0)];
        let result = consistency(&readings).unwrap();
        assert_eq!(result.average_gap_hours, 24.0);
        assert_eq!(result.max_gap_hours, 24.0);
        assert_eq!(result.consistency, ConsistencyLevel::High);
    }

    #[test]
    fn test_consistency_levels() {
        assert_eq!(ConsistencyLevel::from_mean_gap(47.9), ConsistencyLevel::High);
        assert_eq!(ConsistencyLevel::from_mean_gap(48.0), ConsistencyLevel::Medium);
        assert_eq!(ConsistencyLevel::from_mean_gap(95.9), ConsistencyLevel::Medium);
        assert_eq!(ConsistencyLevel::from_mean_gap(96.0), ConsistencyLevel::Low);

        let sparse = vec![on(1, 8, 100.0), on(11, 8, 100.0)];
        let result = consistency(&sparse).unwrap();
        assert_eq!(result.average_gap_hours, 240.0);
        assert_eq!(result.consistency, ConsistencyLevel::Low);
    }

    #[test]
    fn test_consistency_needs_two_readings() {
        assert!(consistency(&[on(15, 8, 100.0)]).is_none());
        assert!(consistency(&[on(15, 8, 100.0), Reading::new(1.0, "??")]).is_none());
    }
}
