//! Trend Detection
//!
//! Compares the mean of the most recent readings with the mean of the
//! earliest ones. With fewer than two full windows of history the windows
//! overlap; that is accepted rather than narrowed.

use super::summary::Tally;
use crate::config::AnalyzerConfig;
use crate::readings::Reading;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    InsufficientData,
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub older_average: Option<f64>,
}

impl TrendAnalysis {
    fn insufficient() -> Self {
        Self {
            trend: Trend::InsufficientData,
            message: "Need more data".to_string(),
            recent_average: None,
            older_average: None,
        }
    }
}

/// Detect the direction of a reading history
///
/// Readings are put in timestamp order when every timestamp parses;
/// otherwise the caller's order is taken as chronological.
pub fn analyze_trends(readings: &[Reading], config: &AnalyzerConfig) -> TrendAnalysis {
    if readings.len() < config.min_trend_readings.max(2) {
        return TrendAnalysis::insufficient();
    }

    let ordered = chronological(readings);

    // Windows are cut over readings; missing values only thin a window out
    let window = config.trend_window.max(1);
    let head = &ordered[..window.min(ordered.len())];
    let tail = &ordered[ordered.len().saturating_sub(window)..];
    let older = Tally::over(head.iter().copied()).mean();
    let recent = Tally::over(tail.iter().copied()).mean();

    let (Some(recent), Some(older)) = (recent, older) else {
        return TrendAnalysis::insufficient();
    };

    let (trend, message) = if recent > older + config.trend_delta {
        (Trend::Increasing, "Blood sugar trending up")
    } else if recent < older - config.trend_delta {
        (Trend::Decreasing, "Blood sugar trending down")
    } else {
        (Trend::Stable, "Blood sugar is stable")
    };

    tracing::debug!(?trend, recent, older, "Computed trend");

    TrendAnalysis {
        trend,
        message: message.to_string(),
        recent_average: Some(recent),
        older_average: Some(older),
    }
}

fn chronological(readings: &[Reading]) -> Vec<&Reading> {
    let parsed: Result<Vec<_>, _> = readings
        .iter()
        .map(|r| r.parsed_timestamp().map(|at| (at, r)))
        .collect();

    match parsed {
        Ok(mut stamped) => {
            stamped.sort_by_key(|(at, _)| *at);
            stamped.into_iter().map(|(_, r)| r).collect()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Using input order for trend");
            readings.iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(values: &[f64]) -> Vec<Reading> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Reading::new(v, format!("2024-01-{:02} 08:00:00", i + 1)))
            .collect()
    }

    #[test]
    fn test_increasing_trend() {
        let mut values = vec![100.0; 7];
        values.extend(vec![130.0; 7]);

        let result = analyze_trends(&history(&values), &AnalyzerConfig::default());
        assert_eq!(result.trend, Trend::Increasing);
        assert_eq!(result.recent_average, Some(130.0));
        assert_eq!(result.older_average, Some(100.0));
        assert_eq!(result.message, "Blood sugar trending up");
    }

    #[test]
    fn test_trend_uses_timestamps_over_input_order() {
        let mut values = vec![100.0; 7];
        values.extend(vec![130.0; 7]);
        let mut readings = history(&values);
        readings.reverse();

        let result = analyze_trends(&readings, &AnalyzerConfig::default());
        assert_eq!(result.trend, Trend::Increasing);
    }

    #[test]
    fn test_decreasing_and_stable() {
        let config = AnalyzerConfig {
            trend_window: 3,
            ..AnalyzerConfig::default()
        };

        let falling = history(&[180.0, 175.0, 170.0, 120.0, 115.0, 110.0]);
        assert_eq!(analyze_trends(&falling, &config).trend, Trend::Decreasing);

        // Difference of exactly 5 is not a trend
        let single_window = AnalyzerConfig {
            trend_window: 1,
            ..AnalyzerConfig::default()
        };
        let flat = history(&[100.0, 105.0]);
        assert_eq!(analyze_trends(&flat, &single_window).trend, Trend::Stable);
    }

    #[test]
    fn test_windows_count_readings_without_values() {
        let mut readings = history(&[100.0; 7]);
        for day in 8..=13 {
            readings.push(Reading::new(0.0, format!("2024-01-{:02} 08:00:00", day)).with_value(None));
        }
        readings.push(Reading::new(130.0, "2024-01-14 08:00:00"));

        let result = analyze_trends(&readings, &AnalyzerConfig::default());
        assert_eq!(result.trend, Trend::Increasing);
        assert_eq!(result.recent_average, Some(130.0));
        assert_eq!(result.older_average, Some(100.0));
    }

    #[test]
    fn test_window_without_values_is_insufficient() {
        let mut readings: Vec<Reading> = (1..=7)
            .map(|day| Reading::new(0.0, format!("2024-01-{:02} 08:00:00", day)).with_value(None))
            .collect();
        readings.extend((8..=14).map(|day| Reading::new(120.0, format!("2024-01-{:02} 08:00:00", day))));

        let result = analyze_trends(&readings, &AnalyzerConfig::default());
        assert_eq!(result.trend, Trend::InsufficientData);
    }

    #[test]
    fn test_overlapping_windows_under_fourteen_readings() {
        // All three readings fall in both windows, so the means match
        let result = analyze_trends(&history(&[100.0, 150.0, 200.0]), &AnalyzerConfig::default());
        assert_eq!(result.trend, Trend::Stable);
    }

    #[test]
    fn test_insufficient_data() {
        let config = AnalyzerConfig::default();
        assert_eq!(analyze_trends(&[], &config).trend, Trend::InsufficientData);

        let single = analyze_trends(&history(&[120.0]), &config);
        assert_eq!(single.trend, Trend::InsufficientData);
        assert_eq!(single.message, "Need more data");

        let valueless = vec![
            Reading::new(0.0, "2024-01-01").with_value(None),
            Reading::new(0.0, "2024-01-02").with_value(None),
        ];
        assert_eq!(analyze_trends(&valueless, &config).trend, Trend::InsufficientData);
    }

    #[test]
    fn test_malformed_timestamps_fall_back_to_input_order() {
        let mut readings = history(&[100.0, 100.0, 100.0, 140.0, 140.0, 140.0]);
        readings[0].timestamp = "garbage".to_string();
        let config = AnalyzerConfig {
            trend_window: 3,
            ..AnalyzerConfig::default()
        };

        assert_eq!(analyze_trends(&readings, &config).trend, Trend::Increasing);
    }

    #[test]
    fn test_trend_serializes_snake_case() {
        let json = serde_json::to_value(analyze_trends(&[], &AnalyzerConfig::default())).unwrap();
        assert_eq!(json["trend"], "insufficient_data");
        assert!(json.get("recentAverage").is_none());
    }
}
