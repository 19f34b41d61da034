//! Abnormal Reading Alerts
//!
//! Raises an alert when too many readings in a trailing window carry an
//! abnormal or borderline status. Delivery (email, specialist
//! notification) belongs to the caller.

use crate::config::AlertConfig;
use crate::readings::Reading;
use crate::records::StoredStatus;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// An alert to be recorded and delivered
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub reason: String,
    pub abnormal_count: usize,
    pub window_days: i64,
}

/// Threshold rule over recent readings
#[derive(Debug, Clone, Default)]
pub struct AlertRule {
    config: AlertConfig,
}

impl AlertRule {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    /// Readings in the window whose stored status needs attention
    ///
    /// Unclassified readings and readings with malformed timestamps are not
    /// counted. A window reaching past the representable date range covers
    /// every reading.
    pub fn abnormal_count(&self, readings: &[Reading], now: NaiveDateTime) -> usize {
        let cutoff = Duration::try_days(self.config.window_days)
            .and_then(|window| now.checked_sub_signed(window));

        readings
            .iter()
            .filter(|r| {
                r.status
                    .map(|s| StoredStatus::from(s).needs_attention())
                    .unwrap_or(false)
            })
            .filter(|r| match r.parsed_timestamp() {
                Ok(at) => cutoff.map_or(true, |cutoff| at >= cutoff),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring reading for alerting");
                    false
                }
            })
            .count()
    }

    /// Evaluate the rule, returning an alert when the threshold is reached
    pub fn evaluate(&self, readings: &[Reading], now: NaiveDateTime) -> Option<Alert> {
        let count = self.abnormal_count(readings, now);
        if count < self.config.min_abnormal {
            return None;
        }

        tracing::info!(abnormal_count = count, "Alert threshold reached");

        Some(Alert {
            reason: format!(
                "{} abnormal readings in last {} days",
                count, self.config.window_days
            ),
            abnormal_count: count,
            window_days: self.config.window_days,
        })
    }
}
