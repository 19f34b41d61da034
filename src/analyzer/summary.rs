//! Summary statistics and the shared accumulator

use crate::readings::Reading;
use serde::Serialize;

/// Headline numbers for a reading history
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_readings: usize,
    /// Mean of numeric values; `None` when no reading has one
    pub average_value: Option<f64>,
    /// Share of readings with a flagged status, 0-100
    pub abnormal_percentage: f64,
}

impl Summary {
    pub fn from_readings(readings: &[Reading]) -> Self {
        let tally = Tally::over(readings.iter());
        Self {
            total_readings: tally.total,
            average_value: tally.mean(),
            abnormal_percentage: tally.abnormal_rate(),
        }
    }
}

/// Count and sum accumulator for one group of readings
///
/// `total` counts every reading; `valued` and `sum` only cover readings with
/// a numeric value, so missing values never drag a mean toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Tally {
    pub total: usize,
    pub abnormal: usize,
    pub valued: usize,
    pub sum: f64,
}

impl Tally {
    pub fn over<'a>(readings: impl IntoIterator<Item = &'a Reading>) -> Self {
        let mut tally = Self::default();
        for reading in readings {
            tally.add(reading);
        }
        tally
    }

    pub fn add(&mut self, reading: &Reading) {
        self.total += 1;
        if reading.is_abnormal() {
            self.abnormal += 1;
        }
        if let Some(value) = reading.numeric_value() {
            self.valued += 1;
            self.sum += value;
        }
    }

    pub fn mean(&self) -> Option<f64> {
        if self.valued == 0 {
            None
        } else {
            Some(self.sum / self.valued as f64)
        }
    }

    /// Abnormal share of all readings, 0-100
    pub fn abnormal_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.abnormal as f64 / self.total as f64 * 100.0
        }
    }
}

/// Arithmetic mean of a slice, `None` when empty
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1), `None` below two values
pub(crate) fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
