//! Patient report composition

use super::trends::TrendAnalysis;
use super::AnalysisReport;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Report combining the analysis and trend for one patient
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: String,
    pub user_id: i64,
    /// RFC 3339
    pub generated_at: String,
    pub insights: AnalysisReport,
    pub trends: TrendAnalysis,
}

impl Report {
    pub fn new(
        user_id: i64,
        generated_at: DateTime<Utc>,
        insights: AnalysisReport,
        trends: TrendAnalysis,
    ) -> Self {
        let report_id = uuid::Uuid::new_v4().to_string();

        tracing::info!(
            report_id = %report_id,
            user_id,
            readings = insights.summary.total_readings,
            trend = ?trends.trend,
            "Generated report"
        );

        Self {
            report_id,
            user_id,
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            insights,
            trends,
        }
    }
}
