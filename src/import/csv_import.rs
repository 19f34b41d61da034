//! CSV Import
//!
//! Maps CSV columns to reading fields by header name. Header matching
//! ignores case, spaces and underscores, so `food_intake`, `Food Intake`
//! and `foodIntake` all land in the same field.

use super::ImportError;
use crate::readings::{parse_flag, Reading, StatusLabel};
use std::io::Read;
use std::path::Path;

/// Result of a CSV import operation
#[derive(Debug)]
pub struct CsvImportResult {
    pub readings: Vec<Reading>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    /// Row-level problems; rows with soft problems are still imported
    pub errors: Vec<String>,
}

/// Column positions for each reading field
#[derive(Debug, Default)]
struct ColumnMap {
    value: Option<usize>,
    timestamp: Option<usize>,
    /// Separate date and time columns, joined when no timestamp column exists
    date: Option<usize>,
    time: Option<usize>,
    fasting: Option<usize>,
    food_intake: Option<usize>,
    activity: Option<usize>,
    symptoms_notes: Option<usize>,
    notes: Option<usize>,
    status: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let mut map = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let key: String = header
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '_')
                .collect::<String>()
                .to_lowercase();

            let slot = match key.as_str() {
                "value" | "glucose" | "reading" => &mut map.value,
                "timestamp" | "readingdate" | "datetime" => &mut map.timestamp,
                "date" => &mut map.date,
                "time" => &mut map.time,
                "fasting" => &mut map.fasting,
                "foodintake" | "food" | "meal" => &mut map.food_intake,
                "activity" => &mut map.activity,
                "symptomsnotes" | "symptoms" => &mut map.symptoms_notes,
                "notes" | "note" | "additionalnote" => &mut map.notes,
                "status" => &mut map.status,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }

        if map.value.is_none() {
            return Err(ImportError::MissingColumn("value".to_string()));
        }
        if map.timestamp.is_none() && map.date.is_none() {
            return Err(ImportError::MissingColumn("timestamp".to_string()));
        }

        Ok(map)
    }
}

/// CSV file importer
#[derive(Debug)]
pub struct CsvImporter {
    /// Maximum row errors kept in the result
    error_limit: usize,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvImporter {
    pub fn new() -> Self {
        Self {
            error_limit: 100,
        }
    }

    /// Keep at most `limit` row errors
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }

    /// Import readings from a CSV file
    pub fn import(&self, path: &Path) -> Result<CsvImportResult, ImportError> {
        let file = std::fs::File::open(path)?;
        self.import_reader(file)
    }

    /// Import from a CSV string (useful for testing)
    pub fn import_str(&self, csv_data: &str) -> Result<CsvImportResult, ImportError> {
        self.import_reader(csv_data.as_bytes())
    }

    fn import_reader<R: Read>(&self, source: R) -> Result<CsvImportResult, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let columns = ColumnMap::from_headers(reader.headers()?)?;

        let mut readings = Vec::new();
        let mut rows_processed = 0;
        let mut rows_failed = 0;
        let mut errors = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            let actual_line = line_num + 2;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                    continue;
                }
            };

            let field = |idx: Option<usize>| -> Option<String> {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };

            let raw_value = field(columns.value);
            let value = raw_value.as_deref().and_then(|v| v.parse::<f64>().ok());
            if let (Some(raw), None) = (&raw_value, value) {
                errors.push(format!("Line {}: non-numeric value {:?}", actual_line, raw));
            }

            let status = match field(columns.status) {
                Some(raw) => match raw.parse::<StatusLabel>() {
                    Ok(status) => Some(status),
                    Err(e) => {
                        errors.push(format!("Line {}: {}", actual_line, e));
                        None
                    }
                },
                None => None,
            };

            readings.push(Reading {
                value: value.filter(|v| v.is_finite()),
                fasting: field(columns.fasting)
                    .map(|f| parse_flag(&f))
                    .unwrap_or(false),
                food_intake: field(columns.food_intake),
                activity: field(columns.activity),
                timestamp: field(columns.timestamp)
                    .or_else(|| match (field(columns.date), field(columns.time)) {
                        (Some(date), Some(time)) => Some(format!("{} {}", date, time)),
                        (date, _) => date,
                    })
                    .unwrap_or_default(),
                symptoms_notes: field(columns.symptoms_notes),
                notes: field(columns.notes),
                status,
            });
            rows_processed += 1;
        }

        if errors.len() > self.error_limit {
            let total = errors.len();
            errors.truncate(self.error_limit);
            errors.push(format!("... and {} more errors", total - self.error_limit));
        }

        Ok(CsvImportResult {
            readings,
            rows_processed,
            rows_failed,
            errors,
        })
    }
}
