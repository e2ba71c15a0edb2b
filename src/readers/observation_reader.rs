use crate::error::{IngestError, Result};
use crate::models::{MeasurementField, Measurements, ObservationRow, ObservationTable, TableStats};
use crate::readers::encoding::{read_decoded, skip_lines};
use crate::utils::constants::{
    measurement_field_for, DATE_COLUMN, DATE_FORMATS, DELIMITER, META_ROWS, TIME_COLUMN,
    TIME_FORMATS, TIME_ZONE_SUFFIX,
};
use crate::utils::normalize::normalize_token;
use crate::utils::numbers::{parse_cell, CellValue};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::path::Path;

/// Positions of the interesting columns in the table header
struct ColumnLayout {
    date: usize,
    time: usize,
    measurements: Vec<(usize, MeasurementField)>,
    dropped: Vec<String>,
}

pub struct ObservationReader {
    skip_rows: usize,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            skip_rows: META_ROWS,
        }
    }

    /// Read the observation table that follows the metadata header
    pub fn read_observations(&self, path: &Path) -> Result<ObservationTable> {
        let text = read_decoded(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let table = self.parse_table(skip_lines(&text, self.skip_rows), &file_name)?;

        if table.stats.unparsable_cells > 0 {
            tracing::warn!(
                "{}: {} unparsable cells treated as missing",
                file_name,
                table.stats.unparsable_cells
            );
        }
        tracing::debug!(
            "{}: {} rows kept, {} empty, {} with invalid timestamps",
            file_name,
            table.rows.len(),
            table.stats.empty_rows,
            table.stats.invalid_timestamps
        );

        Ok(table)
    }

    /// Parse a `;`-delimited table whose first line is the column header
    pub fn parse_table(&self, body: &str, file_name: &str) -> Result<ObservationTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        let layout = self.resolve_columns(&headers, file_name)?;

        let mut stats = TableStats {
            dropped_columns: layout.dropped.clone(),
            ..TableStats::default()
        };
        let mut rows = Vec::new();

        for record in reader.records() {
            let record = record?;
            stats.total_rows += 1;

            let mut measurements = Measurements::default();
            for (idx, field) in &layout.measurements {
                match parse_cell(record.get(*idx).unwrap_or("")) {
                    CellValue::Value(v) => measurements.set(*field, Some(v)),
                    CellValue::Missing => {}
                    CellValue::Unparsable => stats.unparsable_cells += 1,
                }
            }

            if measurements.is_empty() {
                stats.empty_rows += 1;
                continue;
            }

            let date = record.get(layout.date).unwrap_or("");
            let time = record.get(layout.time).unwrap_or("");
            let Some(datetime) = parse_timestamp(date, time) else {
                stats.invalid_timestamps += 1;
                continue;
            };

            rows.push(ObservationRow {
                datetime,
                measurements,
            });
        }

        Ok(ObservationTable {
            columns: layout.measurements.iter().map(|(_, f)| *f).collect(),
            rows,
            stats,
        })
    }

    fn resolve_columns(&self, headers: &csv::StringRecord, file_name: &str) -> Result<ColumnLayout> {
        let mut date = None;
        let mut time = None;
        let mut measurements: Vec<(usize, MeasurementField)> = Vec::new();
        let mut dropped = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            if header.trim().is_empty() {
                continue;
            }

            let name = normalize_token(header);
            if name == DATE_COLUMN {
                date.get_or_insert(idx);
            } else if name == TIME_COLUMN {
                time.get_or_insert(idx);
            } else if let Some(field) = measurement_field_for(&name) {
                if !measurements.iter().any(|(_, f)| *f == field) {
                    measurements.push((idx, field));
                }
            } else {
                dropped.push(name);
            }
        }

        match (date, time) {
            (Some(date), Some(time)) => Ok(ColumnLayout {
                date,
                time,
                measurements,
                dropped,
            }),
            _ => {
                let mut missing = Vec::new();
                if date.is_none() {
                    missing.push(DATE_COLUMN.to_string());
                }
                if time.is_none() {
                    missing.push(TIME_COLUMN.to_string());
                }
                Err(IngestError::MissingRequiredColumns {
                    file: file_name.to_string(),
                    missing,
                })
            }
        }
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine the date and time cells into a UTC timestamp.
///
/// Accepts `2000-05-07` + `00:00` and `2020/01/01` + `0000 UTC`.
pub fn parse_timestamp(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    let time = time.trim();
    let time = time.strip_suffix(TIME_ZONE_SUFFIX).unwrap_or(time).trim();

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())?;

    Some(date.and_time(time).and_utc())
}
