use crate::error::{IngestError, Result};
use crate::models::{MetaField, StationMetadata};
use crate::readers::encoding::read_leading_lines;
use crate::utils::constants::{meta_field_for, META_ROWS};
use crate::utils::filename::infer_city_name;
use crate::utils::normalize::{normalize_token, title_case};
use crate::utils::numbers::parse_coordinate;
use std::collections::HashMap;
use std::path::Path;
use validator::Validate;

pub struct MetadataReader {
    header_rows: usize,
}

impl MetadataReader {
    pub fn new() -> Self {
        Self {
            header_rows: META_ROWS,
        }
    }

    /// Read the station metadata header of an export file
    pub fn read_metadata(&self, path: &Path) -> Result<StationMetadata> {
        let lines = read_leading_lines(path, self.header_rows)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let values = self.collect_fields(&lines);
        let mut metadata = self.build_metadata(&values, &file_name)?;
        metadata.city_name = infer_city_name(path);

        tracing::debug!(?metadata, "Parsed metadata of {}", file_name);
        Ok(metadata)
    }

    /// Map header lines to known fields. Lines that are not `label;value` or
    /// whose label is unknown are skipped, since headers drift across years.
    fn collect_fields(&self, lines: &[String]) -> HashMap<MetaField, String> {
        let mut values = HashMap::new();

        for line in lines {
            let Some((label, value)) = self.parse_header_line(line) else {
                continue;
            };
            if let Some(field) = meta_field_for(&label) {
                values.insert(field, value);
            }
        }

        values
    }

    /// Split `LABEL:;value` into the normalized label and the trimmed value
    fn parse_header_line(&self, line: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = line.trim().splitn(2, ';').collect();
        if parts.len() != 2 {
            return None;
        }

        let label = normalize_token(parts[0].trim_end().trim_end_matches(':'));
        Some((label, parts[1].trim().to_string()))
    }

    fn build_metadata(
        &self,
        values: &HashMap<MetaField, String>,
        file_name: &str,
    ) -> Result<StationMetadata> {
        let get = |field: MetaField| values.get(&field).map(String::as_str).unwrap_or("");

        let station_code = get(MetaField::StationCode);
        if station_code.is_empty() {
            return Err(IngestError::MissingStationCode {
                file: file_name.to_string(),
            });
        }

        let coordinate = |field: MetaField| {
            parse_coordinate(get(field)).map_err(|_| {
                IngestError::InvalidCoordinate(format!(
                    "{:?} '{}' in {}",
                    field,
                    get(field),
                    file_name
                ))
            })
        };

        let metadata = StationMetadata {
            region_code: get(MetaField::RegionCode).to_uppercase(),
            state_code: get(MetaField::StateCode).to_uppercase(),
            station_name: title_case(get(MetaField::StationName)),
            station_code: station_code.to_uppercase(),
            latitude: coordinate(MetaField::Latitude)?,
            longitude: coordinate(MetaField::Longitude)?,
            altitude: coordinate(MetaField::Altitude)?,
            start_date: values
                .get(&MetaField::StartDate)
                .filter(|s| !s.is_empty())
                .cloned(),
            city_name: None,
        };

        metadata.validate()?;
        Ok(metadata)
    }
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self::new()
    }
}
