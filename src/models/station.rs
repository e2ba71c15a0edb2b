use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fields recognised in the metadata header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaField {
    RegionCode,
    StateCode,
    StationName,
    StationCode,
    Latitude,
    Longitude,
    Altitude,
    StartDate,
}

/// Parsed header of one export file. Never persisted as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    pub region_code: String,
    pub state_code: String,
    pub station_name: String,

    #[validate(length(min = 1))]
    pub station_code: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub altitude: f64,
    pub start_date: Option<String>,
    pub city_name: Option<String>,
}

impl StationMetadata {
    /// City to file the station under, falling back to the station name
    pub fn resolved_city_name(&self) -> &str {
        match self.city_name.as_deref() {
            Some(city) if !city.is_empty() => city,
            _ => &self.station_name,
        }
    }
}
