use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeasurementField {
    Precipitation,
    AtmosphericPressure,
    PrevMaxPressure,
    PrevMinPressure,
    GlobalRadiation,
    AirTemperature,
    DewPointTemperature,
    MaxTemperature,
    MinTemperature,
    MaxDewPointTemperature,
    MinDewPointTemperature,
    MaxRelativeHumidity,
    MinRelativeHumidity,
    RelativeHumidity,
    WindDirection,
    MaxWindGust,
    WindSpeed,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 17] = [
        MeasurementField::Precipitation,
        MeasurementField::AtmosphericPressure,
        MeasurementField::PrevMaxPressure,
        MeasurementField::PrevMinPressure,
        MeasurementField::GlobalRadiation,
        MeasurementField::AirTemperature,
        MeasurementField::DewPointTemperature,
        MeasurementField::MaxTemperature,
        MeasurementField::MinTemperature,
        MeasurementField::MaxDewPointTemperature,
        MeasurementField::MinDewPointTemperature,
        MeasurementField::MaxRelativeHumidity,
        MeasurementField::MinRelativeHumidity,
        MeasurementField::RelativeHumidity,
        MeasurementField::WindDirection,
        MeasurementField::MaxWindGust,
        MeasurementField::WindSpeed,
    ];

    /// Column name in the `observations` table
    pub fn column(&self) -> &'static str {
        match self {
            MeasurementField::Precipitation => "precipitation",
            MeasurementField::AtmosphericPressure => "atmospheric_pressure",
            MeasurementField::PrevMaxPressure => "prev_max_pressure",
            MeasurementField::PrevMinPressure => "prev_min_pressure",
            MeasurementField::GlobalRadiation => "global_radiation",
            MeasurementField::AirTemperature => "air_temperature",
            MeasurementField::DewPointTemperature => "dew_point_temperature",
            MeasurementField::MaxTemperature => "max_temperature",
            MeasurementField::MinTemperature => "min_temperature",
            MeasurementField::MaxDewPointTemperature => "max_dew_point_temperature",
            MeasurementField::MinDewPointTemperature => "min_dew_point_temperature",
            MeasurementField::MaxRelativeHumidity => "max_relative_humidity",
            MeasurementField::MinRelativeHumidity => "min_relative_humidity",
            MeasurementField::RelativeHumidity => "relative_humidity",
            MeasurementField::WindDirection => "wind_direction",
            MeasurementField::MaxWindGust => "max_wind_gust",
            MeasurementField::WindSpeed => "wind_speed",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            MeasurementField::Precipitation => "mm",
            MeasurementField::AtmosphericPressure
            | MeasurementField::PrevMaxPressure
            | MeasurementField::PrevMinPressure => "mB",
            MeasurementField::GlobalRadiation => "kJ/m²",
            MeasurementField::AirTemperature
            | MeasurementField::DewPointTemperature
            | MeasurementField::MaxTemperature
            | MeasurementField::MinTemperature
            | MeasurementField::MaxDewPointTemperature
            | MeasurementField::MinDewPointTemperature => "°C",
            MeasurementField::MaxRelativeHumidity
            | MeasurementField::MinRelativeHumidity
            | MeasurementField::RelativeHumidity => "%",
            MeasurementField::WindDirection => "°",
            MeasurementField::MaxWindGust | MeasurementField::WindSpeed => "m/s",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.column(), self.units())
    }
}

/// The 17 optional hourly measurements. `None` means "not observed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    values: [Option<f64>; 17],
}

impl Measurements {
    pub fn get(&self, field: MeasurementField) -> Option<f64> {
        self.values[field.index()]
    }

    pub fn set(&mut self, field: MeasurementField, value: Option<f64>) {
        self.values[field.index()] = value;
    }

    pub fn with(mut self, field: MeasurementField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn observed_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Values in `MeasurementField::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementField, Option<f64>)> + '_ {
        MeasurementField::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }
}

/// One normalized row of the observation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub datetime: DateTime<Utc>,
    pub measurements: Measurements,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStats {
    pub total_rows: usize,
    pub empty_rows: usize,
    pub invalid_timestamps: usize,
    pub unparsable_cells: usize,
    pub dropped_columns: Vec<String>,
}

impl TableStats {
    pub fn dropped_rows(&self) -> usize {
        self.empty_rows + self.invalid_timestamps
    }
}

/// Observation table of one file: `datetime` plus whichever measurement
/// columns the source carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    pub columns: Vec<MeasurementField>,
    pub rows: Vec<ObservationRow>,
    pub stats: TableStats,
}

impl ObservationTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_field_order_matches_index() {
        for (i, field) in MeasurementField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_measurements_get_set() {
        let mut m = Measurements::default();
        assert!(m.is_empty());

        m.set(MeasurementField::Precipitation, Some(0.2));
        assert_eq!(m.get(MeasurementField::Precipitation), Some(0.2));
        assert_eq!(m.get(MeasurementField::WindSpeed), None);
        assert_eq!(m.observed_count(), 1);
        assert!(!m.is_empty());

        m.set(MeasurementField::Precipitation, None);
        assert!(m.is_empty());
    }

    #[test]
    fn test_measurement_display() {
        assert_eq!(MeasurementField::WindSpeed.to_string(), "wind_speed (m/s)");
        assert_eq!(MeasurementField::AirTemperature.units(), "°C");
    }
}
