use crate::models::{
    City, MeasurementField, Measurements, Observation, RecordId, Region, State, Station,
};
use crate::store::keyed::KeyedEntity;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

/// Canonical text form of observation timestamps; the natural key compares on it
pub fn timestamp_value(datetime: &DateTime<Utc>) -> Value {
    Value::Text(datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn optional_real(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::Real)
}

impl KeyedEntity for Region {
    type Key = str;

    const TABLE: &'static str = "regions";
    const KEY_COLUMNS: &'static [&'static str] = &["code"];
    const VALUE_COLUMNS: &'static [&'static str] = &["name"];

    fn key_values(code: &str) -> Vec<Value> {
        vec![text(code)]
    }

    fn natural_key_values(&self) -> Vec<Value> {
        vec![text(&self.code)]
    }

    fn attribute_values(&self) -> Vec<Value> {
        vec![text(&self.name)]
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Region {
            code: row.get(offset)?,
            name: row.get(offset + 1)?,
        })
    }
}

impl KeyedEntity for State {
    type Key = str;

    const TABLE: &'static str = "states";
    const KEY_COLUMNS: &'static [&'static str] = &["code"];
    const VALUE_COLUMNS: &'static [&'static str] = &["name", "region_id"];

    fn key_values(code: &str) -> Vec<Value> {
        vec![text(code)]
    }

    fn natural_key_values(&self) -> Vec<Value> {
        vec![text(&self.code)]
    }

    fn attribute_values(&self) -> Vec<Value> {
        vec![text(&self.name), Value::Integer(self.region_id)]
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(State {
            code: row.get(offset)?,
            name: row.get(offset + 1)?,
            region_id: row.get(offset + 2)?,
        })
    }
}

impl KeyedEntity for City {
    /// (name, state_id)
    type Key = (String, RecordId);

    const TABLE: &'static str = "cities";
    const KEY_COLUMNS: &'static [&'static str] = &["name", "state_id"];
    const VALUE_COLUMNS: &'static [&'static str] = &[];

    fn key_values((name, state_id): &(String, RecordId)) -> Vec<Value> {
        vec![text(name), Value::Integer(*state_id)]
    }

    fn natural_key_values(&self) -> Vec<Value> {
        vec![text(&self.name), Value::Integer(self.state_id)]
    }

    fn attribute_values(&self) -> Vec<Value> {
        Vec::new()
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(City {
            name: row.get(offset)?,
            state_id: row.get(offset + 1)?,
        })
    }
}

impl KeyedEntity for Station {
    type Key = str;

    const TABLE: &'static str = "stations";
    const KEY_COLUMNS: &'static [&'static str] = &["code"];
    const VALUE_COLUMNS: &'static [&'static str] =
        &["latitude", "longitude", "altitude", "city_id", "state_id"];

    fn key_values(code: &str) -> Vec<Value> {
        vec![text(code)]
    }

    fn natural_key_values(&self) -> Vec<Value> {
        vec![text(&self.code)]
    }

    fn attribute_values(&self) -> Vec<Value> {
        vec![
            Value::Real(self.latitude),
            Value::Real(self.longitude),
            Value::Real(self.altitude),
            Value::Integer(self.city_id),
            Value::Integer(self.state_id),
        ]
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Station {
            code: row.get(offset)?,
            latitude: row.get(offset + 1)?,
            longitude: row.get(offset + 2)?,
            altitude: row.get(offset + 3)?,
            city_id: row.get(offset + 4)?,
            state_id: row.get(offset + 5)?,
        })
    }
}

const OBSERVATION_VALUE_COLUMNS: [&str; 17] = [
    "precipitation",
    "atmospheric_pressure",
    "prev_max_pressure",
    "prev_min_pressure",
    "global_radiation",
    "air_temperature",
    "dew_point_temperature",
    "max_temperature",
    "min_temperature",
    "max_dew_point_temperature",
    "min_dew_point_temperature",
    "max_relative_humidity",
    "min_relative_humidity",
    "relative_humidity",
    "wind_direction",
    "max_wind_gust",
    "wind_speed",
];

impl KeyedEntity for Observation {
    /// (station_id, datetime)
    type Key = (RecordId, DateTime<Utc>);

    const TABLE: &'static str = "observations";
    const KEY_COLUMNS: &'static [&'static str] = &["station_id", "datetime"];
    const VALUE_COLUMNS: &'static [&'static str] = &OBSERVATION_VALUE_COLUMNS;

    fn key_values((station_id, datetime): &(RecordId, DateTime<Utc>)) -> Vec<Value> {
        vec![Value::Integer(*station_id), timestamp_value(datetime)]
    }

    fn natural_key_values(&self) -> Vec<Value> {
        vec![Value::Integer(self.station_id), timestamp_value(&self.datetime)]
    }

    fn attribute_values(&self) -> Vec<Value> {
        MeasurementField::ALL
            .iter()
            .map(|field| optional_real(self.measurements.get(*field)))
            .collect()
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        let mut measurements = Measurements::default();
        for (i, field) in MeasurementField::ALL.iter().enumerate() {
            measurements.set(*field, row.get(offset + 2 + i)?);
        }

        Ok(Observation {
            station_id: row.get(offset)?,
            datetime: row.get(offset + 1)?,
            measurements,
        })
    }
}
