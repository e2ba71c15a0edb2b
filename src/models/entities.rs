use crate::models::Measurements;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type RecordId = i64;

/// A row as it exists in the store: the entity plus its surrogate identity
/// and the store-maintained timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<E> {
    pub id: RecordId,
    pub entity: E,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<E> std::ops::Deref for Stored<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub code: String,
    pub name: String,
    pub region_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub state_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub city_id: RecordId,
    pub state_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station_id: RecordId,
    pub datetime: DateTime<Utc>,
    pub measurements: Measurements,
}
