pub mod entities;
pub mod observation;
pub mod station;

pub use entities::{City, Observation, RecordId, Region, State, Station, Stored};
pub use observation::{
    MeasurementField, Measurements, ObservationRow, ObservationTable, TableStats,
};
pub use station::{MetaField, StationMetadata};
