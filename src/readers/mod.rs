pub mod encoding;
pub mod metadata_reader;
pub mod observation_reader;

pub use metadata_reader::MetadataReader;
pub use observation_reader::{parse_timestamp, ObservationReader};
