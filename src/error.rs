use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Station code not found in metadata header of {file}")]
    MissingStationCode { file: String },

    #[error("Required columns missing in {file}: {}", missing.join(", "))]
    MissingRequiredColumns { file: String, missing: Vec<String> },

    #[error("Invalid coordinate value: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("No CSV files found in {dir} using pattern '{pattern}'")]
    NoInputFiles { dir: String, pattern: String },
}

impl IngestError {
    /// Whether the error only invalidates the file being processed.
    ///
    /// Bad input data is skipped by the orchestrator; anything else (store,
    /// configuration, filesystem) aborts the run.
    pub fn is_file_fatal(&self) -> bool {
        matches!(
            self,
            IngestError::MissingStationCode { .. }
                | IngestError::MissingRequiredColumns { .. }
                | IngestError::InvalidCoordinate(_)
                | IngestError::InvalidFormat(_)
                | IngestError::Csv(_)
                | IngestError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_fatal_classification() {
        let missing = IngestError::MissingStationCode {
            file: "a.CSV".to_string(),
        };
        assert!(missing.is_file_fatal());

        let columns = IngestError::MissingRequiredColumns {
            file: "a.CSV".to_string(),
            missing: vec!["hora_utc".to_string()],
        };
        assert!(columns.is_file_fatal());
        assert_eq!(
            columns.to_string(),
            "Required columns missing in a.CSV: hora_utc"
        );

        let db = IngestError::Database(rusqlite::Error::QueryReturnedNoRows);
        assert!(!db.is_file_fatal());

        let io = IngestError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(!io.is_file_fatal());
    }
}
