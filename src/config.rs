//! Layered settings: built-in defaults, an optional TOML file, then
//! `INMET__*` environment variables (e.g. `INMET__DATABASE__PATH`).

use crate::error::Result;
use crate::processors::IngestOptions;
use crate::utils::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE, DEFAULT_DATA_DIR,
    DEFAULT_NAMESPACE, DEFAULT_PATTERN, ENV_PREFIX,
};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DatabaseSettings {
    pub path: PathBuf,

    #[validate(length(min = 1))]
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Directory holding the CSV exports
    pub data_path: PathBuf,

    /// File-name glob, matched case-insensitively
    #[validate(length(min = 1))]
    pub pattern: String,

    /// Observation rows per transaction
    #[validate(range(min = 1))]
    pub batch_size: usize,

    /// Empty every table before loading
    pub truncate: bool,

    #[validate(nested)]
    pub database: DatabaseSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            truncate: false,
            database: DatabaseSettings {
                path: PathBuf::from(DEFAULT_DATABASE_FILE),
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
        }
    }
}

impl Settings {
    /// Load settings from `config_file` (or `inmet.toml` when present) and the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("data_path", defaults.data_path.to_string_lossy().into_owned())?
            .set_default("pattern", defaults.pattern)?
            .set_default("batch_size", defaults.batch_size as u64)?
            .set_default("truncate", defaults.truncate)?
            .set_default(
                "database.path",
                defaults.database.path.to_string_lossy().into_owned(),
            )?
            .set_default("database.namespace", defaults.database.namespace)?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml)),
            None => builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            data_dir: self.data_path.clone(),
            pattern: self.pattern.clone(),
            truncate: self.truncate,
            batch_size: self.batch_size,
            ..IngestOptions::default()
        }
    }
}
