use crate::error::{IngestError, Result};
use crate::processors::report::{FileReport, FileStage, IngestReport};
use crate::processors::upserter::check_batch_size;
use crate::processors::{EntityResolver, ObservationUpserter};
use crate::readers::{MetadataReader, ObservationReader};
use crate::store::Store;
use crate::utils::constants::{DEFAULT_BATCH_SIZE, DEFAULT_DATA_DIR, DEFAULT_PATTERN};
use crate::utils::progress::ProgressReporter;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Operational controls of one ingestion run
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    pub data_dir: PathBuf,
    pub pattern: String,
    pub truncate: bool,
    pub batch_size: usize,
    pub show_progress: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
            truncate: false,
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: false,
        }
    }
}

/// Runs every matching file through parse → resolve → load → upsert.
///
/// Files are processed sequentially. Bad input fails only its own file;
/// store and filesystem errors abort the run.
pub struct BatchOrchestrator<'s> {
    store: &'s Store,
    options: IngestOptions,
    metadata_reader: MetadataReader,
    observation_reader: ObservationReader,
}

impl<'s> BatchOrchestrator<'s> {
    pub fn new(store: &'s Store, options: IngestOptions) -> Self {
        Self {
            store,
            options,
            metadata_reader: MetadataReader::new(),
            observation_reader: ObservationReader::new(),
        }
    }

    /// Input files matching the pattern, case-insensitively, in name order
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let dir = Pattern::escape(&self.options.data_dir.to_string_lossy());
        let pattern = Path::new(&dir).join(&self.options.pattern);
        let match_options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::default()
        };

        let mut files = Vec::new();
        for entry in glob::glob_with(&pattern.to_string_lossy(), match_options)? {
            let path = entry.map_err(|e| e.into_error())?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(IngestError::NoInputFiles {
                dir: self.options.data_dir.display().to_string(),
                pattern: self.options.pattern.clone(),
            });
        }
        Ok(files)
    }

    pub fn run(&self) -> Result<IngestReport> {
        check_batch_size(self.options.batch_size)?;

        let files = self.discover_files()?;
        tracing::info!(
            "Found {} files in {}",
            files.len(),
            self.options.data_dir.display()
        );

        if self.options.truncate {
            self.store.truncate_all()?;
        }

        let progress = ProgressReporter::for_files(files.len() as u64, !self.options.show_progress);
        let mut report = IngestReport::default();

        for path in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            progress.start_file(&file_name);

            report.files.push(self.process_file(&path)?);
            progress.file_done();
        }

        progress.finish_with_message(&format!(
            "{} of {} files ingested",
            report.succeeded(),
            report.files.len()
        ));
        Ok(report)
    }

    /// Ingest one file. Returns `Err` only for errors that must abort the run.
    pub fn process_file(&self, path: &Path) -> Result<FileReport> {
        let mut report = FileReport::new(path.to_path_buf());

        match self.ingest(path, &mut report) {
            Ok(()) => {
                report.stage = FileStage::Done;
                tracing::info!(
                    "{}: station {} ({} inserted, {} updated)",
                    report.file_name(),
                    report.station_code.as_deref().unwrap_or("?"),
                    report.inserted,
                    report.updated
                );
            }
            Err(e) if e.is_file_fatal() => {
                tracing::error!("{}: skipped during {}: {}", report.file_name(), report.stage, e);
                report.stage = FileStage::Failed(e.to_string());
            }
            Err(e) => return Err(e),
        }

        Ok(report)
    }

    fn ingest(&self, path: &Path, report: &mut FileReport) -> Result<()> {
        report.stage = FileStage::Parsing;
        let metadata = self.metadata_reader.read_metadata(path)?;
        report.station_code = Some(metadata.station_code.clone());

        report.stage = FileStage::Resolving;
        let resolved = EntityResolver::new(self.store).resolve(&metadata)?;

        report.stage = FileStage::Loading;
        let table = self.observation_reader.read_observations(path)?;
        report.dropped_rows = table.stats.dropped_rows();
        report.unparsable_cells = table.stats.unparsable_cells;

        report.stage = FileStage::Upserting;
        let stats = ObservationUpserter::new(self.store)
            .with_batch_size(self.options.batch_size)?
            .upsert_rows(resolved.station_id, &table.rows)?;
        report.inserted = stats.inserted;
        report.updated = stats.updated;

        Ok(())
    }
}
