use std::fmt;
use std::path::PathBuf;

/// Where a file's processing stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStage {
    Parsing,
    Resolving,
    Loading,
    Upserting,
    Done,
    Failed(String),
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStage::Parsing => write!(f, "parsing"),
            FileStage::Resolving => write!(f, "resolving"),
            FileStage::Loading => write!(f, "loading"),
            FileStage::Upserting => write!(f, "upserting"),
            FileStage::Done => write!(f, "done"),
            FileStage::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub stage: FileStage,
    pub station_code: Option<String>,
    pub inserted: usize,
    pub updated: usize,
    pub dropped_rows: usize,
    pub unparsable_cells: usize,
}

impl FileReport {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            stage: FileStage::Parsing,
            station_code: None,
            inserted: 0,
            updated: 0,
            dropped_rows: 0,
            unparsable_cells: 0,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn is_success(&self) -> bool {
        self.stage == FileStage::Done
    }

    pub fn error(&self) -> Option<&str> {
        match &self.stage {
            FileStage::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub files: Vec<FileReport>,
}

impl IngestReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn inserted(&self) -> usize {
        self.files.iter().map(|f| f.inserted).sum()
    }

    pub fn updated(&self) -> usize {
        self.files.iter().map(|f| f.updated).sum()
    }

    pub fn dropped_rows(&self) -> usize {
        self.files.iter().map(|f| f.dropped_rows).sum()
    }

    pub fn unparsable_cells(&self) -> usize {
        self.files.iter().map(|f| f.unparsable_cells).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.is_success())
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Ingestion Report ===\n");
        summary.push_str(&format!("Files Processed: {}\n", self.files.len()));
        summary.push_str(&format!("Succeeded: {}\n", self.succeeded()));
        summary.push_str(&format!("Failed: {}\n", self.failed()));
        summary.push_str(&format!("Observations Inserted: {}\n", self.inserted()));
        summary.push_str(&format!("Observations Updated: {}\n", self.updated()));
        summary.push_str(&format!("Rows Dropped: {}\n", self.dropped_rows()));
        summary.push_str(&format!(
            "Unparsable Cells (stored as null): {}\n",
            self.unparsable_cells()
        ));

        if self.failed() > 0 {
            summary.push_str("\nFailed Files:\n");
            for (i, file) in self.failures().enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    file.file_name(),
                    file.error().unwrap_or("incomplete")
                ));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_failures() {
        let mut ok = FileReport::new(PathBuf::from("data/a.CSV"));
        ok.stage = FileStage::Done;
        ok.inserted = 24;
        ok.dropped_rows = 2;

        let mut bad = FileReport::new(PathBuf::from("data/b.CSV"));
        bad.stage = FileStage::Failed("Required columns missing in b.CSV: hora_utc".to_string());

        let report = IngestReport {
            files: vec![ok, bad],
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.inserted(), 24);

        let summary = report.generate_summary();
        assert!(summary.contains("Observations Inserted: 24"));
        assert!(summary.contains("1. b.CSV: Required columns missing in b.CSV: hora_utc"));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(FileStage::Upserting.to_string(), "upserting");
        assert_eq!(FileStage::Failed("x".to_string()).to_string(), "failed: x");
    }
}
