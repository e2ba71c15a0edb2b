pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod upserter;

pub use orchestrator::{BatchOrchestrator, IngestOptions};
pub use report::{FileReport, FileStage, IngestReport};
pub use resolver::{EntityResolver, ResolvedStation};
pub use upserter::{ObservationUpserter, UpsertStats};
