use crate::error::{IngestError, Result};
use crate::models::{Observation, ObservationRow, RecordId};
use crate::store::Store;
use crate::utils::constants::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertStats {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertStats {
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

impl std::ops::AddAssign for UpsertStats {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
    }
}

/// Writes observation rows keyed by (station, datetime), one transaction per chunk.
///
/// A row whose key already exists has all 17 measurements replaced, so
/// re-ingesting overlapping data converges to the latest values.
pub struct ObservationUpserter<'s> {
    store: &'s Store,
    batch_size: usize,
}

/// A zero batch size is a configuration error and aborts the whole run
pub fn check_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(IngestError::Config(config::ConfigError::Message(
            "Batch size must be at least 1".to_string(),
        )));
    }
    Ok(())
}

impl<'s> ObservationUpserter<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        check_batch_size(batch_size)?;
        self.batch_size = batch_size;
        Ok(self)
    }

    pub fn upsert_rows(&self, station_id: RecordId, rows: &[ObservationRow]) -> Result<UpsertStats> {
        let mut stats = UpsertStats::default();
        for chunk in rows.chunks(self.batch_size) {
            stats += self.upsert_chunk(station_id, chunk)?;
        }

        tracing::debug!(
            "Station {}: {} observations inserted, {} updated",
            station_id,
            stats.inserted,
            stats.updated
        );
        Ok(stats)
    }

    fn upsert_chunk(&self, station_id: RecordId, chunk: &[ObservationRow]) -> Result<UpsertStats> {
        self.store.in_transaction(|store| {
            let observations = store.observations();
            let mut stats = UpsertStats::default();

            for row in chunk {
                if observations.exists(&(station_id, row.datetime))? {
                    stats.updated += 1;
                } else {
                    stats.inserted += 1;
                }
                observations.upsert(&Observation {
                    station_id,
                    datetime: row.datetime,
                    measurements: row.measurements,
                })?;
            }

            Ok(stats)
        })
    }
}
