pub mod entities;
pub mod keyed;
pub mod schema;

pub use keyed::{EntityStore, KeyedEntity};
pub use schema::{create_tables, TABLES};

use crate::error::{IngestError, Result};
use crate::models::{City, Observation, RecordId, Region, State, Station, Stored};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Row counts of the five tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub regions: usize,
    pub states: usize,
    pub cities: usize,
    pub stations: usize,
    pub observations: usize,
}

impl TableCounts {
    pub fn total(&self) -> usize {
        self.regions + self.states + self.cities + self.stations + self.observations
    }

    pub fn summary(&self) -> String {
        format!(
            "regions: {}\nstates: {}\ncities: {}\nstations: {}\nobservations: {}\n",
            self.regions, self.states, self.cities, self.stations, self.observations
        )
    }
}

/// Persistent store: one SQLite connection with the data attached under a
/// dedicated namespace, so every table is addressed as `<namespace>.<table>`.
pub struct Store {
    conn: Connection,
    namespace: String,
}

impl Store {
    /// Open the database file at `path`, creating it if needed
    pub fn open(path: &Path, namespace: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::attach(&path.to_string_lossy(), namespace)
    }

    pub fn open_in_memory(namespace: &str) -> Result<Self> {
        Self::attach(":memory:", namespace)
    }

    fn attach(location: &str, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;

        let conn = Connection::open_in_memory()?;
        conn.execute(&format!("ATTACH DATABASE ?1 AS {}", namespace), [location])?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;

        tracing::debug!("Opened store at {} as '{}'", location, namespace);
        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn regions(&self) -> EntityStore<'_, Region> {
        EntityStore::new(&self.conn, &self.namespace)
    }

    pub fn states(&self) -> EntityStore<'_, State> {
        EntityStore::new(&self.conn, &self.namespace)
    }

    pub fn cities(&self) -> EntityStore<'_, City> {
        EntityStore::new(&self.conn, &self.namespace)
    }

    pub fn stations(&self) -> EntityStore<'_, Station> {
        EntityStore::new(&self.conn, &self.namespace)
    }

    pub fn observations(&self) -> EntityStore<'_, Observation> {
        EntityStore::new(&self.conn, &self.namespace)
    }

    /// Run `f` inside a transaction, committing only if it succeeds
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    /// Delete every row and restart surrogate identities
    pub fn truncate_all(&self) -> Result<()> {
        self.in_transaction(|store| {
            for table in TABLES.iter().rev() {
                store
                    .conn
                    .execute(&format!("DELETE FROM {}.{}", store.namespace, table), [])?;
            }
            let has_sequence: bool = store.conn.query_row(
                &format!(
                    "SELECT EXISTS(SELECT 1 FROM {}.sqlite_master WHERE name = 'sqlite_sequence')",
                    store.namespace
                ),
                [],
                |row| row.get(0),
            )?;
            if has_sequence {
                store.conn.execute(
                    &format!("DELETE FROM {}.sqlite_sequence", store.namespace),
                    [],
                )?;
            }
            Ok(())
        })?;

        tracing::info!("Truncated all tables in '{}'", self.namespace);
        Ok(())
    }

    pub fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            regions: self.regions().count()?,
            states: self.states().count()?,
            cities: self.cities().count()?,
            stations: self.stations().count()?,
            observations: self.observations().count()?,
        })
    }

    pub fn station_by_code(&self, code: &str) -> Result<Option<Stored<Station>>> {
        self.stations().find_by_key(code)
    }

    pub fn states_in_region(&self, region_id: RecordId) -> Result<Vec<Stored<State>>> {
        self.states().list_by("region_id", region_id, "code")
    }

    pub fn cities_in_state(&self, state_id: RecordId) -> Result<Vec<Stored<City>>> {
        self.cities().list_by("state_id", state_id, "name")
    }

    /// Observations of a station in chronological order
    pub fn observations_for_station(&self, station_id: RecordId) -> Result<Vec<Stored<Observation>>> {
        self.observations().list_by("station_id", station_id, "datetime")
    }
}

fn validate_namespace(namespace: &str) -> Result<()> {
    let mut chars = namespace.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(IngestError::InvalidFormat(format!(
            "Invalid store namespace: '{}'",
            namespace
        )))
    }
}
