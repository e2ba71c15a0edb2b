use crate::error::Result;
use crate::models::MeasurementField;
use crate::store::keyed::NOW_SQL;
use crate::store::Store;

/// Tables in dependency order, parents first
pub const TABLES: [&str; 5] = ["regions", "states", "cities", "stations", "observations"];

fn timestamps() -> String {
    format!(
        "created_at TEXT NOT NULL DEFAULT ({now}),\n    updated_at TEXT NOT NULL DEFAULT ({now})",
        now = NOW_SQL
    )
}

fn table_definitions(namespace: &str) -> Vec<String> {
    let measurement_columns: Vec<String> = MeasurementField::ALL
        .iter()
        .map(|field| format!("{} REAL", field.column()))
        .collect();

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {ns}.regions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    {ts}
)",
            ns = namespace,
            ts = timestamps()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {ns}.states (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    region_id INTEGER NOT NULL REFERENCES regions(id) ON DELETE CASCADE,
    {ts}
)",
            ns = namespace,
            ts = timestamps()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {ns}.cities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    state_id INTEGER NOT NULL REFERENCES states(id) ON DELETE CASCADE,
    {ts},
    UNIQUE (name, state_id)
)",
            ns = namespace,
            ts = timestamps()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {ns}.stations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    altitude REAL NOT NULL,
    city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
    state_id INTEGER NOT NULL REFERENCES states(id) ON DELETE CASCADE,
    {ts}
)",
            ns = namespace,
            ts = timestamps()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {ns}.observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station_id INTEGER NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
    datetime TEXT NOT NULL,
    {measurements},
    {ts},
    UNIQUE (station_id, datetime)
)",
            ns = namespace,
            measurements = measurement_columns.join(",\n    "),
            ts = timestamps()
        ),
    ]
}

/// Provision the five tables under the store's namespace
pub fn create_tables(store: &Store, drop_existing: bool) -> Result<()> {
    let conn = store.connection();
    let namespace = store.namespace();
    let tx = conn.unchecked_transaction()?;

    if drop_existing {
        for table in TABLES.iter().rev() {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {}.{}", namespace, table))?;
        }
    }

    for ddl in table_definitions(namespace) {
        tx.execute_batch(&ddl)?;
    }
    tx.commit()?;

    tracing::info!("Tables created in namespace '{}'", namespace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_repeatable() -> Result<()> {
        let store = Store::open_in_memory("inmet")?;
        create_tables(&store, false)?;
        create_tables(&store, false)?;

        let counts = store.table_counts()?;
        assert_eq!(counts.total(), 0);
        Ok(())
    }

    #[test]
    fn test_drop_existing_clears_rows() -> Result<()> {
        let store = Store::open_in_memory("inmet")?;
        create_tables(&store, false)?;
        store
            .connection()
            .execute("INSERT INTO inmet.regions (code, name) VALUES ('SE', 'Sudeste')", [])?;
        assert_eq!(store.table_counts()?.regions, 1);

        create_tables(&store, true)?;
        assert_eq!(store.table_counts()?.regions, 0);
        Ok(())
    }

    #[test]
    fn test_observation_table_has_measurement_columns() -> Result<()> {
        let store = Store::open_in_memory("inmet")?;
        create_tables(&store, false)?;

        let mut stmt = store
            .connection()
            .prepare("SELECT name FROM pragma_table_info('observations', 'inmet')")?;
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;

        for field in MeasurementField::ALL {
            assert!(columns.iter().any(|c| c == field.column()), "{}", field);
        }
        Ok(())
    }
}
