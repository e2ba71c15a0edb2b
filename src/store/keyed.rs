//! Generic access to a table whose rows are identified by a natural key.
//!
//! Each persisted entity describes its table layout through [`KeyedEntity`];
//! [`EntityStore`] holds a connection and provides the typed lookups and
//! writes on top of it. The unique constraint on the natural-key columns is
//! what guarantees at most one row per key.

use crate::error::Result;
use crate::models::{RecordId, Stored};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::marker::PhantomData;

/// SQL expression producing the store's timestamp format
pub const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%SZ', 'now')";

pub trait KeyedEntity: Sized {
    type Key: ?Sized;

    const TABLE: &'static str;
    /// Natural-key columns, in `natural_key_values` order
    const KEY_COLUMNS: &'static [&'static str];
    /// Mutable columns, in `attribute_values` order
    const VALUE_COLUMNS: &'static [&'static str];

    fn key_values(key: &Self::Key) -> Vec<Value>;
    fn natural_key_values(&self) -> Vec<Value>;
    fn attribute_values(&self) -> Vec<Value>;

    /// Build the entity from key columns followed by value columns, starting at `offset`
    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self>;
}

pub struct EntityStore<'c, E> {
    conn: &'c Connection,
    table: String,
    _entity: PhantomData<E>,
}

impl<'c, E: KeyedEntity> EntityStore<'c, E> {
    pub fn new(conn: &'c Connection, namespace: &str) -> Self {
        Self {
            conn,
            table: format!("{}.{}", namespace, E::TABLE),
            _entity: PhantomData,
        }
    }

    fn data_columns() -> impl Iterator<Item = &'static str> {
        E::KEY_COLUMNS.iter().chain(E::VALUE_COLUMNS.iter()).copied()
    }

    fn select_list() -> String {
        let mut columns = vec!["id", "created_at", "updated_at"];
        columns.extend(Self::data_columns());
        columns.join(", ")
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Stored<E>> {
        Ok(Stored {
            id: row.get(0)?,
            created_at: row.get(1)?,
            updated_at: row.get(2)?,
            entity: E::from_row(row, 3)?,
        })
    }

    fn key_predicate(first_param: usize) -> String {
        E::KEY_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, first_param + i))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn row_values(entity: &E) -> Vec<Value> {
        let mut values = entity.natural_key_values();
        values.extend(entity.attribute_values());
        values
    }

    pub fn get(&self, id: RecordId) -> Result<Option<Stored<E>>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            Self::select_list(),
            self.table
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.query_row([id], Self::map_row).optional()?)
    }

    pub fn find_by_key(&self, key: &E::Key) -> Result<Option<Stored<E>>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            Self::select_list(),
            self.table,
            Self::key_predicate(1)
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt
            .query_row(params_from_iter(E::key_values(key)), Self::map_row)
            .optional()?)
    }

    pub fn exists(&self, key: &E::Key) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {})",
            self.table,
            Self::key_predicate(1)
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params_from_iter(E::key_values(key)), |row| row.get(0))?)
    }

    pub fn insert(&self, entity: &E) -> Result<Stored<E>> {
        let columns: Vec<&str> = Self::data_columns().collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table,
            columns.join(", "),
            placeholders.join(", "),
            Self::select_list()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params_from_iter(Self::row_values(entity)), Self::map_row)?)
    }

    /// Overwrite every data column of the row with surrogate identity `id`
    pub fn update(&self, id: RecordId, entity: &E) -> Result<Stored<E>> {
        let columns: Vec<&str> = Self::data_columns().collect();
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {}, updated_at = {} WHERE id = ?{} RETURNING {}",
            self.table,
            assignments.join(", "),
            NOW_SQL,
            columns.len() + 1,
            Self::select_list()
        );

        let mut values = Self::row_values(entity);
        values.push(Value::Integer(id));
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params_from_iter(values), Self::map_row)?)
    }

    /// Insert, or replace the value columns of the row holding the same natural key
    pub fn upsert(&self, entity: &E) -> Result<Stored<E>> {
        let columns: Vec<&str> = Self::data_columns().collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let mut assignments: Vec<String> = E::VALUE_COLUMNS
            .iter()
            .map(|column| format!("{0} = excluded.{0}", column))
            .collect();
        assignments.push(format!("updated_at = {}", NOW_SQL));

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {} RETURNING {}",
            self.table,
            columns.join(", "),
            placeholders.join(", "),
            E::KEY_COLUMNS.join(", "),
            assignments.join(", "),
            Self::select_list()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params_from_iter(Self::row_values(entity)), Self::map_row)?)
    }

    /// Rows whose foreign key `column` points at `id`
    pub fn list_by(&self, column: &str, id: RecordId, order_by: &str) -> Result<Vec<Stored<E>>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {}",
            Self::select_list(),
            self.table,
            column,
            order_by
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([id], Self::map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
