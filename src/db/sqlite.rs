use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use super::{Database, Dialect, ResultSet, SqlValue};
use crate::error::Result;

pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())?;
        Self::configure(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // Foreign keys are off by default in SQLite
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self { conn })
    }
}

fn bind_all(stmt: &mut rusqlite::Statement, params: &[SqlValue]) -> rusqlite::Result<()> {
    for (idx, value) in params.iter().enumerate() {
        value.bind_to(idx + 1, stmt)?;
    }
    Ok(())
}

impl Database for SqliteDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        debug!(sql, "execute");

        if params.is_empty() {
            self.conn.execute_batch(sql)?;
            return Ok(self.conn.changes() as u64);
        }

        let mut stmt = self.conn.prepare_cached(sql)?;
        bind_all(&mut stmt, params)?;
        Ok(stmt.raw_execute()? as u64)
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet> {
        debug!(sql, "query");

        let mut stmt = self.conn.prepare(sql)?;
        bind_all(&mut stmt, params)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut result = ResultSet {
            columns,
            rows: Vec::new(),
        };

        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(result.columns.len());
            for idx in 0..result.columns.len() {
                values.push(SqlValue::from_sqlite(row.get_ref(idx)?));
            }
            result.rows.push(values);
        }

        Ok(result)
    }

    fn table_names(&mut self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Reuses one cached prepared statement for every row
    fn insert_rows(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut count: u64 = 0;

        for row in rows {
            bind_all(&mut stmt, row)?;
            count += stmt.raw_execute()? as u64;
        }

        Ok(count)
    }
}
