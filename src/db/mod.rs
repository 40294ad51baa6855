//! Database access behind a small synchronous trait.
//!
//! Two engines are supported: SQLite through `rusqlite` and MySQL through
//! `mysql_async` driven by a private runtime. Everything above this module
//! talks to `&mut dyn Database` and renders SQL through [`Dialect`].

pub mod mysql;
pub mod result;
pub mod sqlite;
pub mod value;

pub use mysql::MySqlDatabase;
pub use result::ResultSet;
pub use sqlite::SqliteDatabase;
pub use value::SqlValue;

use clap::ValueEnum;
use tracing::debug;

use crate::config::{DatabaseConfig, Engine};
use crate::error::Result;
use crate::schema::ColumnType;

/// SQL flavor used to render identifiers, DDL and session statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    Sqlite,
    #[value(name = "mysql")]
    MySql,
}

impl Dialect {
    /// Quote an identifier
    pub fn quote(self, ident: &str) -> String {
        match self {
            Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
        }
    }

    pub fn begin_sql(self) -> &'static str {
        match self {
            Dialect::Sqlite => "BEGIN",
            Dialect::MySql => "START TRANSACTION",
        }
    }

    pub fn foreign_key_checks_sql(self, enabled: bool) -> &'static str {
        match (self, enabled) {
            (Dialect::Sqlite, true) => "PRAGMA foreign_keys = ON",
            (Dialect::Sqlite, false) => "PRAGMA foreign_keys = OFF",
            (Dialect::MySql, true) => "SET FOREIGN_KEY_CHECKS=1",
            (Dialect::MySql, false) => "SET FOREIGN_KEY_CHECKS=0",
        }
    }

    /// Placeholder for a bound value in an INSERT column list
    pub fn value_placeholder(self, col_type: Option<&ColumnType>) -> &'static str {
        match (self, col_type) {
            (Dialect::MySql, Some(ColumnType::Geometry(_))) => "ST_GeomFromText(?)",
            _ => "?",
        }
    }
}

/// A live connection. Dropping it closes the connection.
pub trait Database {
    fn dialect(&self) -> Dialect;

    /// Execute one statement, returning the number of affected rows
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64>;

    /// Execute one statement and materialize every row it returns
    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet>;

    /// Names of the tables currently present, sorted
    fn table_names(&mut self) -> Result<Vec<String>>;

    /// Execute `sql` once per row
    fn insert_rows(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        let mut count = 0;
        for row in rows {
            count += self.execute(sql, row)?;
        }
        Ok(count)
    }

    fn set_foreign_key_checks(&mut self, enabled: bool) -> Result<()> {
        let sql = self.dialect().foreign_key_checks_sql(enabled);
        self.execute(sql, &[]).map(|_| ())
    }

    fn begin(&mut self) -> Result<()> {
        let sql = self.dialect().begin_sql();
        self.execute(sql, &[]).map(|_| ())
    }

    fn commit(&mut self) -> Result<()> {
        self.execute("COMMIT", &[]).map(|_| ())
    }

    fn rollback(&mut self) -> Result<()> {
        self.execute("ROLLBACK", &[]).map(|_| ())
    }

    fn savepoint(&mut self, name: &str) -> Result<()> {
        let sql = format!("SAVEPOINT {}", name);
        self.execute(&sql, &[]).map(|_| ())
    }

    fn rollback_to_savepoint(&mut self, name: &str) -> Result<()> {
        let sql = format!("ROLLBACK TO SAVEPOINT {}", name);
        self.execute(&sql, &[]).map(|_| ())
    }

    fn release_savepoint(&mut self, name: &str) -> Result<()> {
        let sql = format!("RELEASE SAVEPOINT {}", name);
        self.execute(&sql, &[]).map(|_| ())
    }
}

/// Open a connection for the configured engine
pub fn connect(config: &DatabaseConfig) -> Result<Box<dyn Database>> {
    debug!(target = %config.target(), "opening database connection");

    match config.engine {
        Engine::Sqlite => Ok(Box::new(SqliteDatabase::open(&config.name)?)),
        Engine::MySql => Ok(Box::new(MySqlDatabase::connect(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GeometryKind;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(Dialect::Sqlite.quote("key"), "\"key\"");
        assert_eq!(Dialect::MySql.quote("key"), "`key`");
        assert_eq!(Dialect::MySql.quote("a`b"), "`a``b`");
    }

    #[test]
    fn test_geometry_placeholder() {
        let geom = ColumnType::Geometry(GeometryKind::Point);
        assert_eq!(Dialect::MySql.value_placeholder(Some(&geom)), "ST_GeomFromText(?)");
        assert_eq!(Dialect::Sqlite.value_placeholder(Some(&geom)), "?");
        assert_eq!(Dialect::MySql.value_placeholder(None), "?");
    }
}
