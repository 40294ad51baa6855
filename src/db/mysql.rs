use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder, Params, Row};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use super::{Database, Dialect, ResultSet, SqlValue};
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// MySQL connection driven by a private current-thread runtime.
///
/// `mysql_async` needs a Tokio context for its networking; every call blocks
/// on that runtime so callers see a plain synchronous API.
pub struct MySqlDatabase {
    runtime: Runtime,
    conn: Option<Conn>,
}

impl MySqlDatabase {
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(config.user.clone())
            .pass(config.password.clone())
            .db_name(Some(config.name.clone()))
            .into();

        info!(target = %config.target(), "connecting to MySQL database");
        let conn = runtime
            .block_on(Conn::new(opts))
            .map_err(|e| Error::Connection {
                target: config.target(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            runtime,
            conn: Some(conn),
        })
    }

    fn closed() -> Error {
        Error::Connection {
            target: "mysql".to_string(),
            reason: "connection already closed".to_string(),
        }
    }
}

fn to_params(params: &[SqlValue]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(SqlValue::to_mysql).collect())
    }
}

impl Database for MySqlDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        debug!(sql, "execute");
        let conn = self.conn.as_mut().ok_or_else(Self::closed)?;

        // Session and transaction statements cannot all be prepared, so only
        // statements with parameters go through the binary protocol
        let affected = if params.is_empty() {
            self.runtime.block_on(async {
                conn.query_drop(sql).await?;
                Ok::<_, mysql_async::Error>(conn.affected_rows())
            })?
        } else {
            self.runtime.block_on(async {
                conn.exec_drop(sql, to_params(params)).await?;
                Ok::<_, mysql_async::Error>(conn.affected_rows())
            })?
        };

        Ok(affected)
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet> {
        debug!(sql, "query");
        let conn = self.conn.as_mut().ok_or_else(Self::closed)?;

        let (columns, rows) = self.runtime.block_on(async {
            let result = conn.exec_iter(sql, to_params(params)).await?;
            let columns: Vec<String> = result
                .columns_ref()
                .iter()
                .map(|c| c.name_str().into_owned())
                .collect();
            let rows: Vec<Row> = result.collect_and_drop().await?;
            Ok::<_, mysql_async::Error>((columns, rows))
        })?;

        let rows = rows
            .into_iter()
            .map(|row| row.unwrap().into_iter().map(SqlValue::from_mysql).collect())
            .collect();

        Ok(ResultSet { columns, rows })
    }

    fn table_names(&mut self) -> Result<Vec<String>> {
        let conn = self.conn.as_mut().ok_or_else(Self::closed)?;
        let mut names: Vec<String> = self.runtime.block_on(conn.query("SHOW TABLES"))?;
        names.sort();
        Ok(names)
    }

    fn insert_rows(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        debug!(sql, rows = rows.len(), "insert batch");
        let conn = self.conn.as_mut().ok_or_else(Self::closed)?;

        let params: Vec<Params> = rows.iter().map(|row| to_params(row)).collect();
        self.runtime.block_on(conn.exec_batch(sql, params))?;

        Ok(rows.len() as u64)
    }
}

impl Drop for MySqlDatabase {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = self.runtime.block_on(conn.disconnect()) {
                warn!(error = %e, "failed to close MySQL connection cleanly");
            }
        }
    }
}
