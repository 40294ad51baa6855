//! Error type for `telecom-infra-db`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to read env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// The database could not be reached or refused the credentials.
    #[error("failed to connect to {target}: {reason}")]
    Connection { target: String, reason: String },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("mysql error: {0}")]
    MySql(#[from] mysql_async::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("circular dependency detected at: {0}")]
    CircularDependency(String),

    #[error("table {0} has no country_code column")]
    NoCountryColumn(String),

    #[error("invalid country code {0:?}: expected three ASCII letters")]
    InvalidCountryCode(String),

    #[error("failed to start database runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
