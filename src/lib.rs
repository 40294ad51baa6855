pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod maintenance;
pub mod parser;
pub mod schema;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::{DatabaseConfig, EnvironmentName};
pub use db::Database;
pub use error::{Error, Result};
