//! Connection settings.
//!
//! Layered with the `config` crate: built-in defaults, then the selected env
//! file, then `DB_*` variables from the process environment.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, Environment};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

const ENV_PREFIX: &str = "DB";

/// Deployment whose credentials file should be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvironmentName {
    Aws,
    Local,
}

impl EnvironmentName {
    pub fn env_file(self) -> PathBuf {
        match self {
            EnvironmentName::Aws => PathBuf::from("credentials/.env.aws"),
            EnvironmentName::Local => PathBuf::from("credentials/.env.local"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    MySql,
    Sqlite,
}

/// Database identity. For SQLite, `name` is the database file path.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub engine: Engine,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub name: String,
}

impl DatabaseConfig {
    /// Load from `env_file` (if it exists) and the process environment
    pub fn load(env_file: &Path) -> Result<Self> {
        let file_vars = read_env_file(env_file)?;
        let config = Self::from_sources(file_vars, None)?;
        info!(target = %config.target(), "loaded database configuration");
        Ok(config)
    }

    /// Build from explicit variable maps. `process_vars: None` reads the
    /// real process environment.
    pub fn from_sources(
        file_vars: HashMap<String, String>,
        process_vars: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut process = Environment::with_prefix(ENV_PREFIX);
        if let Some(vars) = process_vars {
            process = process.source(Some(vars));
        }

        let settings = Config::builder()
            .set_default("engine", "mysql")?
            .set_default("host", "localhost")?
            .set_default("port", 3306)?
            .add_source(Environment::with_prefix(ENV_PREFIX).source(Some(file_vars)))
            .add_source(process)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// SQLite database at `path`
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            engine: Engine::Sqlite,
            host: "localhost".to_string(),
            port: 0,
            user: None,
            password: None,
            name: path.into(),
        }
    }

    /// Human-readable target, never including the password
    pub fn target(&self) -> String {
        match self.engine {
            Engine::Sqlite => format!("sqlite:{}", self.name),
            Engine::MySql => format!(
                "mysql://{}@{}:{}/{}",
                self.user.as_deref().unwrap_or(""),
                self.host,
                self.port,
                self.name
            ),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("name", &self.name)
            .finish()
    }
}

/// Read `KEY=value` pairs without touching the process environment.
/// A missing file yields no variables.
fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let env_error = |source| Error::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "env file not found, using process environment only");
            return Ok(HashMap::new());
        }
        Err(e) => return Err(env_error(e)),
    };

    iter.collect::<std::result::Result<HashMap<_, _>, _>>()
        .map_err(env_error)
}
