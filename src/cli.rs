use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EnvironmentName;
use crate::db::Dialect;
use crate::maintenance::DEFAULT_TABLE;

#[derive(Parser, Debug)]
#[command(name = "telecom-infra-db")]
#[command(version, about = "Provision and load the telecom infrastructure database")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Deployment whose credentials file is read
    #[arg(long, value_enum, default_value_t = EnvironmentName::Local, global = true)]
    pub env: EnvironmentName,

    /// Read credentials from this file instead
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `telecom_infra_db=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    pub fn env_file(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(|| self.env.env_file())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop all known tables and create the data model
    CreateSchema,

    /// Append CSV files to their tables
    Load {
        /// Target table for the given files
        #[arg(short, long, required_unless_present = "country")]
        table: Option<String>,

        /// CSV files to load
        #[arg(required_unless_present = "country")]
        files: Vec<PathBuf>,

        /// Load every data set found for this country instead
        #[arg(short, long, conflicts_with_all = ["table", "files"])]
        country: Option<String>,

        /// Root of the `<COUNTRY>/processed/<table-type>/` tree
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Delete one country's rows from a table
    Delete {
        #[arg(short, long)]
        country: String,

        #[arg(short, long, default_value = DEFAULT_TABLE)]
        table: String,
    },

    /// Show one country's rows from a table
    Query {
        #[arg(short, long)]
        country: String,

        #[arg(short, long, default_value = DEFAULT_TABLE)]
        table: String,

        /// Number of rows to print
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,

        /// Print every row as a JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// List table names
    ListTables {
        /// List the tables present in the database instead of the catalog
        #[arg(long)]
        live: bool,
    },

    /// Print the DDL of the data model
    Ddl {
        #[arg(short, long, value_enum, default_value_t = Dialect::MySql)]
        dialect: Dialect,

        /// Only these tables and their dependencies (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        table: Option<Vec<String>>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_query_defaults() {
        let cli = Cli::try_parse_from(["telecom-infra-db", "query", "--country", "ESP"]).unwrap();
        assert_eq!(cli.global.env, EnvironmentName::Local);
        match cli.command {
            Commands::Query {
                table, limit, json, ..
            } => {
                assert_eq!(table, "point_of_interest");
                assert_eq!(limit, 5);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_load_by_country_conflicts_with_files() {
        assert!(Cli::try_parse_from(["telecom-infra-db", "load", "--country", "ESP"]).is_ok());
        assert!(Cli::try_parse_from([
            "telecom-infra-db",
            "load",
            "--country",
            "ESP",
            "--table",
            "cell_site",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["telecom-infra-db", "load"]).is_err());
    }

    #[test]
    fn test_env_file_override() {
        let cli = Cli::try_parse_from(["telecom-infra-db", "--env", "aws", "create-schema"]).unwrap();
        assert_eq!(cli.global.env_file(), PathBuf::from("credentials/.env.aws"));

        let cli = Cli::try_parse_from([
            "telecom-infra-db",
            "create-schema",
            "--env-file",
            "/etc/telecom.env",
        ])
        .unwrap();
        assert_eq!(cli.global.env_file(), PathBuf::from("/etc/telecom.env"));
    }
}
