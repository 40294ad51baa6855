use anyhow::{bail, Context, Result};
use std::time::Instant;
use telecom_infra_db::{
    cli::{Cli, Commands},
    config::DatabaseConfig,
    db::{self, Database},
    logging,
    maintenance::{delete_by_country, query_by_country},
    schema::{table_names, DependencyResolver},
    writer::{create_data_model, discover_datasets, generate_script, load_datasets, Dataset},
};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.global.log_level.as_deref())?;

    match cli.command {
        Commands::Ddl { dialect, table } => {
            let resolver = DependencyResolver::new();
            let tables = match table {
                Some(names) => {
                    let names: Vec<&str> = names.iter().map(String::as_str).collect();
                    resolver.resolve_includes(&names)?
                }
                None => resolver.creation_order()?,
            };
            print!("{}", generate_script(&tables, dialect));
        }

        Commands::ListTables { live: false } => {
            for name in table_names() {
                println!("{}", name);
            }
        }

        command => {
            let env_file = cli.global.env_file();
            let config = DatabaseConfig::load(&env_file)
                .with_context(|| format!("failed to load configuration from {:?}", env_file))?;
            let mut conn = db::connect(&config)?;
            run_with_database(conn.as_mut(), command)?;
        }
    }

    Ok(())
}

fn run_with_database(db: &mut dyn Database, command: Commands) -> Result<()> {
    match command {
        Commands::CreateSchema => {
            let report = create_data_model(db)?;
            println!(
                "Created {} tables ({} dropped first)",
                report.created.len(),
                report.dropped.len()
            );
        }

        Commands::Load {
            table,
            files,
            country,
            data_dir,
        } => {
            let datasets = match (country, table) {
                (Some(country), _) => discover_datasets(&data_dir, &country)
                    .with_context(|| format!("failed to discover data sets under {:?}", data_dir))?,
                (None, Some(table)) => files
                    .into_iter()
                    .map(|path| Dataset::new(table.as_str(), path))
                    .collect(),
                (None, None) => bail!("either --table with files or --country is required"),
            };

            let start = Instant::now();
            let report = load_datasets(db, &datasets)?;
            info!(
                datasets = report.datasets.len(),
                rows = report.total_rows(),
                elapsed_secs = start.elapsed().as_secs_f64(),
                "load finished"
            );

            println!(
                "Loaded {} rows from {} data sets",
                report.total_rows(),
                report.datasets.len() - report.failures().len()
            );

            let failures = report.failures();
            if !failures.is_empty() {
                for failed in &failures {
                    eprintln!("failed: {} ({})", failed.dataset.path.display(), failed.dataset.table);
                }
                bail!("{} of {} data sets failed to load", failures.len(), report.datasets.len());
            }
        }

        Commands::Delete { country, table } => {
            let deleted = delete_by_country(db, &table, &country)?;
            println!("Deleted {} rows from {}", deleted, table);
        }

        Commands::Query {
            country,
            table,
            limit,
            json,
        } => {
            let result = query_by_country(db, &table, &country)?;
            if json {
                for row in result.to_json_rows() {
                    println!("{}", row);
                }
            } else {
                println!("{}", result.render_table(limit));
            }
        }

        Commands::ListTables { live: true } => {
            for name in db.table_names()? {
                println!("{}", name);
            }
        }

        Commands::Ddl { .. } | Commands::ListTables { live: false } => {
            unreachable!("handled without a database connection")
        }
    }

    Ok(())
}
