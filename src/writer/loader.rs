use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::db::{Database, Dialect, SqlValue};
use crate::error::{Error, Result};
use crate::maintenance::normalize_country_code;
use crate::parser::{header_columns, parse_record, read_csv, CsvData};
use crate::schema::{get_table, table_for_dataset_dir, DependencyResolver, TableSchema};

/// One CSV file bound to its target table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub table: String,
    pub path: PathBuf,
}

impl Dataset {
    pub fn new(table: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            table: table.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetOutcome {
    Loaded { rows: u64 },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    pub dataset: Dataset,
    pub outcome: DatasetOutcome,
}

/// Result of a load run. Failed data sets were rolled back individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub datasets: Vec<DatasetReport>,
}

impl LoadReport {
    pub fn total_rows(&self) -> u64 {
        self.datasets
            .iter()
            .map(|d| match d.outcome {
                DatasetOutcome::Loaded { rows } => rows,
                DatasetOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> Vec<&DatasetReport> {
        self.datasets
            .iter()
            .filter(|d| matches!(d.outcome, DatasetOutcome::Failed { .. }))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }
}

/// Append every row of every data set to its table.
///
/// All files are read before anything is written, so a missing or malformed
/// file aborts the run untouched. Each data set then runs under its own
/// savepoint: a failing one is rolled back and recorded while the others
/// continue. One commit follows the last data set.
pub fn load_datasets(db: &mut dyn Database, datasets: &[Dataset]) -> Result<LoadReport> {
    let mut prepared: Vec<(&Dataset, &'static TableSchema, CsvData)> = Vec::new();
    for dataset in datasets {
        let schema = get_table(&dataset.table)
            .ok_or_else(|| Error::UnknownTable(dataset.table.clone()))?;
        let data = read_csv(&dataset.path)?;
        prepared.push((dataset, schema, data));
    }

    let mut report = LoadReport::default();
    db.begin()?;

    for (idx, (dataset, schema, data)) in prepared.into_iter().enumerate() {
        let savepoint = format!("load_{}", idx);
        db.savepoint(&savepoint)?;

        let outcome = match insert_csv(db, schema, &data) {
            Ok(rows) => {
                db.release_savepoint(&savepoint)?;
                info!(table = schema.name, path = %dataset.path.display(), rows, "data added");
                DatasetOutcome::Loaded { rows }
            }
            Err(e) => {
                db.rollback_to_savepoint(&savepoint)?;
                db.release_savepoint(&savepoint)?;
                warn!(table = schema.name, path = %dataset.path.display(), error = %e, "load failed");
                DatasetOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        report.datasets.push(DatasetReport {
            dataset: dataset.clone(),
            outcome,
        });
    }

    db.commit()?;
    Ok(report)
}

fn insert_csv(db: &mut dyn Database, schema: &TableSchema, data: &CsvData) -> Result<u64> {
    if data.is_empty() {
        return Ok(0);
    }

    let columns = header_columns(&data.headers, schema);
    let sql = insert_sql(schema, &data.headers, db.dialect());
    let rows: Vec<Vec<SqlValue>> = data
        .records
        .iter()
        .map(|record| parse_record(record, &columns).values)
        .collect();

    db.insert_rows(&sql, &rows)
}

/// INSERT statement for the CSV header. Header names are used verbatim;
/// names the table lacks are left for the engine to reject.
pub fn insert_sql(schema: &TableSchema, headers: &[String], dialect: Dialect) -> String {
    let names: Vec<String> = headers.iter().map(|h| dialect.quote(h)).collect();
    let placeholders: Vec<&str> = headers
        .iter()
        .map(|h| dialect.value_placeholder(schema.column(h).map(|c| &c.col_type)))
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote(schema.name),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Find the data sets of one country under `data/<country>/processed/<table-type>/`.
///
/// Parents come before children so foreign keys resolve; files of one table
/// are loaded in name order. Directories that match no table are skipped.
pub fn discover_datasets(data_root: &Path, country_code: &str) -> Result<Vec<Dataset>> {
    let country = normalize_country_code(country_code)?;
    let processed = data_root.join(&country).join("processed");
    let resolver = DependencyResolver::new();

    let mut found: Vec<(usize, Dataset)> = Vec::new();
    for entry in fs::read_dir(&processed)? {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }

        let dir_name = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let Some(schema) = table_for_dataset_dir(dir_name) else {
            warn!(dir = %dir.display(), "no table matches directory, skipping");
            continue;
        };

        for file in fs::read_dir(&dir)? {
            let path = file?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                found.push((resolver.rank(schema.name), Dataset::new(schema.name, path)));
            }
        }
    }

    found.sort_by(|(rank_a, a), (rank_b, b)| rank_a.cmp(rank_b).then_with(|| a.path.cmp(&b.path)));
    Ok(found.into_iter().map(|(_, dataset)| dataset).collect())
}
