use tracing::{info, warn};

use super::schema_gen::{generate_create_table, generate_drop_table, generate_indexes};
use crate::db::Database;
use crate::error::Result;
use crate::schema::DependencyResolver;

/// Tables seen before and after provisioning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvisionReport {
    pub existing_before: Vec<String>,
    pub dropped: Vec<&'static str>,
    pub created: Vec<&'static str>,
    pub present_after: Vec<String>,
}

/// Drop every known table, then create the full data model.
///
/// Destroys all data held in the catalog tables. Tables outside the catalog
/// are left alone.
pub fn create_data_model(db: &mut dyn Database) -> Result<ProvisionReport> {
    let resolver = DependencyResolver::new();
    let dialect = db.dialect();
    let mut report = ProvisionReport {
        existing_before: db.table_names()?,
        ..Default::default()
    };

    if report.existing_before.is_empty() {
        info!("database has no tables");
    } else {
        info!(tables = ?report.existing_before, "tables already in the database");
    }

    report.dropped = drop_known_tables(db, &resolver)?;
    info!(count = report.dropped.len(), "dropped known tables");

    for schema in resolver.creation_order()? {
        db.execute(&generate_create_table(schema, dialect), &[])?;
        for index_sql in generate_indexes(schema, dialect) {
            db.execute(&index_sql, &[])?;
        }
        report.created.push(schema.name);
    }

    report.present_after = db.table_names()?;
    info!(tables = ?report.present_after, "database model created");

    Ok(report)
}

/// Drop catalog tables with foreign key checks disabled. Checks are turned
/// back on even when a drop fails.
fn drop_known_tables(
    db: &mut dyn Database,
    resolver: &DependencyResolver,
) -> Result<Vec<&'static str>> {
    let dialect = db.dialect();
    let tables = resolver.drop_order()?;

    db.set_foreign_key_checks(false)?;

    let mut dropped = Vec::with_capacity(tables.len());
    let mut outcome: Result<()> = Ok(());
    for schema in tables {
        if let Err(e) = db.execute(&generate_drop_table(schema.name, dialect), &[]) {
            warn!(table = schema.name, error = %e, "failed to drop table");
            outcome = Err(e);
            break;
        }
        dropped.push(schema.name);
    }

    let restored = db.set_foreign_key_checks(true);
    outcome?;
    restored?;
    Ok(dropped)
}
