//! Country-scoped delete and query.
//!
//! Only tables carrying a `country_code` column are accepted. Both operations
//! bind the code as a parameter.

use tracing::{info, warn};

use crate::db::{Database, ResultSet, SqlValue};
use crate::error::{Error, Result};
use crate::schema::{get_table, TableSchema};

pub const DEFAULT_TABLE: &str = "point_of_interest";

const COUNTRY_COLUMN: &str = "country_code";

/// Country codes are ISO 3166 alpha-3, stored upper case
pub fn normalize_country_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(Error::InvalidCountryCode(code.to_string()))
    }
}

/// Catalog table that can be filtered by country
pub fn country_table(name: &str) -> Result<&'static TableSchema> {
    let schema = get_table(name).ok_or_else(|| Error::UnknownTable(name.to_string()))?;
    if schema.has_column(COUNTRY_COLUMN) {
        Ok(schema)
    } else {
        Err(Error::NoCountryColumn(name.to_string()))
    }
}

/// Delete every row of `table` for one country and commit.
/// Returns the number of rows removed.
pub fn delete_by_country(db: &mut dyn Database, table: &str, country_code: &str) -> Result<u64> {
    let schema = country_table(table)?;
    let code = normalize_country_code(country_code)?;
    let dialect = db.dialect();
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        dialect.quote(schema.name),
        dialect.quote(COUNTRY_COLUMN)
    );

    db.begin()?;
    let deleted = match db.execute(&sql, &[SqlValue::Text(code.clone())]) {
        Ok(n) => n,
        Err(e) => {
            if let Err(rollback) = db.rollback() {
                warn!(error = %rollback, "rollback failed");
            }
            return Err(e);
        }
    };
    db.commit()?;

    info!(table = schema.name, country = %code, deleted, "rows deleted");
    Ok(deleted)
}

/// Every row of `table` for one country
pub fn query_by_country(
    db: &mut dyn Database,
    table: &str,
    country_code: &str,
) -> Result<ResultSet> {
    let schema = country_table(table)?;
    let code = normalize_country_code(country_code)?;
    let dialect = db.dialect();
    let sql = format!(
        "SELECT * FROM {} WHERE {} = ?",
        dialect.quote(schema.name),
        dialect.quote(COUNTRY_COLUMN)
    );

    let result = db.query(&sql, &[SqlValue::Text(code)])?;
    info!(table = schema.name, rows = result.len(), "query finished");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteDatabase;
    use crate::writer::create_data_model;

    fn seeded() -> SqliteDatabase {
        let mut db = SqliteDatabase::open_in_memory().unwrap();
        create_data_model(&mut db).unwrap();
        for (id, cc) in [("p1", "ESP"), ("p2", "ESP"), ("p3", "FRA")] {
            db.execute(
                "INSERT INTO point_of_interest (poi_id, dataset_id, lat, lon, poi_type, country_code) \
                 VALUES (?, 'd1', 0.0, 0.0, 'school', ?)",
                &[SqlValue::from(id), SqlValue::from(cc)],
            )
            .unwrap();
        }
        db
    }

    #[test]
    fn test_normalize_country_code() {
        assert_eq!(normalize_country_code("esp").unwrap(), "ESP");
        assert_eq!(normalize_country_code(" FRA ").unwrap(), "FRA");
        assert!(normalize_country_code("ES").is_err());
        assert!(normalize_country_code("E1P").is_err());
        assert!(normalize_country_code("ESP'; --").is_err());
    }

    #[test]
    fn test_country_table() {
        assert!(country_table("cell_site").is_ok());
        assert!(country_table("transmission_node").is_ok());
        assert!(matches!(
            country_table("mapping_result"),
            Err(Error::NoCountryColumn(_))
        ));
        assert!(matches!(country_table("nope"), Err(Error::UnknownTable(_))));
    }

    #[test]
    fn test_delete_then_query() {
        let mut db = seeded();

        let esp = query_by_country(&mut db, DEFAULT_TABLE, "ESP").unwrap();
        assert_eq!(esp.len(), 2);

        assert_eq!(delete_by_country(&mut db, DEFAULT_TABLE, "esp").unwrap(), 2);
        assert!(query_by_country(&mut db, DEFAULT_TABLE, "ESP").unwrap().is_empty());

        let fra = query_by_country(&mut db, DEFAULT_TABLE, "FRA").unwrap();
        assert_eq!(fra.len(), 1);
        assert_eq!(fra.value(0, "poi_id"), Some(&SqlValue::from("p3")));
    }

    #[test]
    fn test_delete_unknown_country_removes_nothing() {
        let mut db = seeded();
        assert_eq!(delete_by_country(&mut db, DEFAULT_TABLE, "DEU").unwrap(), 0);
        assert_eq!(query_by_country(&mut db, DEFAULT_TABLE, "FRA").unwrap().len(), 1);
    }
}
