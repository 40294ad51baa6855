use crate::db::Dialect;
use crate::schema::{Column, ColumnType, TableSchema};

/// SQL type for a column in the given dialect, including any CHECK clause
fn column_sql_type(col: &Column, dialect: Dialect) -> String {
    match (&col.col_type, dialect) {
        // INTEGER PRIMARY KEY would alias the rowid and fill in missing keys
        (ColumnType::Integer, Dialect::Sqlite) if col.primary_key => "INT".to_string(),
        (ColumnType::Integer, _) => "INTEGER".to_string(),
        (ColumnType::Float, Dialect::Sqlite) => "REAL".to_string(),
        (ColumnType::Float, Dialect::MySql) => "FLOAT".to_string(),
        (ColumnType::Boolean, Dialect::Sqlite) => "INTEGER".to_string(),
        (ColumnType::Boolean, Dialect::MySql) => "BOOL".to_string(),
        (ColumnType::String(_), Dialect::Sqlite) => "TEXT".to_string(),
        (ColumnType::String(len), Dialect::MySql) => format!("VARCHAR({})", len),
        (ColumnType::Enum(values), Dialect::Sqlite) => format!(
            "TEXT CHECK ({} IN ({}))",
            dialect.quote(col.name),
            quote_literals(values)
        ),
        (ColumnType::Enum(values), Dialect::MySql) => format!("ENUM({})", quote_literals(values)),
        (ColumnType::Geometry(_), Dialect::Sqlite) => "TEXT".to_string(),
        (ColumnType::Geometry(kind), Dialect::MySql) => kind.sql_name().to_string(),
    }
}

fn quote_literals(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema, dialect: Dialect) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", dialect.quote(schema.name));
    let mut columns = Vec::new();

    for col in schema.columns {
        let pk = if col.primary_key { " PRIMARY KEY" } else { "" };
        let null_constraint = if !col.nullable || col.primary_key {
            " NOT NULL"
        } else {
            ""
        };

        columns.push(format!(
            "    {} {}{}{}",
            dialect.quote(col.name),
            column_sql_type(col, dialect),
            pk,
            null_constraint
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            dialect.quote(fk.column),
            dialect.quote(fk.references_table),
            dialect.quote(fk.references_column)
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for declared indexes and foreign key columns
pub fn generate_indexes(schema: &TableSchema, dialect: Dialect) -> Vec<String> {
    let mut index_columns: Vec<Vec<&str>> =
        schema.indexes.iter().map(|idx| idx.columns.to_vec()).collect();

    for fk in schema.foreign_keys {
        if !index_columns.iter().any(|cols| cols.as_slice() == [fk.column]) {
            index_columns.push(vec![fk.column]);
        }
    }

    index_columns
        .into_iter()
        .map(|cols| {
            let name = format!("idx_{}_{}", schema.name, cols.join("_"));
            let quoted: Vec<String> = cols.iter().map(|c| dialect.quote(c)).collect();
            format!(
                "CREATE INDEX {} ON {}({})",
                dialect.quote(&name),
                dialect.quote(schema.name),
                quoted.join(", ")
            )
        })
        .collect()
}

pub fn generate_drop_table(table: &str, dialect: Dialect) -> String {
    format!("DROP TABLE IF EXISTS {}", dialect.quote(table))
}

/// Full DDL script for the given tables, in the order given
pub fn generate_script(tables: &[&TableSchema], dialect: Dialect) -> String {
    let mut statements = Vec::new();

    for schema in tables {
        statements.push(generate_create_table(schema, dialect));
        statements.extend(generate_indexes(schema, dialect));
    }

    let mut script = statements.join(";\n\n");
    script.push_str(";\n");
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{
        ANALYSIS_COVERAGE_ASSOCIATION, CELL_COVERAGE, CELL_SITE, FIBER_PATH_RESULT_EDGE,
        MAPPING_RESULT, POINT_OF_INTEREST,
    };

    #[test]
    fn test_generate_create_table_sqlite() {
        let sql = generate_create_table(&CELL_SITE, Dialect::Sqlite);
        assert!(sql.starts_with("CREATE TABLE \"cell_site\" ("));
        assert!(sql.contains("\"ict_id\" TEXT PRIMARY KEY NOT NULL"));
        assert!(sql.contains("\"country_code\" TEXT NOT NULL"));
        assert!(sql.contains(
            "\"radio_type\" TEXT CHECK (\"radio_type\" IN ('2G', '3G', '4G', '5G'))"
        ));
    }

    #[test]
    fn test_generate_create_table_mysql() {
        let sql = generate_create_table(&POINT_OF_INTEREST, Dialect::MySql);
        assert!(sql.contains("`poi_id` VARCHAR(50) PRIMARY KEY NOT NULL"));
        assert!(sql.contains("`country_code` VARCHAR(3) NOT NULL"));
        assert!(sql.contains("`lat` FLOAT NOT NULL"));
        assert!(sql.contains("`is_public` BOOL"));
        assert!(sql.contains("`connectivity_type` ENUM('unknown', 'mobile',"));
    }

    #[test]
    fn test_primary_keys_are_not_null() {
        let sqlite = generate_create_table(&CELL_COVERAGE, Dialect::Sqlite);
        assert!(sqlite.contains("\"contour_id\" INT PRIMARY KEY NOT NULL"));
        assert!(sqlite.contains("\"fid\" INTEGER,"));

        let mysql = generate_create_table(&CELL_COVERAGE, Dialect::MySql);
        assert!(mysql.contains("`contour_id` INTEGER PRIMARY KEY NOT NULL"));
    }

    #[test]
    fn test_foreign_keys_rendered() {
        let sql = generate_create_table(&MAPPING_RESULT, Dialect::Sqlite);
        assert!(sql.contains(
            "FOREIGN KEY (\"poi_id\") REFERENCES \"point_of_interest\"(\"poi_id\")"
        ));

        let sql = generate_create_table(&ANALYSIS_COVERAGE_ASSOCIATION, Dialect::MySql);
        assert!(!sql.contains("PRIMARY KEY"));
        assert!(sql.contains("`contour_id` INTEGER"));
        assert!(sql.contains("REFERENCES `cell_coverage`(`contour_id`)"));
    }

    #[test]
    fn test_geometry_columns() {
        let mysql = generate_create_table(&FIBER_PATH_RESULT_EDGE, Dialect::MySql);
        assert!(mysql.contains("`geometry` LINESTRING"));
        assert!(mysql.contains("`key` INTEGER"));

        let sqlite = generate_create_table(&FIBER_PATH_RESULT_EDGE, Dialect::Sqlite);
        assert!(sqlite.contains("\"geometry\" TEXT"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&MAPPING_RESULT, Dialect::Sqlite);
        assert_eq!(
            indexes,
            vec!["CREATE INDEX \"idx_mapping_result_poi_id\" ON \"mapping_result\"(\"poi_id\")"]
        );

        let indexes = generate_indexes(&POINT_OF_INTEREST, Dialect::MySql);
        assert_eq!(indexes.len(), POINT_OF_INTEREST.indexes.len());
        assert!(indexes.iter().any(|i| i.contains("`idx_point_of_interest_dataset_id`")));
    }

    #[test]
    fn test_generate_drop_table() {
        assert_eq!(
            generate_drop_table("cell_site", Dialect::MySql),
            "DROP TABLE IF EXISTS `cell_site`"
        );
    }

    #[test]
    fn test_generate_script_terminates_statements() {
        let script = generate_script(&[&POINT_OF_INTEREST, &MAPPING_RESULT], Dialect::Sqlite);
        assert!(script.ends_with(";\n"));
        let creates = script.matches("CREATE TABLE").count();
        assert_eq!(creates, 2);
    }
}
