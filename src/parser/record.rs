use crate::db::SqlValue;
use crate::schema::{Column, ColumnType, TableSchema};

/// A parsed row ready for insertion, aligned with the CSV header
pub struct ParsedRow {
    pub values: Vec<SqlValue>,
}

/// Resolve each header name to its declared column, if the table has one
pub fn header_columns(headers: &[String], schema: &TableSchema) -> Vec<Option<&'static Column>> {
    headers.iter().map(|h| schema.column(h)).collect()
}

/// Convert one CSV record using the declared column types
pub fn parse_record(record: &csv::StringRecord, columns: &[Option<&Column>]) -> ParsedRow {
    let values = columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let raw = record.get(idx).unwrap_or("");
            convert_cell(raw, col.map(|c| &c.col_type))
        })
        .collect();

    ParsedRow { values }
}

/// Convert a raw cell. Empty cells are NULL. Cells that do not parse as the
/// declared type are passed through as text for the storage engine to judge.
pub fn convert_cell(raw: &str, col_type: Option<&ColumnType>) -> SqlValue {
    if raw.is_empty() {
        return SqlValue::Null;
    }

    match col_type {
        Some(ColumnType::Integer) => parse_integer(raw),
        Some(ColumnType::Float) => raw
            .trim()
            .parse::<f64>()
            .map(SqlValue::Real)
            .unwrap_or_else(|_| SqlValue::Text(raw.to_string())),
        Some(ColumnType::Boolean) => parse_boolean(raw),
        Some(ColumnType::String(_))
        | Some(ColumnType::Enum(_))
        | Some(ColumnType::Geometry(_))
        | None => SqlValue::Text(raw.to_string()),
    }
}

/// Integers exported from float columns arrive as e.g. `12.0`
fn parse_integer(raw: &str) -> SqlValue {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return SqlValue::Integer(i);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => SqlValue::Integer(f as i64),
        _ => SqlValue::Text(raw.to_string()),
    }
}

fn parse_boolean(raw: &str) -> SqlValue {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "1.0" => SqlValue::Integer(1),
        "false" | "f" | "0" | "0.0" => SqlValue::Integer(0),
        _ => SqlValue::Text(raw.to_string()),
    }
}
