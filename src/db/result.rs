use serde_json::{Map, Value};

use super::value::SqlValue;

/// A fully materialized query result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in row `row`
    pub fn value(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// All values of one column, in row order
    pub fn column_values(&self, column: &str) -> Vec<&SqlValue> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().filter_map(|r| r.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| {
                        (name.clone(), serde_json::to_value(value).unwrap_or(Value::Null))
                    })
                    .collect();
                Value::Object(object)
            })
            .collect()
    }

    /// Render the first `limit` rows as an aligned text table
    pub fn render_table(&self, limit: usize) -> String {
        let shown: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(limit)
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &shown {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(idx) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let format_line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line(&self.columns));
        out.push('\n');
        for row in &shown {
            out.push_str(&format_line(row));
            out.push('\n');
        }
        if self.rows.len() > shown.len() {
            out.push_str("...\n");
        }
        out.push_str(&format!(
            "[{} rows x {} columns]",
            self.rows.len(),
            self.columns.len()
        ));

        out
    }
}
