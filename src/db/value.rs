use std::fmt;

use serde::Serialize;

/// A single cell value moving between CSV files, statements and result sets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }

    pub fn from_sqlite(value: rusqlite::types::ValueRef<'_>) -> Self {
        use rusqlite::types::ValueRef;

        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }

    pub fn to_mysql(&self) -> mysql_async::Value {
        match self {
            SqlValue::Null => mysql_async::Value::NULL,
            SqlValue::Integer(i) => mysql_async::Value::Int(*i),
            SqlValue::Real(f) => mysql_async::Value::Double(*f),
            SqlValue::Text(s) => mysql_async::Value::Bytes(s.as_bytes().to_vec()),
        }
    }

    pub fn from_mysql(value: mysql_async::Value) -> Self {
        use mysql_async::Value;

        match value {
            Value::NULL => SqlValue::Null,
            Value::Int(i) => SqlValue::Integer(i),
            Value::UInt(u) => i64::try_from(u)
                .map(SqlValue::Integer)
                .unwrap_or_else(|_| SqlValue::Text(u.to_string())),
            Value::Float(f) => SqlValue::Real(f64::from(f)),
            Value::Double(f) => SqlValue::Real(f),
            Value::Bytes(bytes) => SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned()),
            Value::Date(year, month, day, hour, min, sec, micro) => SqlValue::Text(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
                year, month, day, hour, min, sec, micro
            )),
            Value::Time(negative, days, hours, mins, secs, micros) => SqlValue::Text(format!(
                "{}{}:{:02}:{:02}.{:06}",
                if negative { "-" } else { "" },
                days * 24 + u32::from(hours),
                mins,
                secs,
                micros
            )),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Integer(i)
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Real(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_unsigned_overflow_falls_back_to_text() {
        assert_eq!(
            SqlValue::from_mysql(mysql_async::Value::UInt(7)),
            SqlValue::Integer(7)
        );
        assert_eq!(
            SqlValue::from_mysql(mysql_async::Value::UInt(u64::MAX)),
            SqlValue::Text(u64::MAX.to_string())
        );
    }

    #[test]
    fn test_json_serialization_is_untagged() {
        let row = vec![
            SqlValue::Null,
            SqlValue::Integer(3),
            SqlValue::Real(1.5),
            SqlValue::from("ESP"),
        ];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[null,3,1.5,"ESP"]"#);
    }
}
