use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// A CSV file read fully into memory
#[derive(Debug, Clone)]
pub struct CsvData {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub records: Vec<csv::StringRecord>,
}

impl CsvData {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a whole CSV file. The first row is the header.
pub fn read_csv(path: &Path) -> Result<CsvData> {
    let csv_error = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(csv_error)?;

    debug!(path = %path.display(), rows = records.len(), "read csv");

    Ok(CsvData {
        path: path.to_path_buf(),
        headers,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pointofinterest.csv");
        std::fs::write(&path, "poi_id,country_code\np1,ESP\np2,\"FRA\"\n").unwrap();

        let data = read_csv(&path).unwrap();
        assert_eq!(data.headers, vec!["poi_id", "country_code"]);
        assert_eq!(data.len(), 2);
        assert_eq!(data.records[1].get(1), Some("FRA"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_csv(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(Error::Csv { .. })));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2\n3\n").unwrap();
        assert!(read_csv(&path).is_err());
    }
}
