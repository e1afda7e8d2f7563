//! Data ingestion

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Number of rows polars inspects when inferring column dtypes
const INFER_SCHEMA_ROWS: usize = 100;

/// Anything that can hand the pipeline a table to work on.
pub trait DataSource {
    /// Human readable origin of the data, used in log lines
    fn describe(&self) -> String;

    /// Produce the raw table
    fn load(&self) -> Result<DataFrame>;
}

/// An already materialised frame is its own source.
impl DataSource for DataFrame {
    fn describe(&self) -> String {
        format!("in-memory frame ({} rows)", self.height())
    }

    fn load(&self) -> Result<DataFrame> {
        Ok(self.clone())
    }
}

/// Reads a delimited text file from disk
#[derive(Debug, Clone)]
pub struct IngestData {
    data_path: PathBuf,
    delimiter: u8,
    has_header: bool,
}

impl IngestData {
    /// Create an ingestor for `data_path`; `.tsv` files are read tab separated
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        let data_path = data_path.into();
        let delimiter = match data_path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };

        Self {
            data_path,
            delimiter,
            has_header: true,
        }
    }

    /// Override the field separator
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Declare whether the first line is a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.data_path
    }

    /// Ingest the data from the configured path
    pub fn get_data(&self) -> Result<DataFrame> {
        info!("Ingesting data from {}", self.data_path.display());

        // Open eagerly so a missing file surfaces as an IO error
        let file = File::open(&self.data_path)?;

        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);

        let df = CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| PipelineError::DataError(e.to_string()))?;

        info!(rows = df.height(), cols = df.width(), "Ingestion complete");
        Ok(df)
    }
}

impl DataSource for IngestData {
    fn describe(&self) -> String {
        self.data_path.display().to_string()
    }

    fn load(&self) -> Result<DataFrame> {
        self.get_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_io_error() {
        let ingest = IngestData::new("/definitely/not/here.csv");
        let err = ingest.get_data().unwrap_err();
        assert!(matches!(err, PipelineError::IoError(_)));
    }

    #[test]
    fn test_tsv_extension_selects_tab() {
        let ingest = IngestData::new("data/orders.tsv");
        assert_eq!(ingest.delimiter, b'\t');
        let ingest = IngestData::new("data/orders.csv");
        assert_eq!(ingest.delimiter, b',');
    }

    #[test]
    fn test_load_csv_with_empty_fields_as_nulls() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "a,b,c").unwrap();
        writeln!(file, "1,2.5,x").unwrap();
        writeln!(file, "2,,").unwrap();
        writeln!(file, "3,4.5,z").unwrap();
        file.flush().unwrap();

        let df = IngestData::new(file.path()).load().unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.column("b").unwrap().null_count(), 1);
        assert_eq!(df.column("c").unwrap().null_count(), 1);
    }

    #[test]
    fn test_frame_is_a_source() {
        let df = df!("x" => &[1.0, 2.0]).unwrap();
        let loaded = df.load().unwrap();
        assert!(loaded.equals(&df));
        assert!(df.describe().contains("2 rows"));
    }
}
