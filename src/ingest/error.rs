use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::DatasetError;

/// Errors that can occur while reading the input tables
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input file could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        /// Path that was opened
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Required column absent from the header
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn {
        /// Table being read
        table: &'static str,
        /// Normalized column name
        column: &'static str,
    },

    /// Cell that should hold a number does not parse
    #[error("Invalid number '{value}' in {table}, line {line}, column '{column}'")]
    InvalidNumber {
        /// Table being read
        table: &'static str,
        /// 1-based line number, header included
        line: usize,
        /// Normalized column name
        column: String,
        /// Cell content
        value: String,
    },

    /// Key cell of a non-empty row is blank
    #[error("Missing value for '{column}' in {table}, line {line}")]
    MissingCell {
        /// Table being read
        table: &'static str,
        /// 1-based line number, header included
        line: usize,
        /// Normalized column name
        column: &'static str,
    },

    /// Quantitation export row whose `type` is not area, concentration or retention time
    #[error("Unknown row type '{value}' in quant_file, line {line}")]
    InvalidRowType {
        /// 1-based line number, header included
        line: usize,
        /// Cell content
        value: String,
    },

    /// Tables parsed but do not form a dataset
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
