//! Error types for the migration pipeline.
//!
//! The hierarchy follows the stages of a table run:
//!
//! - [`CsvError`] - reading the source table or writing the destination
//! - [`MappingError`] - turning one source row into output rows
//! - [`TableError`] - either of the above, for a single table
//! - [`PipelineError`] - top-level batch errors, tagged with the failing table
//!
//! `From` conversions let `?` cross every boundary except the last one:
//! wrapping a [`TableError`] into a [`PipelineError`] needs the table name,
//! so it goes through [`PipelineError::table`].

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Table;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading a source table or writing a destination table.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The source path does not exist.
    #[error("Source file not found: {}", path.display())]
    SourceFileNotFound { path: PathBuf },

    /// Failed to read or write a file.
    #[error("File access failed: {0}")]
    IoError(#[from] std::io::Error),

    /// The source bytes are not valid in the requested encoding.
    #[error("Failed to decode source: {0}")]
    EncodingError(String),

    /// A data row has a different number of fields than the header.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Any other tabular parsing or writing error.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),

    /// The finished temporary file could not replace the destination.
    #[error("Failed to replace destination file: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors raised while mapping a source row.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Text that must be a number is not one.
    #[error("Line {line}, column '{column}': '{value}' is not a number")]
    NumericParse {
        column: String,
        value: String,
        line: u64,
    },

    /// The source header does not name a column the mapping reads.
    #[error("Line {line}: source column '{column}' not found")]
    MissingSourceColumn { column: String, line: u64 },

    /// The mapped row lacks a column of the destination schema.
    #[error("Line {line}: output row is missing column '{column}'")]
    MissingColumn { column: String, line: u64 },

    /// The mapped row carries a column the destination schema does not declare.
    #[error("Line {line}: output row has unexpected column '{column}'")]
    UnexpectedColumn { column: String, line: u64 },
}

// =============================================================================
// Table Errors
// =============================================================================

/// Any failure of a single table run.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level batch errors.
///
/// Returned by [`crate::transform::pipeline::run_all`]. Every table failure is
/// fatal for the batch, so the failing table is carried for the diagnostic.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A table run failed.
    #[error("{table} table failed: {source}")]
    Table {
        table: Table,
        #[source]
        source: TableError,
    },

    /// The batch report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    ReportError(#[from] serde_json::Error),

    /// The batch report could not be written.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Tag a table-level failure with the table it came from.
    pub fn table(table: Table, source: impl Into<TableError>) -> Self {
        Self::Table {
            table,
            source: source.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reading and writing tables.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for row mapping.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for a single table run.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for batch operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> TableError -> PipelineError
        let csv_err = CsvError::MalformedRow {
            line: 4,
            expected: 3,
            found: 2,
        };
        let pipeline_err = PipelineError::table(Table::Shapes, csv_err);
        let msg = pipeline_err.to_string();
        assert!(msg.starts_with("shapes table failed"));
        assert!(msg.contains("Line 4"));

        // MappingError -> TableError -> PipelineError
        let mapping_err = MappingError::MissingSourceColumn {
            column: "route-trip".into(),
            line: 2,
        };
        let pipeline_err = PipelineError::table(Table::Trips, mapping_err);
        assert!(pipeline_err.to_string().contains("route-trip"));
    }

    #[test]
    fn test_numeric_parse_format() {
        let err = MappingError::NumericParse {
            column: "stop_lat".into(),
            value: "abc".into(),
            line: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 7"));
        assert!(msg.contains("stop_lat"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_source_not_found_names_path() {
        let err = CsvError::SourceFileNotFound {
            path: PathBuf::from("raw/stops.csv"),
        };
        assert!(err.to_string().contains("raw/stops.csv"));
    }
}
