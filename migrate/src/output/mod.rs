//! Destination table writing.
//!
//! Rows are written in the schema's fixed column order with text quoted and
//! numbers bare, CRLF-terminated. Output goes to a temporary file next to the
//! destination and only replaces it once the table is complete, so a failed
//! run never leaves a half-written table behind.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::{CsvError, CsvResult, MappingError, MappingResult, TableResult};
use crate::models::{quote, OutputRow, TableSchema};

/// Writer for one destination table.
pub struct TableWriter {
    destination: PathBuf,
    schema: &'static TableSchema,
    writer: csv::Writer<NamedTempFile>,
    rows_written: usize,
}

impl TableWriter {
    /// Start a destination table and write its header line.
    ///
    /// Missing parent directories are created.
    pub fn create(destination: &Path, schema: &'static TableSchema) -> CsvResult<Self> {
        let dir = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let file = temp_builder().tempfile_in(&dir)?;
        keep_destination_mode(&file, destination)?;
        debug!(
            destination = %destination.display(),
            temp = %file.path().display(),
            "Opened temporary output"
        );

        // Fields arrive already quoted, so the csv writer must not quote again.
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::CRLF)
            .from_writer(file);
        writer.write_record(schema.columns().iter().map(|c| quote(c)))?;

        Ok(Self {
            destination: destination.to_path_buf(),
            schema,
            writer,
            rows_written: 0,
        })
    }

    /// Write one mapped row. `line` is the source line it came from.
    pub fn write_row(&mut self, row: &OutputRow, line: u64) -> TableResult<()> {
        let fields = align(row, self.schema, line)?;
        self.writer
            .write_record(&fields)
            .map_err(CsvError::from)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush and move the finished table over the destination.
    pub fn finish(mut self) -> CsvResult<usize> {
        self.writer.flush()?;
        let file = self.writer.into_inner().map_err(|e| {
            CsvError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string()))
        })?;
        file.persist(&self.destination)?;
        debug!(
            destination = %self.destination.display(),
            rows = self.rows_written,
            "Persisted table"
        );
        Ok(self.rows_written)
    }
}

/// Temp files are created 0o600; ask for 0o666 so the umask decides, as
/// for any freshly created file.
#[cfg(unix)]
fn temp_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_builder() -> Builder<'static, 'static> {
    Builder::new()
}

/// A rerun keeps whatever mode the existing table has.
#[cfg(unix)]
fn keep_destination_mode(file: &NamedTempFile, destination: &Path) -> CsvResult<()> {
    if let Ok(metadata) = fs::metadata(destination) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn keep_destination_mode(_file: &NamedTempFile, _destination: &Path) -> CsvResult<()> {
    Ok(())
}

/// Order a row's values by the schema, rendered as raw CSV fields.
///
/// The row must carry exactly the schema's columns.
pub fn align(row: &OutputRow, schema: &TableSchema, line: u64) -> MappingResult<Vec<String>> {
    if let Some(column) = row.columns().find(|c| !schema.contains(c)) {
        return Err(MappingError::UnexpectedColumn {
            column: column.to_string(),
            line,
        });
    }

    schema
        .columns()
        .iter()
        .map(|column| {
            row.get(column)
                .map(|v| v.to_csv_field())
                .ok_or_else(|| MappingError::MissingColumn {
                    column: column.to_string(),
                    line,
                })
        })
        .collect()
}
