//! Generic table drivers.
//!
//! [`migrate`] runs a one-to-one mapping with optional discard,
//! [`migrate_expanded`] runs a one-to-many expansion. Both read the source
//! row by row, write the destination in schema order and report what
//! happened.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{MappingResult, TableResult};
use crate::models::{OutputRow, Table};
use crate::output::TableWriter;
use crate::parser::{SourceEncoding, SourceRow, SourceTable};

/// What a mapper decided for one source row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Emit(OutputRow),
    Discard { reason: String },
}

/// One-to-one row mapping for a table.
pub trait RowMapper {
    fn table(&self) -> Table;

    fn map_row(&mut self, row: &SourceRow<'_>) -> MappingResult<RowOutcome>;
}

/// One-to-many row expansion for a table.
pub trait RowExpander {
    fn table(&self) -> Table;

    /// Zero or more output rows, in write order.
    fn expand_row(&mut self, row: &SourceRow<'_>) -> MappingResult<Vec<OutputRow>>;
}

/// A source row that produced no output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscardedRow {
    pub line: u64,
    pub reason: String,
}

/// Outcome of one table run.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: Table,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub rows_read: usize,
    pub rows_written: usize,
    pub discarded: Vec<DiscardedRow>,
}

impl TableReport {
    fn new(table: Table, source: &Path, destination: &Path) -> Self {
        Self {
            table,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            rows_read: 0,
            rows_written: 0,
            discarded: Vec::new(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} rows read, {} written, {} discarded",
            self.table,
            self.rows_read,
            self.rows_written,
            self.discarded.len()
        )
    }
}

/// Run a one-to-one mapping from `source` to `destination`.
pub fn migrate<M: RowMapper>(
    source: &Path,
    destination: &Path,
    encoding: SourceEncoding,
    mapper: &mut M,
) -> TableResult<TableReport> {
    let table = mapper.table();
    info!(%table, source = %source.display(), "Importing {}", table);

    let mut reader = SourceTable::open(source, encoding)?;
    let mut writer = TableWriter::create(destination, table.schema())?;
    let mut report = TableReport::new(table, source, destination);

    while let Some(row) = reader.next_row()? {
        report.rows_read += 1;
        match mapper.map_row(&row)? {
            RowOutcome::Emit(out) => writer.write_row(&out, row.line())?,
            RowOutcome::Discard { reason } => {
                debug!(%table, line = row.line(), %reason, "Discarded row");
                report.discarded.push(DiscardedRow {
                    line: row.line(),
                    reason,
                });
            }
        }
    }

    report.rows_written = writer.finish()?;
    info!(
        %table,
        rows_read = report.rows_read,
        rows_written = report.rows_written,
        discarded = report.discarded.len(),
        "Done importing {}",
        table
    );
    Ok(report)
}

/// Run a one-to-many expansion from `source` to `destination`.
///
/// A row that expands to nothing is not a discard; it simply has no output.
pub fn migrate_expanded<E: RowExpander>(
    source: &Path,
    destination: &Path,
    encoding: SourceEncoding,
    expander: &mut E,
) -> TableResult<TableReport> {
    let table = expander.table();
    info!(%table, source = %source.display(), "Importing {}", table);

    let mut reader = SourceTable::open(source, encoding)?;
    let mut writer = TableWriter::create(destination, table.schema())?;
    let mut report = TableReport::new(table, source, destination);

    while let Some(row) = reader.next_row()? {
        report.rows_read += 1;
        for out in expander.expand_row(&row)? {
            writer.write_row(&out, row.line())?;
        }
    }

    report.rows_written = writer.finish()?;
    info!(
        %table,
        rows_read = report.rows_read,
        rows_written = report.rows_written,
        "Done importing {}",
        table
    );
    Ok(report)
}
