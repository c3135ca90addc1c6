//! Batch pipeline over all six tables.
//!
//! Tables run one after the other in a fixed order; the first failure stops
//! the batch. Each table reads only its own agency export, so later tables
//! never depend on the output of earlier ones.
//!
//! # Example
//!
//! ```rust,no_run
//! use gtfs_migrate::transform::pipeline::{run_all, MigrateOptions};
//!
//! let options = MigrateOptions {
//!     input_dir: "raw".into(),
//!     ..MigrateOptions::default()
//! };
//! let report = run_all(&options)?;
//! println!("{}", report.summary());
//! # Ok::<(), gtfs_migrate::PipelineError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::models::Table;
use crate::parser::SourceEncoding;
use crate::transform::driver::{migrate, migrate_expanded, TableReport};
use crate::transform::tables::{
    RoutesMapper, ShapesMapper, StopTimesMapper, StopsMapper, TripStartTimesExpander, TripsMapper,
};
use crate::validation::CoordinateBounds;

/// Default directory the tables are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "tables";

/// Options for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateOptions {
    /// Directory holding the agency exports
    pub input_dir: PathBuf,

    /// Directory the tables are written to (created if missing)
    pub output_dir: PathBuf,

    /// Encoding of the agency exports
    pub encoding: SourceEncoding,

    /// Keep only the first route row per route id
    pub dedupe_routes: bool,

    /// Bound policy for shape points
    pub bounds: CoordinateBounds,

    /// Tables to run; always run in batch order regardless of this order
    pub tables: Vec<Table>,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            encoding: SourceEncoding::default(),
            dedupe_routes: false,
            bounds: CoordinateBounds::default(),
            tables: Table::ALL.to_vec(),
        }
    }
}

impl MigrateOptions {
    pub fn source_path(&self, table: Table) -> PathBuf {
        self.input_dir.join(table.source_file())
    }

    pub fn destination_path(&self, table: Table) -> PathBuf {
        self.output_dir.join(table.destination_file())
    }

    /// Selected tables in batch order, without repeats.
    pub fn selected_tables(&self) -> Vec<Table> {
        Table::ALL
            .into_iter()
            .filter(|t| self.tables.contains(t))
            .collect()
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub tables: Vec<TableReport>,
}

impl BatchReport {
    pub fn rows_written(&self) -> usize {
        self.tables.iter().map(|t| t.rows_written).sum()
    }

    pub fn rows_discarded(&self) -> usize {
        self.tables.iter().map(|t| t.discarded.len()).sum()
    }

    pub fn get(&self, table: Table) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} tables, {} rows written, {} discarded",
            self.tables.len(),
            self.rows_written(),
            self.rows_discarded()
        )
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> PipelineResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Run the selected tables in batch order.
pub fn run_all(options: &MigrateOptions) -> PipelineResult<BatchReport> {
    let tables = options.selected_tables();
    info!(
        input_dir = %options.input_dir.display(),
        output_dir = %options.output_dir.display(),
        tables = tables.len(),
        "Starting migration"
    );

    let mut report = BatchReport::default();
    for table in tables {
        let table_report = run_table(table, options)?;
        info!("{}", table_report.summary());
        report.tables.push(table_report);
    }

    info!("{}", report.summary());
    Ok(report)
}

/// Run a single table.
pub fn run_table(table: Table, options: &MigrateOptions) -> PipelineResult<TableReport> {
    let source = options.source_path(table);
    let destination = options.destination_path(table);
    let encoding = options.encoding;

    let result = match table {
        Table::Stops => migrate(&source, &destination, encoding, &mut StopsMapper),
        Table::Trips => migrate(&source, &destination, encoding, &mut TripsMapper),
        Table::Routes => migrate(
            &source,
            &destination,
            encoding,
            &mut RoutesMapper::new(options.dedupe_routes),
        ),
        Table::Shapes => migrate(
            &source,
            &destination,
            encoding,
            &mut ShapesMapper::new(options.bounds),
        ),
        Table::StopTimes => migrate(&source, &destination, encoding, &mut StopTimesMapper::new()),
        Table::TripStartTimes => migrate_expanded(
            &source,
            &destination,
            encoding,
            &mut TripStartTimesExpander,
        ),
    };

    result.map_err(|e| PipelineError::table(table, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = MigrateOptions::default();
        assert_eq!(opts.output_dir, PathBuf::from("tables"));
        assert_eq!(opts.encoding, SourceEncoding::Utf8);
        assert_eq!(opts.bounds, CoordinateBounds::Legacy);
        assert!(!opts.dedupe_routes);
        assert_eq!(opts.selected_tables(), Table::ALL.to_vec());
    }

    #[test]
    fn test_selected_tables_keep_batch_order() {
        let opts = MigrateOptions {
            tables: vec![Table::TripStartTimes, Table::Stops, Table::Stops],
            ..MigrateOptions::default()
        };
        assert_eq!(opts.selected_tables(), vec![Table::Stops, Table::TripStartTimes]);
    }

    #[test]
    fn test_paths() {
        let opts = MigrateOptions {
            input_dir: PathBuf::from("raw"),
            output_dir: PathBuf::from("out"),
            ..MigrateOptions::default()
        };
        assert_eq!(opts.source_path(Table::Routes), PathBuf::from("raw/routes-trips-clean.csv"));
        assert_eq!(opts.source_path(Table::TripStartTimes), PathBuf::from("raw/salidas.csv"));
        assert_eq!(opts.destination_path(Table::Shapes), PathBuf::from("out/shapes.csv"));
    }
}
