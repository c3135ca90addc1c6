//! # gtfs-migrate - agency CSV exports to GTFS tables
//!
//! Converts the agency's stop, route/trip, shape, stop-time and departure
//! exports into six GTFS-style tables. One batch run, one table at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Agency CSV  │────▶│   Parser    │────▶│   Mapper    │────▶│  GTFS CSV   │
//! │ (UTF8/ISO)  │     │ (row dicts) │     │ (per table) │     │ (fixed cols)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! | Table              | Source                   | Destination             |
//! |--------------------|--------------------------|-------------------------|
//! | stops              | `stops.csv`              | `stops.csv`             |
//! | trips              | `routes-trips-clean.csv` | `trips.csv`             |
//! | routes             | `routes-trips-clean.csv` | `routes.csv`            |
//! | shapes             | `shapes-raw.csv`         | `shapes.csv`            |
//! | stop_times         | `stop_times.csv`         | `stop_times.csv`        |
//! | trip_start_times   | `salidas.csv`            | `trips_start_times.csv` |
//!
//! Output tables are not cross-checked: a `trip_id` in `stop_times.csv` is
//! not verified to exist in `trips.csv`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gtfs_migrate::{run_all, MigrateOptions};
//!
//! let report = run_all(&MigrateOptions::default()).unwrap();
//! println!("{}", report.summary());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Tables, schemas, typed output rows
//! - [`parser`] - Source decoding and row reading
//! - [`output`] - Destination writing
//! - [`validation`] - Coordinate bounds
//! - [`transform`] - Drivers, table mappings, batch pipeline

// Core modules
pub mod error;
pub mod models;

// Reading and writing
pub mod output;
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// Logging
pub mod logging;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, CsvResult, MappingError, MappingResult, PipelineError, PipelineResult, TableError,
    TableResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{FieldValue, OutputRow, Table, TableSchema};

// =============================================================================
// Re-exports - Reading and writing
// =============================================================================

pub use output::TableWriter;
pub use parser::{decode_content, detect_encoding, SourceEncoding, SourceRow, SourceTable};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{CoordinateBounds, CoordinateRejection};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    migrate, migrate_expanded, parse_route_id, run_all, run_table, BatchReport, DiscardedRow,
    MigrateOptions, RowExpander, RowMapper, RowOutcome, SequenceCounter, TableReport,
};
