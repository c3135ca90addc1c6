//! Trip start times: one output row per service with a departure.
//!
//! `salidas.csv` has one column per service code (`H`, `S`, `D`) holding
//! the trip's start time for that service, or nothing when the trip does
//! not run.

use crate::error::MappingResult;
use crate::models::{OutputRow, Table};
use crate::parser::SourceRow;
use crate::transform::driver::RowExpander;

/// Service codes in output order.
pub const SERVICE_CODES: [&str; 3] = ["H", "S", "D"];

#[derive(Debug, Default)]
pub struct TripStartTimesExpander;

impl RowExpander for TripStartTimesExpander {
    fn table(&self) -> Table {
        Table::TripStartTimes
    }

    fn expand_row(&mut self, row: &SourceRow<'_>) -> MappingResult<Vec<OutputRow>> {
        let trip_id = row.field("trip_id")?;

        let mut rows = Vec::with_capacity(SERVICE_CODES.len());
        for service_id in SERVICE_CODES {
            let start_time = row.field(service_id)?;
            if start_time.is_empty() {
                continue;
            }
            rows.push(
                OutputRow::new()
                    .with("trip_id", trip_id)
                    .with("service_id", service_id)
                    .with("start_time", start_time),
            );
        }
        Ok(rows)
    }
}
