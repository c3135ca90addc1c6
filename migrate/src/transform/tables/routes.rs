//! Routes: one row per source row of the routes/trips export.
//!
//! Many trips share a route, so by default the same route id is written
//! several times, exactly as the agency tables have always been produced.
//! With deduplication on, only the first row per route id is kept and the
//! rest are reported as discarded.

use std::collections::HashSet;
use tracing::debug;

use crate::error::MappingResult;
use crate::models::{FieldValue, OutputRow, Table};
use crate::parser::SourceRow;
use crate::transform::driver::{RowMapper, RowOutcome};
use crate::transform::parse_route_id;

/// Every route is a bus route.
pub const ROUTE_TYPE: &str = "Bus";

#[derive(Debug, Default)]
pub struct RoutesMapper {
    dedupe: bool,
    seen: HashSet<String>,
}

impl RoutesMapper {
    pub fn new(dedupe: bool) -> Self {
        Self {
            dedupe,
            seen: HashSet::new(),
        }
    }
}

impl RowMapper for RoutesMapper {
    fn table(&self) -> Table {
        Table::Routes
    }

    fn map_row(&mut self, row: &SourceRow<'_>) -> MappingResult<RowOutcome> {
        let route_id = parse_route_id(row.field("route-trip")?);
        let description = row.field("descripcion")?;

        if self.dedupe && !self.seen.insert(route_id.clone()) {
            debug!(line = row.line(), %route_id, "Duplicate route");
            return Ok(RowOutcome::Discard {
                reason: format!("duplicate route_id '{}'", route_id),
            });
        }

        // The short name is the route id, not a human-readable name.
        let out = OutputRow::new()
            .with("route_id", or_blank(&route_id))
            .with("route_short_name", or_blank(&route_id))
            .with("route_type", ROUTE_TYPE)
            .with("route_desc", or_blank(description))
            .with("active", FieldValue::Blank);
        Ok(RowOutcome::Emit(out))
    }
}

fn or_blank(value: &str) -> FieldValue {
    let value = FieldValue::from(value);
    if value.is_blank() {
        FieldValue::Blank
    } else {
        value
    }
}
