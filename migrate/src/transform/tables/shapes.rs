//! Shapes: points with numbered sequence, bad points dropped.
//!
//! A point whose coordinates don't parse or fall outside the bounds policy
//! is discarded and logged; the run goes on. Only kept points consume a
//! sequence number.

use tracing::info;

use crate::error::MappingResult;
use crate::models::{FieldValue, OutputRow, Table};
use crate::parser::SourceRow;
use crate::transform::driver::{RowMapper, RowOutcome};
use crate::transform::{SequenceCounter, SHAPES_SEQUENCE_BASE};
use crate::validation::{validate_point, CoordinateBounds};

#[derive(Debug)]
pub struct ShapesMapper {
    bounds: CoordinateBounds,
    sequence: SequenceCounter,
}

impl ShapesMapper {
    pub fn new(bounds: CoordinateBounds) -> Self {
        Self {
            bounds,
            sequence: SequenceCounter::new(SHAPES_SEQUENCE_BASE),
        }
    }

    /// Points kept so far.
    pub fn kept(&self) -> i64 {
        self.sequence.issued()
    }
}

impl Default for ShapesMapper {
    fn default() -> Self {
        Self::new(CoordinateBounds::default())
    }
}

impl RowMapper for ShapesMapper {
    fn table(&self) -> Table {
        Table::Shapes
    }

    fn map_row(&mut self, row: &SourceRow<'_>) -> MappingResult<RowOutcome> {
        let shape_id = row.field("shape_id")?;
        let lat = row.field("shape_pt_lat")?;
        let lon = row.field("shape_pt_lon")?;
        let time = row.field("time")?;

        let point = validate_point(("shape_pt_lat", lat), ("shape_pt_lon", lon), self.bounds);
        let (lat, lon) = match point {
            Ok(point) => point,
            Err(rejection) => {
                info!(line = row.line(), shape_id, %rejection, "Dropped shape point");
                return Ok(RowOutcome::Discard {
                    reason: rejection.to_string(),
                });
            }
        };

        let out = OutputRow::new()
            .with("shape_id", shape_id)
            .with("shape_pt_lat", lat)
            .with("shape_pt_lon", lon)
            .with("shape_pt_time", time)
            .with("shape_pt_sequence", FieldValue::Integer(self.sequence.advance()));
        Ok(RowOutcome::Emit(out))
    }
}
