//! Stop times: column renames plus a gap-free stop sequence.

use crate::error::MappingResult;
use crate::models::{FieldValue, OutputRow, Table};
use crate::parser::SourceRow;
use crate::transform::driver::{RowMapper, RowOutcome};
use crate::transform::{SequenceCounter, STOP_TIMES_SEQUENCE_BASE};

#[derive(Debug)]
pub struct StopTimesMapper {
    sequence: SequenceCounter,
}

impl StopTimesMapper {
    pub fn new() -> Self {
        Self {
            sequence: SequenceCounter::new(STOP_TIMES_SEQUENCE_BASE),
        }
    }
}

impl Default for StopTimesMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RowMapper for StopTimesMapper {
    fn table(&self) -> Table {
        Table::StopTimes
    }

    fn map_row(&mut self, row: &SourceRow<'_>) -> MappingResult<RowOutcome> {
        let out = OutputRow::new()
            .with("stop_id", row.field("stop_id")?)
            .with("trip_id", row.field("trip_id")?)
            .with("stop_time", row.field("time")?)
            .with("stop_sequence", FieldValue::Integer(self.sequence.advance()));
        Ok(RowOutcome::Emit(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MappingError;
    use crate::transform::tables::test_support::record;

    #[test]
    fn test_sequence_has_no_gaps() {
        let mut mapper = StopTimesMapper::new();
        let (headers, _) = record(&[("stop_id", ""), ("trip_id", ""), ("time", "")]);

        let mut sequences = Vec::new();
        for (i, stop) in ["10", "11", "12", "10"].iter().enumerate() {
            let values: csv::StringRecord = [*stop, "T1", "08:00"].iter().collect();
            let row = SourceRow::new(&headers, values, i as u64 + 2);
            let RowOutcome::Emit(out) = mapper.map_row(&row).unwrap() else {
                panic!("stop times are never discarded");
            };
            assert_eq!(out.get("stop_time"), Some(&FieldValue::from("08:00")));
            sequences.push(out.get("stop_sequence").and_then(FieldValue::as_i64).unwrap());
        }

        assert_eq!(sequences, vec![100000, 100001, 100002, 100003]);
    }

    #[test]
    fn test_missing_time_column() {
        let mut mapper = StopTimesMapper::new();
        let (headers, values) = record(&[("stop_id", "10"), ("trip_id", "T1")]);
        let row = SourceRow::new(&headers, values, 2);

        assert!(matches!(
            mapper.map_row(&row),
            Err(MappingError::MissingSourceColumn { .. })
        ));
    }
}
