//! Stops: column renames plus float coordinates.

use crate::error::{MappingError, MappingResult};
use crate::models::{FieldValue, OutputRow, Table};
use crate::parser::SourceRow;
use crate::transform::driver::{RowMapper, RowOutcome};
use crate::validation::parse_coordinate;

/// Source column → destination column.
const KEY_MAP: [(&str, &str); 7] = [
    ("stop_id", "stop_id"),
    ("stop_lat", "stop_lat"),
    ("stop_lon", "stop_lon"),
    ("entre", "stop_entre"),
    ("calle", "stop_calle"),
    ("numero", "stop_numero"),
    ("stop_name", "stop_name"),
];

/// Every stop row is kept. Coordinates must be numbers but are not
/// bound-checked here.
#[derive(Debug, Default)]
pub struct StopsMapper;

impl RowMapper for StopsMapper {
    fn table(&self) -> Table {
        Table::Stops
    }

    fn map_row(&mut self, row: &SourceRow<'_>) -> MappingResult<RowOutcome> {
        let mut out = OutputRow::new();
        for (source, destination) in KEY_MAP {
            out.set(destination, row.field(source)?);
        }
        for column in ["stop_lat", "stop_lon"] {
            out.set(column, FieldValue::Float(parse_float(row, column)?));
        }
        Ok(RowOutcome::Emit(out))
    }
}

fn parse_float(row: &SourceRow<'_>, column: &str) -> MappingResult<f64> {
    let value = row.field(column)?;
    parse_coordinate(value).ok_or_else(|| MappingError::NumericParse {
        column: column.to_string(),
        value: value.to_string(),
        line: row.line(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format_float;
    use crate::transform::tables::test_support::record;

    fn stop(lat: &str, lon: &str) -> (csv::StringRecord, csv::StringRecord) {
        record(&[
            ("stop_id", "1043"),
            ("stop_lat", lat),
            ("stop_lon", lon),
            ("entre", "Callao"),
            ("calle", "Corrientes"),
            ("numero", "1800"),
            ("stop_name", "Corrientes y Callao"),
        ])
    }

    #[test]
    fn test_renames_and_parses() {
        let (headers, values) = stop("-34.6043", "-58.3925");
        let row = SourceRow::new(&headers, values, 2);

        let RowOutcome::Emit(out) = StopsMapper.map_row(&row).unwrap() else {
            panic!("stops are never discarded");
        };

        assert_eq!(out.get("stop_id"), Some(&FieldValue::from("1043")));
        assert_eq!(out.get("stop_entre"), Some(&FieldValue::from("Callao")));
        assert_eq!(out.get("stop_calle"), Some(&FieldValue::from("Corrientes")));
        assert_eq!(out.get("stop_numero"), Some(&FieldValue::from("1800")));
        assert_eq!(out.get("stop_lat"), Some(&FieldValue::Float(-34.6043)));
        assert_eq!(out.get("stop_lon"), Some(&FieldValue::Float(-58.3925)));
        assert_eq!(out.len(), Table::Stops.schema().len());
    }

    #[test]
    fn test_float_text_round_trip() {
        for text in ["-34.6043", "0.1", "45", "-58.392500000000001", "1e-7"] {
            let (headers, values) = stop(text, text);
            let row = SourceRow::new(&headers, values, 2);
            let RowOutcome::Emit(out) = StopsMapper.map_row(&row).unwrap() else {
                panic!("stops are never discarded");
            };

            let lat = out.get("stop_lat").and_then(FieldValue::as_f64).unwrap();
            assert_eq!(lat, text.parse::<f64>().unwrap());
            let reparsed: f64 = format_float(lat).parse().unwrap();
            assert!((reparsed - lat).abs() <= f64::EPSILON * lat.abs());
        }
    }

    #[test]
    fn test_no_bounds_check() {
        let (headers, values) = stop("200.0", "-300.0");
        let row = SourceRow::new(&headers, values, 2);
        assert!(matches!(StopsMapper.map_row(&row).unwrap(), RowOutcome::Emit(_)));
    }

    #[test]
    fn test_bad_latitude_is_fatal() {
        let (headers, values) = stop("n/a", "-58.3925");
        let row = SourceRow::new(&headers, values, 9);

        let err = StopsMapper.map_row(&row).unwrap_err();
        assert!(matches!(
            err,
            MappingError::NumericParse { ref column, line: 9, .. } if column == "stop_lat"
        ));
    }
}
