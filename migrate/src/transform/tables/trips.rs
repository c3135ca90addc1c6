//! Trips: column renames, route id derived from the composite code, one
//! shape per trip.

use crate::error::MappingResult;
use crate::models::{OutputRow, Table};
use crate::parser::SourceRow;
use crate::transform::driver::{RowMapper, RowOutcome};
use crate::transform::parse_route_id;

const KEY_MAP: [(&str, &str); 4] = [
    ("ID-recorrido", "trip_id"),
    ("ida-vuelta", "direction_id"),
    ("descripcion", "trip_headsign"),
    ("destino", "trip_short_name"),
];

#[derive(Debug, Default)]
pub struct TripsMapper;

impl RowMapper for TripsMapper {
    fn table(&self) -> Table {
        Table::Trips
    }

    fn map_row(&mut self, row: &SourceRow<'_>) -> MappingResult<RowOutcome> {
        let route_id = parse_route_id(row.field("route-trip")?);

        let mut out = OutputRow::new();
        for (source, destination) in KEY_MAP {
            out.set(destination, row.field(source)?);
        }
        let trip_id = row.field("ID-recorrido")?;
        out.set("route_id", route_id);
        out.set("shape_id", trip_id);
        Ok(RowOutcome::Emit(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use crate::transform::tables::test_support::record;

    fn trip(code: &str) -> (csv::StringRecord, csv::StringRecord) {
        record(&[
            ("route-trip", code),
            ("ID-recorrido", "4512"),
            ("ida-vuelta", "0"),
            ("descripcion", "Constitución - Retiro"),
            ("destino", "Retiro"),
        ])
    }

    fn map(code: &str) -> OutputRow {
        let (headers, values) = trip(code);
        let row = SourceRow::new(&headers, values, 2);
        match TripsMapper.map_row(&row).unwrap() {
            RowOutcome::Emit(out) => out,
            RowOutcome::Discard { reason } => panic!("unexpected discard: {}", reason),
        }
    }

    #[test]
    fn test_trip_fields() {
        let out = map("7XYZ");

        assert_eq!(out.get("trip_id"), Some(&FieldValue::from("4512")));
        assert_eq!(out.get("direction_id"), Some(&FieldValue::from("0")));
        assert_eq!(out.get("trip_headsign"), Some(&FieldValue::from("Constitución - Retiro")));
        assert_eq!(out.get("trip_short_name"), Some(&FieldValue::from("Retiro")));
        assert_eq!(out.get("route_id"), Some(&FieldValue::from("007")));
        assert_eq!(out.len(), Table::Trips.schema().len());
    }

    #[test]
    fn test_shape_id_is_trip_id() {
        let out = map("AB1CDE");
        assert_eq!(out.get("shape_id"), out.get("trip_id"));
        assert_eq!(out.get("route_id"), Some(&FieldValue::from("AB1")));
    }
}
