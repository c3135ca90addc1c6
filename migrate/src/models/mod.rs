//! Domain models for the migration pipeline.
//!
//! - [`Table`] - the six destination tables and their file names
//! - [`TableSchema`] - fixed output column order of a table
//! - [`FieldValue`] - a typed output value (text, integer, float, blank)
//! - [`OutputRow`] - one mapped row, keyed by destination column

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Table Schemas
// =============================================================================

/// Fixed ordered column list of a destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    columns: &'static [&'static str],
}

impl TableSchema {
    pub const fn new(columns: &'static [&'static str]) -> Self {
        Self { columns }
    }

    /// Columns in write order.
    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub const STOPS_SCHEMA: TableSchema = TableSchema::new(&[
    "stop_id",
    "stop_lat",
    "stop_lon",
    "stop_entre",
    "stop_calle",
    "stop_numero",
    "stop_name",
]);

pub const TRIPS_SCHEMA: TableSchema = TableSchema::new(&[
    "trip_id",
    "direction_id",
    "trip_headsign",
    "trip_short_name",
    "route_id",
    "shape_id",
]);

pub const ROUTES_SCHEMA: TableSchema = TableSchema::new(&[
    "route_id",
    "route_short_name",
    "route_type",
    "route_desc",
    "active",
]);

pub const SHAPES_SCHEMA: TableSchema = TableSchema::new(&[
    "shape_id",
    "shape_pt_lat",
    "shape_pt_lon",
    "shape_pt_time",
    "shape_pt_sequence",
]);

pub const STOP_TIMES_SCHEMA: TableSchema =
    TableSchema::new(&["stop_id", "trip_id", "stop_time", "stop_sequence"]);

pub const TRIP_START_TIMES_SCHEMA: TableSchema =
    TableSchema::new(&["trip_id", "service_id", "start_time"]);

// =============================================================================
// Tables
// =============================================================================

/// The six destination tables, in batch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Stops,
    Trips,
    Routes,
    Shapes,
    StopTimes,
    TripStartTimes,
}

impl Table {
    /// Every table in the order the batch runs them.
    pub const ALL: [Table; 6] = [
        Table::Stops,
        Table::Trips,
        Table::Routes,
        Table::Shapes,
        Table::StopTimes,
        Table::TripStartTimes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Stops => "stops",
            Table::Trips => "trips",
            Table::Routes => "routes",
            Table::Shapes => "shapes",
            Table::StopTimes => "stop_times",
            Table::TripStartTimes => "trip_start_times",
        }
    }

    /// Agency export this table is read from.
    ///
    /// Trips and routes share `routes-trips-clean.csv`.
    pub fn source_file(&self) -> &'static str {
        match self {
            Table::Stops => "stops.csv",
            Table::Trips | Table::Routes => "routes-trips-clean.csv",
            Table::Shapes => "shapes-raw.csv",
            Table::StopTimes => "stop_times.csv",
            Table::TripStartTimes => "salidas.csv",
        }
    }

    /// File written into the output directory.
    pub fn destination_file(&self) -> &'static str {
        match self {
            Table::Stops => "stops.csv",
            Table::Trips => "trips.csv",
            Table::Routes => "routes.csv",
            Table::Shapes => "shapes.csv",
            Table::StopTimes => "stop_times.csv",
            Table::TripStartTimes => "trips_start_times.csv",
        }
    }

    pub fn schema(&self) -> &'static TableSchema {
        match self {
            Table::Stops => &STOPS_SCHEMA,
            Table::Trips => &TRIPS_SCHEMA,
            Table::Routes => &ROUTES_SCHEMA,
            Table::Shapes => &SHAPES_SCHEMA,
            Table::StopTimes => &STOP_TIMES_SCHEMA,
            Table::TripStartTimes => &TRIP_START_TIMES_SCHEMA,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Table::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Table::ALL.iter().map(Table::name).collect();
                format!("unknown table '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

// =============================================================================
// Field Values
// =============================================================================

/// A typed output value.
///
/// Text and blanks are written quoted, numbers unquoted.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Value intentionally absent. Written as an empty quoted field.
    Blank,
}

impl FieldValue {
    /// True for [`FieldValue::Blank`] and for empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Blank => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Render the value as a raw CSV field, quotes included.
    pub fn to_csv_field(&self) -> String {
        match self {
            FieldValue::Text(s) => quote(s),
            FieldValue::Blank => quote(""),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => format_float(*f),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Blank => Ok(()),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

/// Wrap text in double quotes, doubling embedded quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Shortest text that parses back to the same float, always with a decimal
/// point or exponent (`45.0`, `-34.6037`).
///
/// Exponents carry a sign and at least two digits (`1e-07`, `1e+16`), the
/// form previously published tables use.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }

    let text = format!("{:?}", f);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

// =============================================================================
// Output Rows
// =============================================================================

/// One mapped row: destination column to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputRow {
    fields: Vec<(String, FieldValue)>,
}

impl OutputRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`OutputRow::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, v)) => *v = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
