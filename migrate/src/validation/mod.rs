//! Coordinate validation for shape points.
//!
//! The only value-level validation the migration performs. Two bound
//! policies exist:
//!
//! | Policy       | latitude      | longitude     |
//! |--------------|---------------|---------------|
//! | `legacy`     | (-180, 180)   | (-90, 90)     |
//! | `geographic` | (-90, 90)     | (-180, 180)   |
//!
//! `legacy` reproduces the bounds the agency's original conversion applied,
//! which have latitude and longitude swapped relative to the usual
//! convention. It stays the default so regenerated tables match previously
//! published ones; consumers that need real geographic bounds opt in.
//! All bounds are exclusive and NaN never passes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bound policy applied to shape points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateBounds {
    #[default]
    Legacy,
    Geographic,
}

impl CoordinateBounds {
    /// Exclusive `(latitude, longitude)` magnitude limits.
    pub fn limits(&self) -> (f64, f64) {
        match self {
            CoordinateBounds::Legacy => (180.0, 90.0),
            CoordinateBounds::Geographic => (90.0, 180.0),
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let (lat_limit, lon_limit) = self.limits();
        lat > -lat_limit && lat < lat_limit && lon > -lon_limit && lon < lon_limit
    }
}

impl fmt::Display for CoordinateBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateBounds::Legacy => f.write_str("legacy"),
            CoordinateBounds::Geographic => f.write_str("geographic"),
        }
    }
}

/// Why a point was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateRejection {
    Unparseable { column: String, value: String },
    OutOfBounds { lat: f64, lon: f64, bounds: CoordinateBounds },
}

impl fmt::Display for CoordinateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateRejection::Unparseable { column, value } => {
                write!(f, "{} '{}' is not a number", column, value)
            }
            CoordinateRejection::OutOfBounds { lat, lon, bounds } => {
                write!(f, "({}, {}) outside {} bounds", lat, lon, bounds)
            }
        }
    }
}

/// Parse coordinate text the way a float literal is read: surrounding
/// whitespace is ignored.
pub fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Parse and bound-check a latitude/longitude pair.
pub fn validate_point(
    lat: (&str, &str),
    lon: (&str, &str),
    bounds: CoordinateBounds,
) -> Result<(f64, f64), CoordinateRejection> {
    let parse = |(column, value): (&str, &str)| {
        parse_coordinate(value).ok_or_else(|| CoordinateRejection::Unparseable {
            column: column.to_string(),
            value: value.to_string(),
        })
    };
    let lat = parse(lat)?;
    let lon = parse(lon)?;

    if !bounds.contains(lat, lon) {
        return Err(CoordinateRejection::OutOfBounds { lat, lon, bounds });
    }
    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_bounds_are_swapped() {
        let bounds = CoordinateBounds::Legacy;
        assert!(bounds.contains(45.0, 10.0));
        assert!(!bounds.contains(45.0, 200.0));
        // latitude beyond 90 passes, longitude beyond 90 does not
        assert!(bounds.contains(120.0, 10.0));
        assert!(!bounds.contains(-34.6, -91.0));
    }

    #[test]
    fn test_geographic_bounds() {
        let bounds = CoordinateBounds::Geographic;
        assert!(bounds.contains(-34.6037, -58.3816));
        assert!(!bounds.contains(120.0, 10.0));
        assert!(bounds.contains(10.0, 170.0));
    }

    #[test]
    fn test_bounds_are_exclusive() {
        assert!(!CoordinateBounds::Legacy.contains(180.0, 0.0));
        assert!(!CoordinateBounds::Legacy.contains(0.0, -90.0));
        assert!(!CoordinateBounds::Geographic.contains(90.0, 0.0));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(!CoordinateBounds::Legacy.contains(f64::NAN, 0.0));
        assert!(!CoordinateBounds::Geographic.contains(0.0, f64::NAN));
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(" -34.6037 "), Some(-34.6037));
        assert_eq!(parse_coordinate("1e1"), Some(10.0));
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("34,6"), None);
    }

    #[test]
    fn test_validate_point_reasons() {
        let ok = validate_point(("lat", "45.0"), ("lon", "10.0"), CoordinateBounds::Legacy);
        assert_eq!(ok, Ok((45.0, 10.0)));

        let bad = validate_point(("lat", "x"), ("lon", "10.0"), CoordinateBounds::Legacy);
        assert!(matches!(bad, Err(CoordinateRejection::Unparseable { .. })));

        let out = validate_point(("lat", "45.0"), ("lon", "200.0"), CoordinateBounds::Legacy)
            .unwrap_err();
        assert!(out.to_string().contains("legacy"));
    }
}
