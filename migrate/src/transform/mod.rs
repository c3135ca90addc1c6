//! Transformation module.
//!
//! - `driver`: generic read → map → write loops for one table
//! - `tables`: the six table mappings
//! - `pipeline`: batch orchestration over all tables
//!
//! Shared derivation rules live here: route-code parsing and the per-table
//! sequence counter.

pub mod driver;
pub mod pipeline;
pub mod tables;

pub use driver::*;
pub use pipeline::*;

/// First `shape_pt_sequence` handed out.
pub const SHAPES_SEQUENCE_BASE: i64 = 300_000;

/// First `stop_sequence` handed out.
pub const STOP_TIMES_SEQUENCE_BASE: i64 = 100_000;

/// Derive a route id from a composite `route-trip` code.
///
/// The route part is everything but the last three characters. An all-digit
/// route part is zero-padded to three digits; anything else is kept as is.
/// Codes of three characters or fewer give an empty route id.
///
/// ```
/// use gtfs_migrate::transform::parse_route_id;
///
/// assert_eq!(parse_route_id("7XYZ"), "007");
/// assert_eq!(parse_route_id("AB1CDE"), "AB1");
/// ```
pub fn parse_route_id(code: &str) -> String {
    let keep = code.chars().count().saturating_sub(3);
    let route: String = code.chars().take(keep).collect();

    if !route.is_empty() && route.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>3}", route)
    } else {
        route
    }
}

/// Monotonic sequence numbers for one table run.
///
/// Owned by the table's mapper, so every run starts again from its base.
#[derive(Debug, Clone)]
pub struct SequenceCounter {
    base: i64,
    next: i64,
}

impl SequenceCounter {
    pub fn new(base: i64) -> Self {
        Self { base, next: base }
    }

    /// The value the next emitted row will get.
    pub fn peek(&self) -> i64 {
        self.next
    }

    /// Hand out the current value and move on.
    pub fn advance(&mut self) -> i64 {
        let value = self.next;
        self.next += 1;
        value
    }

    /// How many values have been handed out.
    pub fn issued(&self) -> i64 {
        self.next - self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_id_zero_padded() {
        assert_eq!(parse_route_id("7XYZ"), "007");
        assert_eq!(parse_route_id("12001"), "012");
        assert_eq!(parse_route_id("152IDA"), "152");
    }

    #[test]
    fn test_route_id_verbatim_when_not_digits() {
        assert_eq!(parse_route_id("AB1CDE"), "AB1");
        assert_eq!(parse_route_id("60BIDA"), "60B");
    }

    #[test]
    fn test_route_id_longer_digits_not_truncated() {
        assert_eq!(parse_route_id("1234ABC"), "1234");
    }

    #[test]
    fn test_route_id_short_codes() {
        assert_eq!(parse_route_id("ABC"), "");
        assert_eq!(parse_route_id("AB"), "");
        assert_eq!(parse_route_id(""), "");
    }

    #[test]
    fn test_route_id_counts_characters() {
        assert_eq!(parse_route_id("ÑAÑ123"), "ÑAÑ");
    }

    #[test]
    fn test_sequence_counter() {
        let mut counter = SequenceCounter::new(SHAPES_SEQUENCE_BASE);
        assert_eq!(counter.peek(), 300_000);
        assert_eq!(counter.advance(), 300_000);
        assert_eq!(counter.advance(), 300_001);
        assert_eq!(counter.peek(), 300_002);
        assert_eq!(counter.issued(), 2);
    }
}
