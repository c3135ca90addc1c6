//! Table mappings.
//!
//! One module per destination table. Each exposes a mapper value that owns
//! whatever per-run state the table needs (sequence counters, route ids
//! already seen) so nothing survives between runs.

pub mod routes;
pub mod shapes;
pub mod stop_times;
pub mod stops;
pub mod trip_start_times;
pub mod trips;

pub use routes::RoutesMapper;
pub use shapes::ShapesMapper;
pub use stop_times::StopTimesMapper;
pub use stops::StopsMapper;
pub use trip_start_times::TripStartTimesExpander;
pub use trips::TripsMapper;

#[cfg(test)]
pub(crate) mod test_support {
    use csv::StringRecord;

    /// Header and one record for building a `SourceRow` in tests.
    pub fn record(pairs: &[(&str, &str)]) -> (StringRecord, StringRecord) {
        let headers: StringRecord = pairs.iter().map(|(h, _)| *h).collect();
        let values: StringRecord = pairs.iter().map(|(_, v)| *v).collect();
        (headers, values)
    }
}
