//! Travel totals
//!
//! [`TravelStats::compute`] builds two independent routes over the same home
//! location: one through the trips already traveled (completed or in
//! progress), one through every geocoded trip. Each is re-sorted and
//! re-chained on its own, so the planned route is not a superset computation
//! of the traveled one.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::filter::geo_trips;
use crate::measure::{Miles, km_to_miles};
use crate::route::{Route, RouteBuilder};
use crate::trip::{GeoTrip, HomeLocation, TripRecord, TripStatus};

/// Aggregate distances and counts over a user's trips.
#[derive(Clone, PartialEq, Debug)]
pub struct TravelStats {
    /// Distance over completed and in-progress trips.
    pub traveled_distance: Miles<f64>,

    /// Distance over every geocoded trip regardless of status.
    pub planned_distance: Miles<f64>,

    /// Number of distinct destinations among geocoded trips.
    pub unique_destinations: usize,

    /// Number of completed trips, geocoded or not.
    pub completed_trips: usize,

    /// Number of trips given, geocoded or not.
    pub total_trips: usize,

    /// Number of trips with a destination point.
    pub geo_trips: usize,

    pub traveled_route: Route,
    pub planned_route: Route,
}

impl TravelStats {
    #[instrument(level = "trace", skip_all)]
    pub fn compute(records: &[TripRecord], home: Option<&HomeLocation>) -> Self {
        let all = geo_trips(records);
        let traveled = all
            .iter()
            .filter(|t| t.status.is_traveled())
            .cloned()
            .collect::<Vec<_>>();

        let builder = RouteBuilder::new(home);
        let (traveled_route, planned_route) = build_pair(&builder, &traveled, &all);

        let stats = Self {
            traveled_distance: km_to_miles(traveled_route.total_distance),
            planned_distance: km_to_miles(planned_route.total_distance),
            unique_destinations: count_unique_destinations(&all),
            completed_trips: records
                .iter()
                .filter(|r| r.status == TripStatus::Completed)
                .count(),
            total_trips: records.len(),
            geo_trips: all.len(),
            traveled_route,
            planned_route,
        };
        debug!(
            "Traveled {} of {} planned across {} destinations",
            stats.traveled_distance, stats.planned_distance, stats.unique_destinations
        );
        stats
    }
}

#[cfg(feature = "rayon")]
fn build_pair(builder: &RouteBuilder, traveled: &[GeoTrip], all: &[GeoTrip]) -> (Route, Route) {
    rayon::join(|| builder.build(traveled), || builder.build(all))
}

#[cfg(not(feature = "rayon"))]
fn build_pair(builder: &RouteBuilder, traveled: &[GeoTrip], all: &[GeoTrip]) -> (Route, Route) {
    (builder.build(traveled), builder.build(all))
}

fn count_unique_destinations(trips: &[GeoTrip]) -> usize {
    trips
        .iter()
        .filter_map(|t| t.destination.as_deref())
        .collect::<HashSet<_>>()
        .len()
}
