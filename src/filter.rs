//! Selection of routable trips
//!
//! Trips reach the engine straight from the trip store, which does not
//! guarantee that a destination was ever geocoded. Only trips with a valid
//! destination point take part in routing; everything else is dropped here
//! rather than reported as an error.

use tracing::{debug, instrument};

use crate::measure::Degrees;
use crate::trip::{GeoTrip, TripRecord};
use crate::types::GeoPoint;

/// The destination point of a record, if it has a valid one.
pub fn destination_point(record: &TripRecord) -> Option<GeoPoint> {
    let (lat, lon) = (record.destination_latitude?, record.destination_longitude?);
    GeoPoint::new(Degrees(lat), Degrees(lon)).ok()
}

/// Convert a record into a [`GeoTrip`], or `None` when its destination has no
/// usable coordinates.
pub fn to_geo_trip(record: &TripRecord) -> Option<GeoTrip> {
    let Some(destination_point) = destination_point(record) else {
        debug!("Excluding trip {} without a destination point", record.id);
        return None;
    };
    Some(GeoTrip {
        id: record.id.clone(),
        destination: record.destination.clone(),
        destination_point,
        start_date: record.start_date,
        end_date: record.end_date,
        status: record.status,
        transport_mode: record.transport_mode,
        departure_airport: record.departure_airport,
        arrival_airport: record.arrival_airport,
    })
}

/// Select the trips that carry a resolved destination point, preserving input
/// order.
#[instrument(level = "trace", skip_all)]
pub fn geo_trips(records: &[TripRecord]) -> Vec<GeoTrip> {
    let trips = records.iter().filter_map(to_geo_trip).collect::<Vec<_>>();
    debug!(
        "{} of {} trips have a destination point",
        trips.len(),
        records.len()
    );
    trips
}
