//! Travel route construction
//!
//! Provides [`RouteBuilder`], which turns a set of [`GeoTrip`]s and an
//! optional [`HomeLocation`] into a [`Route`]: the chronological sequence of
//! [`Leg`]s the traveler covered (or will cover) between home and each
//! destination.
//!
//! # Algorithm
//!
//! Trips are first put in order of their start dates (see [`sort_trips`]).
//! Without a home location the route is just a chain of
//! [`LegKind::Fallback`] legs between consecutive destinations.
//!
//! With a home location, the route leaves home for the first trip and
//! returns home after the last one. Between two consecutive trips the
//! traveler either went straight on to the next destination, when the
//! previous trip ends on or after the day the next one starts, or went home
//! first. Legs from home to a destination are split into three at the
//! airports when the trip is a flight with both airports known.

use std::cmp::Ordering;

use tracing::{debug, instrument, trace};

use crate::geographic::great_circle_distance;
use crate::measure::Kilometers;
use crate::trip::{GeoTrip, HomeLocation, TransportMode};
use crate::types::GeoPoint;

/// The role a leg plays in a route.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum LegKind {
    /// Leaving home towards a destination, possibly through airports.
    Outbound,
    /// Going directly from one destination to the next.
    Connecting,
    /// Going back home.
    Return,
    /// Consecutive destinations when no home location is known.
    Fallback,
}

/// One segment of a route.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Leg {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub kind: LegKind,
    pub mode: Option<TransportMode>,
    /// Great-circle distance between `from` and `to`.
    pub distance: Kilometers<f64>,
}

impl Leg {
    pub fn new(from: GeoPoint, to: GeoPoint, kind: LegKind, mode: Option<TransportMode>) -> Self {
        Self {
            from,
            to,
            kind,
            mode,
            distance: great_circle_distance(&from, &to),
        }
    }
}

/// An ordered sequence of legs and their total distance.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct Route {
    pub legs: Vec<Leg>,
    pub total_distance: Kilometers<f64>,
}

impl Route {
    fn from_legs(legs: Vec<Leg>) -> Self {
        let total_distance = legs.iter().map(|leg| leg.distance).sum();
        Self {
            legs,
            total_distance,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

/// Compare two trips by start date, treating a missing date on either side as
/// no ordering information at all.
pub fn compare_start_dates(a: &GeoTrip, b: &GeoTrip) -> Ordering {
    match (a.start_date, b.start_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

/// Put trips in chronological order of their start dates.
///
/// Trips without a start date are not assigned a synthetic one and are not
/// pushed to either end: each stays at its input position. The dated trips are
/// stably sorted among the remaining positions. Unlike handing
/// [`compare_start_dates`] straight to `sort_by`, which would not be a total
/// order, this gives the same result for the same input every time.
pub fn sort_trips(trips: &[GeoTrip]) -> Vec<&GeoTrip> {
    let mut dated = trips
        .iter()
        .filter(|t| t.start_date.is_some())
        .collect::<Vec<_>>();
    dated.sort_by(|a, b| compare_start_dates(a, b));

    let mut dated = dated.into_iter();
    trips
        .iter()
        .map(|t| match t.start_date {
            Some(_) => dated.next().unwrap_or(t),
            None => t,
        })
        .collect()
}

/// Whether the traveler went from `previous` straight on to `current` without
/// returning home.
///
/// Dates are compared as calendar days, inclusively: a trip ending on the day
/// the next one starts counts as overlapping.
pub fn trips_overlap(previous: &GeoTrip, current: &GeoTrip) -> bool {
    match (previous.end_date, current.start_date) {
        (Some(end), Some(start)) => end >= start,
        _ => false,
    }
}

/// Builds [`Route`]s from trips, optionally anchored at a home location.
#[derive(Clone, Debug, Default)]
pub struct RouteBuilder<'a> {
    home: Option<&'a HomeLocation>,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(home: Option<&'a HomeLocation>) -> Self {
        Self { home }
    }

    /// Build the route through `trips`.
    ///
    /// `trips` need not be sorted. The result depends only on the trips and
    /// the home location, so building twice gives identical routes.
    #[instrument(level = "trace", skip_all)]
    pub fn build(&self, trips: &[GeoTrip]) -> Route {
        let sorted = sort_trips(trips);
        let legs = match self.home {
            Some(home) => home_anchored_legs(&sorted, home.point),
            None => chained_legs(&sorted),
        };
        let route = Route::from_legs(legs);
        debug!(
            "Built route of {} legs over {} trips with a total distance of {}",
            route.legs.len(),
            trips.len(),
            route.total_distance
        );
        route
    }
}

fn chained_legs(trips: &[&GeoTrip]) -> Vec<Leg> {
    trips
        .windows(2)
        .map(|pair| {
            Leg::new(
                pair[0].destination_point,
                pair[1].destination_point,
                LegKind::Fallback,
                pair[1].transport_mode,
            )
        })
        .collect()
}

fn home_anchored_legs(trips: &[&GeoTrip], home: GeoPoint) -> Vec<Leg> {
    let mut legs = Vec::new();
    let Some((first, _)) = trips.split_first() else {
        return legs;
    };

    push_outbound(&mut legs, home, first);
    for pair in trips.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if trips_overlap(previous, current) {
            trace!("Trip {} connects directly to {}", previous.id, current.id);
            legs.push(Leg::new(
                previous.destination_point,
                current.destination_point,
                LegKind::Connecting,
                current.transport_mode,
            ));
        } else {
            legs.push(return_leg(previous, home));
            push_outbound(&mut legs, home, current);
        }
    }

    // The route is always closed, even while the latest trip is underway.
    if let Some(last) = trips.last() {
        legs.push(return_leg(last, home));
    }
    legs
}

fn return_leg(trip: &GeoTrip, home: GeoPoint) -> Leg {
    Leg::new(
        trip.destination_point,
        home,
        LegKind::Return,
        trip.transport_mode,
    )
}

/// Append the legs from `origin` to the trip's destination.
///
/// A flight with both airports known becomes origin → departure airport →
/// arrival airport → destination. Anything else is a single direct leg.
fn push_outbound(legs: &mut Vec<Leg>, origin: GeoPoint, trip: &GeoTrip) {
    let mode = trip.transport_mode;
    match trip.flight_airports() {
        Some((departure, arrival)) => {
            legs.push(Leg::new(origin, departure, LegKind::Outbound, mode));
            legs.push(Leg::new(departure, arrival, LegKind::Outbound, mode));
            legs.push(Leg::new(
                arrival,
                trip.destination_point,
                LegKind::Outbound,
                mode,
            ));
        }
        None => legs.push(Leg::new(
            origin,
            trip.destination_point,
            LegKind::Outbound,
            mode,
        )),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    use super::{LegKind, Route, RouteBuilder, sort_trips, trips_overlap};
    use crate::filter::geo_trips;
    use crate::geographic::great_circle_distance;
    use crate::measure::Kilometers;
    use crate::trip::{GeoTrip, HomeLocation, TransportMode, TripRecord, TripStatus};
    use crate::types::GeoPoint;
    use crate::{geo_point, geo_points};

    fn date(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    }

    fn trip(id: &str, lat: f64, lon: f64, start: &str, end: &str) -> TripRecord {
        TripRecord::new(id, TripStatus::Planned)
            .with_destination(id, lat, lon)
            .with_dates(date(start), date(end))
    }

    fn home() -> Result<HomeLocation> {
        Ok(HomeLocation::new(geo_point!(40.0, -74.0), None))
    }

    fn kinds(route: &Route) -> Vec<LegKind> {
        route.legs.iter().map(|l| l.kind).collect()
    }

    fn ids(trips: Vec<&GeoTrip>) -> Vec<&str> {
        trips.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_empty_input() -> Result<()> {
        let home = home()?;
        for builder in [RouteBuilder::new(Some(&home)), RouteBuilder::new(None)] {
            let route = builder.build(&[]);
            assert!(route.is_empty());
            assert_eq!(route.total_distance, Kilometers(0.0));
        }
        Ok(())
    }

    #[test]
    fn test_single_trip_round_trip() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[trip("paris", 48.85, 2.35, "2026-06-01", "2026-06-05")]);
        let route = RouteBuilder::new(Some(&home)).build(&trips);

        assert_eq!(kinds(&route), vec![LegKind::Outbound, LegKind::Return]);
        assert_eq!(route.legs[0].from, home.point);
        assert_eq!(route.legs[1].to, home.point);
        assert_relative_eq!(
            route.total_distance,
            great_circle_distance(&home.point, &trips[0].destination_point) * 2.0
        );
        Ok(())
    }

    #[test]
    fn test_no_home_single_trip() {
        let trips = geo_trips(&[trip("paris", 48.85, 2.35, "2026-06-01", "2026-06-05")]);
        let route = RouteBuilder::new(None).build(&trips);
        assert!(route.is_empty());
        assert_eq!(route.total_distance, Kilometers(0.0));
    }

    #[test]
    fn test_no_home_chain() -> Result<()> {
        let trips = geo_trips(&[
            trip("rome", 41.9, 12.5, "2026-06-10", "2026-06-15"),
            trip("paris", 48.85, 2.35, "2026-06-01", "2026-06-05"),
            trip("berlin", 52.52, 13.405, "2026-07-01", "2026-07-03"),
        ]);
        let route = RouteBuilder::new(None).build(&trips);

        assert_eq!(kinds(&route), vec![LegKind::Fallback, LegKind::Fallback]);
        let endpoints = route
            .legs
            .iter()
            .flat_map(|l| [l.from, l.to])
            .collect::<Vec<_>>();
        let expected: Vec<GeoPoint> =
            geo_points![(48.85, 2.35), (41.9, 12.5), (41.9, 12.5), (52.52, 13.405)];
        assert_eq!(endpoints, expected);
        Ok(())
    }

    #[test]
    fn test_overlap_on_shared_day_connects() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[
            trip("a", 48.85, 2.35, "2026-06-01", "2026-06-10"),
            trip("b", 41.9, 12.5, "2026-06-10", "2026-06-15"),
        ]);
        assert!(trips_overlap(&trips[0], &trips[1]));

        let route = RouteBuilder::new(Some(&home)).build(&trips);
        assert_eq!(
            kinds(&route),
            vec![LegKind::Outbound, LegKind::Connecting, LegKind::Return]
        );
        assert_eq!(route.legs[1].from, trips[0].destination_point);
        assert_eq!(route.legs[1].to, trips[1].destination_point);
        Ok(())
    }

    #[test]
    fn test_gap_returns_home() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[
            trip("a", 48.85, 2.35, "2026-06-01", "2026-06-10"),
            trip("b", 41.9, 12.5, "2026-06-12", "2026-06-15"),
        ]);
        assert!(!trips_overlap(&trips[0], &trips[1]));

        let route = RouteBuilder::new(Some(&home)).build(&trips);
        assert_eq!(
            kinds(&route),
            vec![
                LegKind::Outbound,
                LegKind::Return,
                LegKind::Outbound,
                LegKind::Return
            ]
        );
        assert_eq!(route.legs[1].from, trips[0].destination_point);
        assert_eq!(route.legs[1].to, home.point);
        assert_eq!(route.legs[2].from, home.point);
        assert_eq!(route.legs[2].to, trips[1].destination_point);
        Ok(())
    }

    #[test]
    fn test_missing_dates_never_overlap() {
        let trips = geo_trips(&[
            trip("start-only", 48.85, 2.35, "2026-06-01", ""),
            trip("end-only", 41.9, 12.5, "", "2026-06-15"),
            trip("dated", 52.52, 13.405, "2026-06-01", "2026-06-20"),
        ]);
        // The previous trip has no end date.
        assert!(!trips_overlap(&trips[0], &trips[1]));
        assert!(!trips_overlap(&trips[0], &trips[2]));
        // The current trip has no start date.
        assert!(!trips_overlap(&trips[2], &trips[1]));
        // Both relevant dates present: 06-15 >= 06-01.
        assert!(trips_overlap(&trips[1], &trips[2]));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_route_json() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[trip("paris", 48.85, 2.35, "2026-06-01", "2026-06-05")
            .with_transport_mode(TransportMode::Car)]);
        let route = RouteBuilder::new(Some(&home)).build(&trips);
        let json = serde_json::to_value(&route)?;

        let legs = json["legs"].as_array().map(Vec::len);
        assert_eq!(legs, Some(2));
        assert_eq!(json["legs"][0]["kind"], "OUTBOUND");
        assert_eq!(json["legs"][0]["mode"], "CAR");
        assert_eq!(json["legs"][0]["from"]["latitude"], 40.0);
        assert_eq!(json["legs"][1]["kind"], "RETURN");
        assert_eq!(json["legs"][1]["to"]["longitude"], -74.0);
        assert_eq!(json["totalDistance"], route.total_distance.0);
        assert_eq!(json["legs"][0]["distance"], route.legs[0].distance.0);
        Ok(())
    }

    #[test]
    fn test_undated_trip_goes_through_home() -> Result<()> {
        let home = home()?;
        // "a" and "b" would connect directly if they were adjacent.
        let trips = geo_trips(&[
            trip("a", 48.85, 2.35, "2026-06-01", "2026-06-10"),
            trip("undated", 35.68, 139.65, "", ""),
            trip("b", 41.9, 12.5, "2026-06-10", "2026-06-15"),
        ]);
        let route = RouteBuilder::new(Some(&home)).build(&trips);
        assert_eq!(
            kinds(&route),
            vec![
                LegKind::Outbound,
                LegKind::Return,
                LegKind::Outbound,
                LegKind::Return,
                LegKind::Outbound,
                LegKind::Return
            ]
        );
        assert_eq!(route.legs[2].to, trips[1].destination_point);
        assert_eq!(route.legs[3].from, trips[1].destination_point);
        Ok(())
    }

    #[test]
    fn test_intersecting_dates_connect() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[
            trip("a", 48.85, 2.35, "2026-06-01", "2026-06-12"),
            trip("b", 41.9, 12.5, "2026-06-08", "2026-06-15"),
        ]);
        assert!(trips_overlap(&trips[0], &trips[1]));

        let route = RouteBuilder::new(Some(&home)).build(&trips);
        assert_eq!(
            kinds(&route),
            vec![LegKind::Outbound, LegKind::Connecting, LegKind::Return]
        );
        Ok(())
    }

    #[test]
    fn test_flight_decomposition() -> Result<()> {
        let home = home()?;
        let jfk = geo_point!(40.64, -73.78);
        let cdg = geo_point!(49.01, 2.55);
        let flight = trip("paris", 48.85, 2.35, "2026-06-01", "2026-06-05")
            .with_transport_mode(TransportMode::Flight);

        let full = geo_trips(&[flight.clone().with_airports(Some(jfk), Some(cdg))]);
        let route = RouteBuilder::new(Some(&home)).build(&full);
        assert_eq!(
            kinds(&route),
            vec![
                LegKind::Outbound,
                LegKind::Outbound,
                LegKind::Outbound,
                LegKind::Return
            ]
        );
        let hops = route.legs[..3]
            .iter()
            .map(|l| (l.from, l.to))
            .collect::<Vec<_>>();
        assert_eq!(
            hops,
            vec![
                (home.point, jfk),
                (jfk, cdg),
                (cdg, full[0].destination_point)
            ]
        );
        assert!(
            route
                .legs
                .iter()
                .all(|l| l.mode == Some(TransportMode::Flight))
        );

        for airports in [(None, Some(cdg)), (Some(jfk), None)] {
            let partial = geo_trips(&[flight.clone().with_airports(airports.0, airports.1)]);
            let route = RouteBuilder::new(Some(&home)).build(&partial);
            assert_eq!(kinds(&route), vec![LegKind::Outbound, LegKind::Return]);
            assert_eq!(route.legs[0].mode, Some(TransportMode::Flight));
        }
        Ok(())
    }

    #[test]
    fn test_airports_ignored_for_car() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[trip("paris", 48.85, 2.35, "2026-06-01", "2026-06-05")
            .with_transport_mode(TransportMode::Car)
            .with_airports(Some(geo_point!(40.64, -73.78)), Some(geo_point!(49.01, 2.55)))]);
        let route = RouteBuilder::new(Some(&home)).build(&trips);
        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.legs[0].mode, Some(TransportMode::Car));
        Ok(())
    }

    #[test]
    fn test_closure() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[
            trip("a", 48.85, 2.35, "2026-06-01", "2026-06-10"),
            trip("b", 41.9, 12.5, "2026-06-10", "2026-06-15"),
            trip("c", 52.52, 13.405, "2026-08-01", "2026-08-03"),
            trip("d", 35.68, 139.65, "", ""),
        ]);
        let route = RouteBuilder::new(Some(&home)).build(&trips);
        assert_eq!(route.legs.first().map(|l| l.from), Some(home.point));
        assert_eq!(route.legs.last().map(|l| l.to), Some(home.point));

        // Every leg starts where the previous one ended.
        for pair in route.legs.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let home = home()?;
        let trips = geo_trips(&[
            trip("c", 52.52, 13.405, "2026-08-01", "2026-08-03"),
            trip("x", 35.68, 139.65, "", ""),
            trip("a", 48.85, 2.35, "2026-06-01", "2026-06-10"),
            trip("b", 41.9, 12.5, "2026-06-10", "2026-06-15"),
        ]);
        let builder = RouteBuilder::new(Some(&home));
        let first = builder.build(&trips);
        let second = builder.build(&trips);
        assert_eq!(first, second);
        assert_eq!(
            first.total_distance.0.to_bits(),
            second.total_distance.0.to_bits()
        );
        Ok(())
    }

    #[test]
    fn test_sort_by_start_date() {
        let trips = geo_trips(&[
            trip("c", 0.0, 3.0, "2026-03-01", ""),
            trip("a", 0.0, 1.0, "2026-01-01", ""),
            trip("b", 0.0, 2.0, "2026-02-01", ""),
        ]);
        assert_eq!(ids(sort_trips(&trips)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let trips = geo_trips(&[
            trip("second", 0.0, 3.0, "2026-03-01", ""),
            trip("first", 0.0, 1.0, "2026-01-01", ""),
            trip("third", 0.0, 2.0, "2026-03-01", ""),
        ]);
        assert_eq!(ids(sort_trips(&trips)), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_sort_keeps_undated_in_place() {
        let trips = geo_trips(&[
            trip("june", 0.0, 1.0, "2026-06-01", ""),
            trip("undated", 0.0, 2.0, "", ""),
            trip("january", 0.0, 3.0, "2026-01-01", ""),
            trip("also-undated", 0.0, 4.0, "", ""),
            trip("march", 0.0, 5.0, "2026-03-01", ""),
        ]);
        assert_eq!(
            ids(sort_trips(&trips)),
            vec!["january", "undated", "march", "also-undated", "june"]
        );
    }

    #[test]
    fn test_sort_all_undated() {
        let trips = geo_trips(&[
            trip("b", 0.0, 1.0, "", ""),
            trip("a", 0.0, 2.0, "", ""),
        ]);
        assert_eq!(ids(sort_trips(&trips)), vec!["b", "a"]);
    }
}
