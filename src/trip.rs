//! Trip snapshots as read from the trip and profile stores
//!
//! [`TripRecord`] is the raw shape handed over by the trip store, with the
//! destination coordinates possibly missing. [`GeoTrip`] is the routable form
//! produced by [`crate::filter::geo_trips`], carrying a validated destination
//! point.

use chrono::NaiveDate;
use strum::{Display, EnumString};

use crate::types::GeoPoint;

/// Lifecycle status of a trip.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum TripStatus {
    Draft,
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Whether the trip counts towards distance actually traveled.
    pub fn is_traveled(self) -> bool {
        matches!(self, Self::Completed | Self::InProgress)
    }
}

/// How the traveler gets to a trip's destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum TransportMode {
    Flight,
    Car,
}

/// A trip as stored, before geocoding has been checked.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TripRecord {
    pub id: String,

    /// Destination text, also used as its identifier for counting distinct
    /// destinations.
    #[cfg_attr(feature = "serde", serde(default))]
    pub destination: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub destination_latitude: Option<f64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub destination_longitude: Option<f64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub start_date: Option<NaiveDate>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub end_date: Option<NaiveDate>,

    pub status: TripStatus,

    #[cfg_attr(feature = "serde", serde(default))]
    pub transport_mode: Option<TransportMode>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub departure_airport: Option<GeoPoint>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub arrival_airport: Option<GeoPoint>,
}

impl TripRecord {
    /// A record with only an id and status set.
    pub fn new(id: impl Into<String>, status: TripStatus) -> Self {
        Self {
            id: id.into(),
            destination: None,
            destination_latitude: None,
            destination_longitude: None,
            start_date: None,
            end_date: None,
            status,
            transport_mode: None,
            departure_airport: None,
            arrival_airport: None,
        }
    }

    pub fn with_destination(mut self, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.destination = Some(name.into());
        self.destination_latitude = Some(lat);
        self.destination_longitude = Some(lon);
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = Some(mode);
        self
    }

    pub fn with_airports(
        mut self,
        departure: Option<GeoPoint>,
        arrival: Option<GeoPoint>,
    ) -> Self {
        self.departure_airport = departure;
        self.arrival_airport = arrival;
        self
    }
}

/// A trip whose destination has been resolved to a point.
#[derive(Clone, PartialEq, Debug)]
pub struct GeoTrip {
    pub id: String,
    pub destination: Option<String>,
    pub destination_point: GeoPoint,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: TripStatus,
    pub transport_mode: Option<TransportMode>,
    pub departure_airport: Option<GeoPoint>,
    pub arrival_airport: Option<GeoPoint>,
}

impl GeoTrip {
    /// Both airports of a flight, if this trip is a flight and both are known.
    pub fn flight_airports(&self) -> Option<(GeoPoint, GeoPoint)> {
        match (
            self.transport_mode,
            self.departure_airport,
            self.arrival_airport,
        ) {
            (Some(TransportMode::Flight), Some(departure), Some(arrival)) => {
                Some((departure, arrival))
            }
            _ => None,
        }
    }
}

/// The user's home base, which anchors every route when set.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomeLocation {
    pub point: GeoPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
}

impl HomeLocation {
    pub fn new(point: GeoPoint, label: Option<String>) -> Self {
        Self { point, label }
    }
}
