//! A CLI tool and library for estimating travel routes and mileage.
//!
//! Given a user's trips, each possibly geocoded to a destination point, and an
//! optional home base, builds the chronological route the traveler takes
//! between home and each destination, totals its great-circle distance, and
//! describes it as styled lines and markers for a map renderer.
//!
//! Distances use a spherical Earth. They are estimates for a travel summary,
//! not navigation.
//!
//! See [`summarize`] and [`map_layers`] for the main entry points into the
//! library, or [`RouteBuilder`] to build routes directly.
//!
//! # Feature flags
//!
//! - `cli` enables the additional dependencies needed by the CLI
//! - `rayon` (default) builds the traveled and planned routes in parallel
//! - `serde` (default) derives serialization for the data model and routes,
//!   and enables [`snapshot`] loading

pub mod aggregate;
pub mod filter;
pub mod geocode;
pub mod geographic;
pub mod measure;
pub mod memo;
pub mod report;
pub mod route;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod trip;
mod types;
pub mod visual;

pub use aggregate::TravelStats;
pub use geocode::GeocodeError;
pub use route::{Leg, LegKind, Route, RouteBuilder};
use thiserror::Error;
pub use trip::{GeoTrip, HomeLocation, TransportMode, TripRecord, TripStatus};
pub use types::{GeoPoint, GeoPointDimension, TypeError};
pub use visual::MapLayers;

#[derive(Error, Debug)]
pub enum TripMilesError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("Trip snapshot is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("Core type error")]
    Type(#[from] TypeError),
}

pub type Result<T> = std::result::Result<T, TripMilesError>;

/// Compute traveled and planned distances over a user's trips.
pub fn summarize(records: &[TripRecord], home: Option<&HomeLocation>) -> TravelStats {
    TravelStats::compute(records, home)
}

/// Describe the planned route through every geocoded trip for a map.
pub fn map_layers(records: &[TripRecord], home: Option<&HomeLocation>) -> MapLayers {
    let trips = filter::geo_trips(records);
    let route = RouteBuilder::new(home).build(&trips);
    MapLayers::new(&route, &trips, home)
}
