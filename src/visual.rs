//! Map layer descriptors
//!
//! A pure transform from routes and trips into the lines and markers a map
//! renderer draws. Nothing is decided here that [`crate::route`] has not
//! already decided; this module only attaches visual styles.

use strum::Display;

use crate::route::{Leg, LegKind, Route};
use crate::trip::{GeoTrip, HomeLocation, TransportMode, TripStatus};
use crate::types::GeoPoint;

/// Visual treatment of a route line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum LineStyle {
    /// Driving away from home.
    OutboundCar,
    /// Leaving home by air or an unspecified mode.
    Outbound,
    Connecting,
    Return,
    /// Chained destinations when there is no home location.
    Fallback,
}

impl LineStyle {
    pub fn for_leg(leg: &Leg) -> Self {
        match (leg.kind, leg.mode) {
            (LegKind::Outbound, Some(TransportMode::Car)) => Self::OutboundCar,
            (LegKind::Outbound, _) => Self::Outbound,
            (LegKind::Connecting, _) => Self::Connecting,
            (LegKind::Return, _) => Self::Return,
            (LegKind::Fallback, _) => Self::Fallback,
        }
    }

    /// Line color as a CSS hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::OutboundCar => "#16a34a",
            Self::Outbound => "#2563eb",
            Self::Connecting => "#7c3aed",
            Self::Return => "#64748b",
            Self::Fallback => "#94a3b8",
        }
    }

    /// Dash pattern in pixels, or `None` for a solid line.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Return => Some("8 6"),
            Self::Fallback => Some("2 6"),
            _ => None,
        }
    }

    pub fn is_dashed(self) -> bool {
        self.dash_array().is_some()
    }
}

/// A two-point polyline with its style.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LineDescriptor {
    pub points: [GeoPoint; 2],
    pub style: LineStyle,
}

impl From<&Leg> for LineDescriptor {
    fn from(leg: &Leg) -> Self {
        Self {
            points: [leg.from, leg.to],
            style: LineStyle::for_leg(leg),
        }
    }
}

/// What a marker stands for.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum MarkerKind {
    Trip { id: String, status: TripStatus },
    Home,
}

/// A point marker with its color and an optional label.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkerDescriptor {
    pub point: GeoPoint,
    pub kind: MarkerKind,
    pub color: &'static str,
    pub label: Option<String>,
}

/// Color of the marker for a home location.
pub const HOME_MARKER_COLOR: &str = "#dc2626";

/// Marker color for a trip in the given status.
pub fn status_color(status: TripStatus) -> &'static str {
    match status {
        TripStatus::Draft => "#9ca3af",
        TripStatus::Planned => "#3b82f6",
        TripStatus::InProgress => "#f59e0b",
        TripStatus::Completed => "#22c55e",
        TripStatus::Cancelled => "#ef4444",
    }
}

impl From<&GeoTrip> for MarkerDescriptor {
    fn from(trip: &GeoTrip) -> Self {
        Self {
            point: trip.destination_point,
            kind: MarkerKind::Trip {
                id: trip.id.clone(),
                status: trip.status,
            },
            color: status_color(trip.status),
            label: trip.destination.clone(),
        }
    }
}

impl From<&HomeLocation> for MarkerDescriptor {
    fn from(home: &HomeLocation) -> Self {
        Self {
            point: home.point,
            kind: MarkerKind::Home,
            color: HOME_MARKER_COLOR,
            label: home.label.clone(),
        }
    }
}

/// Everything a renderer needs for one map.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MapLayers {
    pub lines: Vec<LineDescriptor>,
    pub markers: Vec<MarkerDescriptor>,
}

impl MapLayers {
    /// Lines for every leg of `route`, one marker per trip, and the home
    /// marker last when a home is set.
    pub fn new(route: &Route, trips: &[GeoTrip], home: Option<&HomeLocation>) -> Self {
        let lines = route.legs.iter().map(LineDescriptor::from).collect();
        let markers = trips
            .iter()
            .map(MarkerDescriptor::from)
            .chain(home.map(MarkerDescriptor::from))
            .collect();
        Self { lines, markers }
    }
}
