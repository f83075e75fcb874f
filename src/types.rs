use approx::{AbsDiffEq, RelativeEq, abs_diff_eq, relative_eq};
use thiserror::Error;

use crate::measure::Degrees;

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("geographic point invariant: invalid value {1:?} for {0:?}")]
    GeoPointInvariant(GeoPointDimension, Degrees<f64>),
}

type Result<T> = std::result::Result<T, TypeError>;

/// A point on the surface of a spherical Earth.
///
/// Enforces finite, in-range latitude and longitude values as type invariants,
/// so anything holding a `GeoPoint` can be routed without further checks.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LatLon", into = "LatLon")
)]
pub struct GeoPoint {
    lat: Degrees<f64>,
    lon: Degrees<f64>,
}

#[derive(Debug)]
pub enum GeoPointDimension {
    Latitude,
    Longitude,
}

impl GeoPoint {
    pub fn new(lat: Degrees<f64>, lon: Degrees<f64>) -> Result<GeoPoint> {
        // NaN is outside every range.
        if !(-90.0..=90.0).contains(&lat.0) {
            return Err(TypeError::GeoPointInvariant(
                GeoPointDimension::Latitude,
                lat,
            ));
        }
        if !(-180.0..=180.0).contains(&lon.0) {
            return Err(TypeError::GeoPointInvariant(
                GeoPointDimension::Longitude,
                lon,
            ));
        }
        Ok(Self { lat, lon })
    }

    /// Get point latitude
    pub fn lat(&self) -> Degrees<f64> {
        self.lat
    }

    /// Get point longitude
    pub fn lon(&self) -> Degrees<f64> {
        self.lon
    }
}

impl Default for GeoPoint {
    fn default() -> GeoPoint {
        GeoPoint {
            lat: Degrees(0.0),
            lon: Degrees(0.0),
        }
    }
}

impl AbsDiffEq for GeoPoint {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        abs_diff_eq!(self.lat.0, other.lat.0, epsilon = epsilon)
            && abs_diff_eq!(self.lon.0, other.lon.0, epsilon = epsilon)
    }
}

impl RelativeEq for GeoPoint {
    fn default_max_relative() -> Self::Epsilon {
        0.000_000_000_000_001
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        relative_eq!(
            self.lat.0,
            other.lat.0,
            epsilon = epsilon,
            max_relative = max_relative
        ) && relative_eq!(
            self.lon.0,
            other.lon.0,
            epsilon = epsilon,
            max_relative = max_relative
        )
    }
}

/// Wire form of a [`GeoPoint`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct LatLon {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<LatLon> for GeoPoint {
    type Error = TypeError;

    fn try_from(value: LatLon) -> Result<Self> {
        GeoPoint::new(Degrees(value.latitude), Degrees(value.longitude))
    }
}

#[cfg(feature = "serde")]
impl From<GeoPoint> for LatLon {
    fn from(value: GeoPoint) -> Self {
        LatLon {
            latitude: value.lat.0,
            longitude: value.lon.0,
        }
    }
}

/// Instantiate a `GeoPoint` with a tuple-like syntax.
///
/// Propagates a [`TypeError`] with `?`, so it may only be used in functions
/// returning a compatible `Result`.
#[macro_export]
macro_rules! geo_point {
    ( $lat:expr, $lon:expr ) => {
        $crate::GeoPoint::new(
            $crate::measure::Degrees($lat),
            $crate::measure::Degrees($lon),
        )?
    };
}

/// Instantiate a vec of `GeoPoint` with tuple-like syntax.
#[macro_export]
macro_rules! geo_points {
    ( $( ( $lat:expr, $lon:expr $(,)? ) ),* $(,)? ) => {
        vec![ $( $crate::geo_point!($lat, $lon) ),* ]
    };
}
