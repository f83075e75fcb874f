//! Choosing a home location through an external geocoder
//!
//! The geocoding lookup itself lives outside this crate, behind the
//! [`Geocoder`] trait. This module owns the policy around it:
//!
//! - [`SearchSession`] decides when a search-as-you-type query may be sent,
//!   debouncing keystrokes and keeping dispatched requests at least a second
//!   apart. Each query gets a [`RequestToken`]; only the response for the
//!   latest token may replace the visible candidates, so a slow, stale
//!   response can never overwrite a newer one.
//! - [`GeocodeCandidate`] turns a raw result into a short display label and a
//!   validated [`HomeLocation`].
//! - [`HomeUpdate`] is the payload written back through the profile store
//!   when the user picks a candidate.

use std::collections::BTreeMap;
use std::num::ParseFloatError;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::measure::Degrees;
use crate::trip::HomeLocation;
use crate::types::{GeoPoint, TypeError};

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoder lookup failed: {0}")]
    Lookup(String),
    #[error("parsing candidate coordinate")]
    ParseFloat(#[from] ParseFloatError),
    #[error("candidate coordinate out of range")]
    Type(#[from] TypeError),
}

type Result<T> = std::result::Result<T, GeocodeError>;

/// One result from the geocoder, as it reports it.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GeocodeCandidate {
    pub display_name: String,

    /// Latitude in degrees, as a decimal string.
    pub lat: String,

    /// Longitude in degrees, as a decimal string.
    pub lon: String,

    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub place_type: String,

    /// Address components such as `city`, `state` and `country`.
    pub address: BTreeMap<String, String>,
}

const LOCALITY_KEYS: [&str; 4] = ["city", "town", "village", "municipality"];

impl GeocodeCandidate {
    /// A short label such as `Paris, Île-de-France, France`.
    ///
    /// Uses the first locality-like address component, falling back to the
    /// leading segment of the display name, followed by the state and country
    /// when known and not repeating what came before.
    pub fn short_label(&self) -> String {
        let locality = LOCALITY_KEYS
            .iter()
            .find_map(|k| self.component(k))
            .or_else(|| {
                self.display_name
                    .split(',')
                    .map(str::trim)
                    .find(|s| !s.is_empty())
            });

        let mut parts: Vec<&str> = Vec::new();
        for part in [locality, self.component("state"), self.component("country")]
            .into_iter()
            .flatten()
        {
            if !parts.contains(&part) {
                parts.push(part);
            }
        }
        parts.join(", ")
    }

    fn component(&self, key: &str) -> Option<&str> {
        self.address
            .get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn point(&self) -> Result<GeoPoint> {
        let lat = self.lat.trim().parse::<f64>()?;
        let lon = self.lon.trim().parse::<f64>()?;
        Ok(GeoPoint::new(Degrees(lat), Degrees(lon))?)
    }

    /// The home location this candidate would set, labelled with
    /// [`Self::short_label`].
    pub fn to_home_location(&self) -> Result<HomeLocation> {
        Ok(HomeLocation::new(self.point()?, Some(self.short_label())))
    }

    pub fn to_home_update(&self) -> Result<HomeUpdate> {
        Ok(HomeUpdate::from(&self.to_home_location()?))
    }
}

/// Fields written to the user's profile when a home location is chosen.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct HomeUpdate {
    pub home_city: Option<String>,
    pub home_latitude: f64,
    pub home_longitude: f64,
}

impl From<&HomeLocation> for HomeUpdate {
    fn from(home: &HomeLocation) -> Self {
        Self {
            home_city: home.label.clone(),
            home_latitude: home.point.lat().0,
            home_longitude: home.point.lon().0,
        }
    }
}

/// The external lookup service.
pub trait Geocoder {
    /// Candidates for a free-text query, best match first.
    fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>>;
}

/// Identifies one issued query. Later queries have larger tokens.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RequestToken(u64);

/// Timing policy for a [`SearchSession`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub min_interval: Duration,
    pub min_query_chars: usize,
}

impl SearchOptions {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_interval: Duration::from_secs(1),
            min_query_chars: 3,
        }
    }
}

/// What the caller should do after a query changes.
#[derive(Clone, PartialEq, Debug)]
pub enum SearchPlan {
    /// The query is too short to send. Any pending request is superseded and
    /// the visible candidates have been cleared.
    Idle,
    /// Send `query` at `at`, after checking [`SearchSession::should_dispatch`].
    Dispatch {
        token: RequestToken,
        query: String,
        at: Instant,
    },
}

/// Search-as-you-type state for one home-location picker.
#[derive(Debug)]
pub struct SearchSession {
    options: SearchOptions,
    latest: RequestToken,
    last_dispatch: Option<Instant>,
    candidates: Vec<GeocodeCandidate>,
}

impl SearchSession {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            latest: RequestToken(0),
            last_dispatch: None,
            candidates: Vec::new(),
        }
    }

    /// The query text changed at `now`.
    ///
    /// Always supersedes any earlier query, whether or not it was sent yet.
    pub fn query_changed(&mut self, query: &str, now: Instant) -> SearchPlan {
        self.latest = RequestToken(self.latest.0 + 1);
        let query = query.trim();
        if query.chars().count() < self.options.min_query_chars {
            trace!("Query {:?} too short to search", query);
            self.candidates.clear();
            return SearchPlan::Idle;
        }

        let mut at = now + self.options.debounce;
        if let Some(last) = self.last_dispatch {
            at = at.max(last + self.options.min_interval);
        }
        SearchPlan::Dispatch {
            token: self.latest,
            query: query.to_owned(),
            at,
        }
    }

    /// Whether the request for `token` should go out at `now`.
    ///
    /// Returns false for superseded tokens and for anything that would come
    /// within the minimum interval of the previous request. A true result
    /// records `now` as the latest dispatch time.
    pub fn should_dispatch(&mut self, token: RequestToken, now: Instant) -> bool {
        if token != self.latest {
            debug!("Dropping superseded geocode request {:?}", token);
            return false;
        }
        if let Some(last) = self.last_dispatch {
            if now.saturating_duration_since(last) < self.options.min_interval {
                return false;
            }
        }
        self.last_dispatch = Some(now);
        true
    }

    /// Apply the response for `token`.
    ///
    /// Returns false for a stale response, which is discarded. A failed lookup
    /// shows as no candidates.
    pub fn complete(
        &mut self,
        token: RequestToken,
        response: Result<Vec<GeocodeCandidate>>,
    ) -> bool {
        if token != self.latest {
            debug!("Discarding stale geocode response {:?}", token);
            return false;
        }
        self.candidates = response.unwrap_or_else(|e| {
            warn!("Geocode lookup failed: {e}");
            Vec::new()
        });
        true
    }

    /// Run the lookup for a dispatched token against `geocoder` and apply its
    /// result.
    pub fn run<G: Geocoder>(&mut self, geocoder: &G, token: RequestToken, query: &str) -> bool {
        let response = geocoder.search(query);
        self.complete(token, response)
    }

    pub fn candidates(&self) -> &[GeocodeCandidate] {
        &self.candidates
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}
