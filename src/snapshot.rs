//! JSON snapshots of a user's trips and home location
//!
//! The stores that own trips and profiles are external; a snapshot is what
//! they hand over for one computation. Its shape is
//!
//! ```json
//! {
//!   "home": { "point": { "latitude": 40.0, "longitude": -74.0 }, "label": "Home" },
//!   "trips": [
//!     {
//!       "id": "t1",
//!       "destination": "Paris",
//!       "destinationLatitude": 48.85,
//!       "destinationLongitude": 2.35,
//!       "startDate": "2026-06-01",
//!       "endDate": "2026-06-05",
//!       "status": "COMPLETED",
//!       "transportMode": "FLIGHT"
//!     }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::trip::{HomeLocation, TripRecord};

#[derive(Clone, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct TripSnapshot {
    #[serde(default)]
    pub home: Option<HomeLocation>,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
}

impl TripSnapshot {
    pub fn from_reader<R: Read>(reader: R) -> crate::Result<Self> {
        let snapshot: TripSnapshot = serde_json::from_reader(reader)?;
        debug!(
            "Read snapshot of {} trips ({} home location)",
            snapshot.trips.len(),
            if snapshot.home.is_some() { "with" } else { "without" }
        );
        Ok(snapshot)
    }

    /// Read a snapshot from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        debug!("Reading snapshot from {:?}", path);
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn home(&self) -> Option<&HomeLocation> {
        self.home.as_ref()
    }
}
