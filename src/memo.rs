//! Recompute-on-change caching for travel stats
//!
//! Routes are a pure function of the trip snapshot and the home location, so a
//! caller that re-renders often only needs to rebuild them when either input
//! actually changed. [`input_fingerprint`] hashes exactly the fields the engine
//! reads; [`RouteMemo`] keeps the stats for the last fingerprint it saw.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::trace;

use crate::aggregate::TravelStats;
use crate::trip::{HomeLocation, TripRecord};
use crate::types::GeoPoint;

fn hash_point<H: Hasher>(point: &GeoPoint, state: &mut H) {
    point.lat().0.to_bits().hash(state);
    point.lon().0.to_bits().hash(state);
}

fn hash_opt_point<H: Hasher>(point: Option<&GeoPoint>, state: &mut H) {
    point.is_some().hash(state);
    if let Some(p) = point {
        hash_point(p, state);
    }
}

fn hash_record<H: Hasher>(record: &TripRecord, state: &mut H) {
    record.id.hash(state);
    record.destination.hash(state);
    record.destination_latitude.map(f64::to_bits).hash(state);
    record.destination_longitude.map(f64::to_bits).hash(state);
    record.start_date.hash(state);
    record.end_date.hash(state);
    record.status.hash(state);
    record.transport_mode.hash(state);
    hash_opt_point(record.departure_airport.as_ref(), state);
    hash_opt_point(record.arrival_airport.as_ref(), state);
}

/// A content hash of the engine's inputs.
///
/// Equal inputs always give equal fingerprints. Floats are hashed by bit
/// pattern, so `0.0` and `-0.0` count as different inputs.
pub fn input_fingerprint(records: &[TripRecord], home: Option<&HomeLocation>) -> u64 {
    let mut state = DefaultHasher::new();
    records.len().hash(&mut state);
    for record in records {
        hash_record(record, &mut state);
    }
    hash_opt_point(home.map(|h| &h.point), &mut state);
    home.and_then(|h| h.label.as_deref()).hash(&mut state);
    state.finish()
}

/// Single-slot cache of [`TravelStats`] keyed by [`input_fingerprint`].
#[derive(Debug, Default)]
pub struct RouteMemo {
    entry: Option<(u64, TravelStats)>,
}

impl RouteMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for the given inputs, recomputed only if they changed since the
    /// previous call.
    pub fn get_or_compute(
        &mut self,
        records: &[TripRecord],
        home: Option<&HomeLocation>,
    ) -> &TravelStats {
        let key = input_fingerprint(records, home);
        let stats = match self.entry.take() {
            Some((cached, stats)) if cached == key => stats,
            _ => {
                trace!("Recomputing travel stats for fingerprint {key:016x}");
                TravelStats::compute(records, home)
            }
        };
        &self.entry.insert((key, stats)).1
    }

    /// Whether the stats for these inputs are already cached.
    pub fn is_fresh(&self, records: &[TripRecord], home: Option<&HomeLocation>) -> bool {
        matches!(&self.entry, Some((cached, _)) if *cached == input_fingerprint(records, home))
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
