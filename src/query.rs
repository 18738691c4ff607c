//! Keyed query cache
//!
//! Holds the remote data the client has fetched, one [`Query`] per key:
//!
//! - `Stations`: the full station list (singleton)
//! - `Station(id)`: camera list and metadata for one station
//! - `Interesting`: stations flagged by user reports (singleton)
//!
//! Each query moves `Idle → Loading → Success | Error`. A settled query stays
//! settled until [`QueryCache::refetch`] is called; nothing expires by time.
//! Every request gets a ticket and only the response carrying the newest
//! ticket for its key is applied, so a slow stale response cannot overwrite a
//! newer one.

use std::collections::HashMap;

use crate::api::{ApiError, InterestingStation, Station, StationDetail};
use crate::logic::errors::{classify_error, format_error_message, ErrorType};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Stations,
    Station(String),
    Interesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Failure recorded on a query (kept as text so the model stays `Clone`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub kind: ErrorType,
    pub message: String,
}

impl From<&ApiError> for QueryError {
    fn from(error: &ApiError) -> Self {
        Self {
            kind: classify_error(error),
            message: format_error_message(error),
        }
    }
}

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(pub u64);

#[derive(Debug, Clone)]
pub struct Query<T> {
    phase: Phase,
    data: Option<T>,
    error: Option<QueryError>,
    latest: u64,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            error: None,
            latest: 0,
        }
    }
}

impl<T> Query<T> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Data of the last successful fetch (kept while a refetch is in flight)
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.phase = Phase::Loading;
        Ticket(self.latest)
    }

    /// Apply a response. Returns false (and changes nothing) for a stale ticket.
    fn resolve(&mut self, ticket: Ticket, result: Result<T, QueryError>) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        match result {
            Ok(data) => {
                self.phase = Phase::Success;
                self.data = Some(data);
                self.error = None;
            }
            Err(error) => {
                self.phase = Phase::Error;
                self.data = None;
                self.error = Some(error);
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    stations: Query<Vec<Station>>,
    details: HashMap<String, Query<StationDetail>>,
    interesting: Query<Vec<InterestingStation>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stations(&self) -> &Query<Vec<Station>> {
        &self.stations
    }

    pub fn interesting(&self) -> &Query<Vec<InterestingStation>> {
        &self.interesting
    }

    pub fn detail(&self, station_id: &str) -> Option<&Query<StationDetail>> {
        self.details.get(station_id)
    }

    /// Look up a station from the list by id
    pub fn station(&self, station_id: &str) -> Option<&Station> {
        self.stations
            .data()
            .and_then(|list| list.iter().find(|s| s.id == station_id))
    }

    /// Report count for a station, if it is flagged interesting
    pub fn interesting_count(&self, station_id: &str) -> Option<u32> {
        self.interesting
            .data()
            .and_then(|list| list.iter().find(|e| e.station_id == station_id))
            .map(|e| e.count)
    }

    /// Start a request for `key` unless one is in flight or the entry is warm.
    ///
    /// A station detail that ended in error is retried, since reopening a
    /// station is the user asking for it again.
    pub fn fetch(&mut self, key: &QueryKey) -> Option<Ticket> {
        match key {
            QueryKey::Stations => match self.stations.phase {
                Phase::Idle => Some(self.stations.begin()),
                _ => None,
            },
            QueryKey::Interesting => match self.interesting.phase {
                Phase::Idle => Some(self.interesting.begin()),
                _ => None,
            },
            QueryKey::Station(id) => {
                let query = self.details.entry(id.clone()).or_default();
                match query.phase {
                    Phase::Idle | Phase::Error => Some(query.begin()),
                    Phase::Loading | Phase::Success => None,
                }
            }
        }
    }

    /// Start a request for `key` regardless of its current state
    pub fn refetch(&mut self, key: &QueryKey) -> Ticket {
        match key {
            QueryKey::Stations => self.stations.begin(),
            QueryKey::Interesting => self.interesting.begin(),
            QueryKey::Station(id) => self.details.entry(id.clone()).or_default().begin(),
        }
    }

    pub fn resolve_stations(&mut self, ticket: Ticket, result: Result<Vec<Station>, QueryError>) -> bool {
        self.stations.resolve(ticket, result)
    }

    pub fn resolve_detail(
        &mut self,
        station_id: &str,
        ticket: Ticket,
        result: Result<StationDetail, QueryError>,
    ) -> bool {
        match self.details.get_mut(station_id) {
            Some(query) => query.resolve(ticket, result),
            None => false,
        }
    }

    /// Interesting stations are best effort: a failure is logged and
    /// recorded as an empty list.
    pub fn resolve_interesting(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<InterestingStation>, QueryError>,
    ) -> bool {
        let result = match result {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Interesting stations unavailable: {}", e.message);
                Vec::new()
            }
        };
        self.interesting.resolve(ticket, Ok(result))
    }
}
