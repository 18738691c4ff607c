//! Effect types for the Elm Architecture pattern
//!
//! State transitions in [`crate::session::Session`] are pure: instead of
//! doing I/O they return the commands the runtime should execute. Results
//! come back through the session's `*_loaded` / `*_finished` methods.

use crate::query::Ticket;

/// Side effects requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Load the station list
    FetchStations { ticket: Ticket },

    /// Load cameras and metadata for one station
    FetchStationDetail { station_id: String, ticket: Ticket },

    /// Load the stations flagged by user reports
    FetchInteresting { ticket: Ticket },

    /// Report a station as interesting
    SubmitReport { station_id: String },

    /// Load camera image bytes for the modal identified by
    /// `(station_id, generation)`
    LoadImage {
        station_id: String,
        generation: u64,
        camera_id: String,
        thumbnail: bool,
    },

    /// Put text on the system clipboard
    CopyToClipboard { text: String },
}

impl Cmd {
    /// Whether this command was triggered directly by the user
    /// (and should jump the request queue)
    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Cmd::FetchStationDetail { .. }
                | Cmd::SubmitReport { .. }
                | Cmd::LoadImage { thumbnail: false, .. }
                | Cmd::CopyToClipboard { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_initiated() {
        assert!(Cmd::SubmitReport {
            station_id: "A".into()
        }
        .is_user_initiated());
        assert!(!Cmd::FetchStations { ticket: Ticket(1) }.is_user_initiated());
        assert!(!Cmd::LoadImage {
            station_id: "A".into(),
            generation: 1,
            camera_id: "C".into(),
            thumbnail: true,
        }
        .is_user_initiated());
    }
}
