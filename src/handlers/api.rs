//! API Response Handler
//!
//! Handles responses from the KeliKamerat background service and feeds them
//! to the session. Commands produced by the session (e.g. image loads once
//! a station detail arrives) are dispatched right away.

use std::time::Instant;

use crate::services::api::ApiResponse;
use crate::App;

/// Handle API response from background service
///
/// Response types:
/// - StationsResult: full station list
/// - StationDetailResult: cameras and metadata for one station
/// - InterestingResult: stations flagged by user reports
/// - ReportResult: outcome of a report submission
/// - CameraImageResult: raw camera image bytes
pub fn handle_api_response(app: &mut App, response: ApiResponse) {
    match response {
        ApiResponse::StationsResult { ticket, stations } => {
            app.session.stations_loaded(ticket, stations);
        }

        ApiResponse::StationDetailResult {
            station_id,
            ticket,
            detail,
        } => {
            let cmds = app.session.detail_loaded(&station_id, ticket, detail);
            app.dispatch(cmds);
        }

        ApiResponse::InterestingResult { ticket, stations } => {
            app.session.interesting_loaded(ticket, stations);
        }

        ApiResponse::ReportResult { station_id, result } => {
            let cmds = app
                .session
                .report_finished(&station_id, result, Instant::now());
            app.dispatch(cmds);
        }

        ApiResponse::CameraImageResult {
            station_id,
            generation,
            camera_id,
            thumbnail,
            bytes,
        } => {
            app.image_bytes_received(
                station_id,
                generation,
                camera_id,
                thumbnail,
                bytes.map_err(|e| e.to_string()),
            );
        }
    }
}
