//! Command dispatch
//!
//! Turns the [`Cmd`]s returned by session transitions into work for the API
//! worker and background tasks.

use kelitui::messages::Cmd;

use crate::services::api::{ApiRequest, Priority};
use crate::App;

impl App {
    pub(crate) fn dispatch(&mut self, cmds: Vec<Cmd>) {
        for cmd in cmds {
            self.dispatch_one(cmd);
        }
    }

    fn dispatch_one(&mut self, cmd: Cmd) {
        let priority = if cmd.is_user_initiated() {
            Priority::High
        } else {
            Priority::Low
        };

        let request = match cmd {
            Cmd::FetchStations { ticket } => ApiRequest::GetStations { ticket },
            Cmd::FetchStationDetail { station_id, ticket } => {
                ApiRequest::GetStationDetail { station_id, ticket }
            }
            Cmd::FetchInteresting { ticket } => ApiRequest::GetInteresting { ticket },
            Cmd::SubmitReport { station_id } => ApiRequest::ReportInteresting { station_id },
            Cmd::LoadImage {
                station_id,
                generation,
                camera_id,
                thumbnail,
            } => {
                if !self.begin_image_load(generation, &camera_id, thumbnail) {
                    return;
                }
                ApiRequest::GetCameraImage {
                    station_id,
                    generation,
                    camera_id,
                    thumbnail,
                    priority,
                }
            }
            Cmd::CopyToClipboard { text } => {
                self.copy_to_clipboard(text);
                return;
            }
        };

        if self.api_tx.send(request).is_err() {
            tracing::error!("API worker is gone, request dropped");
        }
    }
}
