//! Test for station detail race
//!
//! Bug: Opening station A, then quickly station B, could show A's cameras
//! under B's title when A's response arrived last.
//!
//! Root Cause:
//! 1. User opens A → detail request for A starts
//! 2. User opens B before A answers → detail request for B starts
//! 3. B answers first and is rendered
//! 4. A answers → response applied to "the modal" without checking whose it is
//!
//! Fix: detail responses are cached per station and only reach the modal
//! when their station is the one open. Per-key tickets drop responses
//! overtaken by a newer request for the same station.

use std::rc::Rc;

use kelitui::api::{Camera, StationDetail};
use kelitui::logic::cluster::ClusterConfig;
use kelitui::messages::Cmd;
use kelitui::prefs::PreferenceStore;
use kelitui::query::{Phase, Ticket};
use kelitui::route::Route;
use kelitui::session::{Session, SessionOptions};

fn session() -> Session {
    let store = Rc::new(PreferenceStore::new_in_memory().expect("in-memory store"));
    Session::new(
        store,
        SessionOptions {
            vim_mode: false,
            cluster: ClusterConfig::default(),
            share_base: "https://keli.example".to_string(),
        },
    )
}

fn detail(camera_ids: &[&str]) -> StationDetail {
    StationDetail {
        cameras: camera_ids
            .iter()
            .map(|id| Camera {
                id: id.to_string(),
                name: id.to_string(),
                url: String::new(),
            })
            .collect(),
        operational: true,
        ..StationDetail::default()
    }
}

fn detail_ticket(cmds: &[Cmd]) -> Ticket {
    cmds.iter()
        .find_map(|c| match c {
            Cmd::FetchStationDetail { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("detail fetch")
}

#[test]
fn test_late_response_for_previous_station_is_not_shown() {
    let mut s = session();
    let ticket_a = detail_ticket(&s.navigate(Route::station("A", "Alpha")));
    let ticket_b = detail_ticket(&s.navigate(Route::station("B", "Beta")));

    let cmds = s.detail_loaded("B", ticket_b, Ok(detail(&["b1"])));
    assert!(!cmds.is_empty());

    // A arrives last
    let cmds = s.detail_loaded("A", ticket_a, Ok(detail(&["a1", "a2"])));
    assert!(cmds.is_empty(), "no image loads for a closed station");

    let shown = s.open_detail().expect("B detail");
    assert_eq!(shown.cameras[0].id, "b1");
    assert_eq!(s.model.modal().unwrap().title, "Beta");
}

#[test]
fn test_late_response_is_still_cached() {
    let mut s = session();
    let ticket_a = detail_ticket(&s.navigate(Route::station("A", "Alpha")));
    s.navigate(Route::station("B", "Beta"));
    s.detail_loaded("A", ticket_a, Ok(detail(&["a1"])));

    // Going back to A renders from the cache without a new request
    let cmds = s.navigate(Route::station("A", "Alpha"));
    assert!(cmds
        .iter()
        .all(|c| !matches!(c, Cmd::FetchStationDetail { .. })));
    assert_eq!(s.open_detail_phase(), Some(Phase::Success));
}

#[test]
fn test_overtaken_request_for_same_station_is_dropped() {
    let mut s = session();
    let first = detail_ticket(&s.navigate(Route::station("A", "")));
    s.detail_loaded("A", first, Err(kelitui::api::ApiError::Status {
        url: "/stations/A".to_string(),
        status: 500,
    }));
    s.close_station();

    // Reopening after an error asks again
    let second = detail_ticket(&s.navigate(Route::station("A", "")));
    assert_ne!(first, second);

    s.detail_loaded("A", second, Ok(detail(&["new"])));
    // A duplicate of the first, failed request shows up late
    let cmds = s.detail_loaded("A", first, Ok(detail(&["old"])));
    assert!(cmds.is_empty());
    assert_eq!(s.open_detail().unwrap().cameras[0].id, "new");
}

#[test]
fn test_image_loads_carry_modal_generation() {
    let mut s = session();
    let ticket = detail_ticket(&s.navigate(Route::station("A", "")));
    let cmds = s.detail_loaded("A", ticket, Ok(detail(&["a1"])));
    let generation = s.model.modal().unwrap().generation;

    for cmd in &cmds {
        match cmd {
            Cmd::LoadImage {
                station_id,
                generation: g,
                ..
            } => {
                assert_eq!(station_id, "A");
                assert_eq!(*g, generation);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    // After closing, results tagged with the old generation are not current
    s.close_station();
    assert!(!s.model.is_current_modal("A", generation));
}
