//! Map layers and crosshair selection
//!
//! Interesting stations are drawn on their own layer and never take part in
//! clustering. Picking a cluster with the crosshair zooms in on it instead of
//! opening anything; picking a station opens its modal.

use std::rc::Rc;

use kelitui::api::{InterestingStation, Station};
use kelitui::logic::cluster::{ClusterConfig, MapMarker};
use kelitui::logic::map::DEFAULT_CENTER;
use kelitui::messages::Cmd;
use kelitui::prefs::PreferenceStore;
use kelitui::session::{MapSelection, Session, SessionOptions};

const FLAGGED: &str = "FLAGGED";

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

fn station(id: &str, latitude: f64, longitude: f64) -> Station {
    Station {
        id: id.to_string(),
        name: format!("Station {}", id),
        latitude,
        longitude,
        updated_time: None,
    }
}

/// 60 stations packed just south-east of the default centre, plus one
/// flagged station at `flagged_at`
fn crowded_session(flagged_at: (f64, f64)) -> Session {
    let mut s = session();
    let cmds = s.start();

    let mut list: Vec<Station> = (0..60)
        .map(|i| {
            station(
                &format!("S{:02}", i),
                DEFAULT_CENTER.latitude - 0.01 - i as f64 * 0.0005,
                DEFAULT_CENTER.longitude + 0.01 + i as f64 * 0.001,
            )
        })
        .collect();
    list.push(station(FLAGGED, flagged_at.0, flagged_at.1));

    for cmd in cmds {
        match cmd {
            Cmd::FetchStations { ticket } => s.stations_loaded(ticket, Ok(list.clone())),
            Cmd::FetchInteresting { ticket } => s.interesting_loaded(
                ticket,
                Ok(vec![InterestingStation {
                    station_id: FLAGGED.to_string(),
                    count: 4,
                }]),
            ),
            other => panic!("unexpected command {:?}", other),
        }
    }
    s
}

fn far_north() -> (f64, f64) {
    (DEFAULT_CENTER.latitude + 1.0, DEFAULT_CENTER.longitude)
}

#[test]
fn test_interesting_station_is_never_clustered() {
    let s = crowded_session(far_north());
    let layers = s.map_layers();

    assert_eq!(layers.interesting.len(), 1);
    assert_eq!(layers.interesting[0].0.id, FLAGGED);
    assert_eq!(layers.interesting[0].1, 4);

    assert_eq!(layers.standard.len(), 60);
    assert!(layers.standard.iter().all(|st| st.id != FLAGGED));

    // Crowded at the default zoom: one cluster holds everything
    assert!(layers
        .markers
        .iter()
        .any(|m| matches!(m, MapMarker::Cluster { .. })));
    let drawn: usize = layers.markers.iter().map(MapMarker::count).sum();
    assert_eq!(drawn, 60);
}

#[test]
fn test_crosshair_on_cluster_zooms_in() {
    let mut s = crowded_session(far_north());
    let zoom = s.model.map.viewport.zoom;

    let selection = s.selection_at_crosshair();
    assert!(matches!(selection, Some(MapSelection::Cluster { .. })));

    let cmds = s.select_at_crosshair();
    assert!(cmds.is_empty(), "expanding a cluster loads nothing");
    assert!(s.model.modal().is_none());
    assert_eq!(s.model.map.viewport.zoom, zoom + 2);
    assert_ne!(s.model.map.viewport.center, DEFAULT_CENTER);
}

#[test]
fn test_no_clusters_at_max_cluster_zoom() {
    let mut s = crowded_session(far_north());
    s.model.map.viewport.set_zoom(ClusterConfig::default().max_zoom);

    let layers = s.map_layers();
    assert_eq!(layers.markers.len(), 60);
    assert!(layers
        .markers
        .iter()
        .all(|m| matches!(m, MapMarker::Single { .. })));
}

#[test]
fn test_interesting_station_under_crosshair_opens_modal() {
    let mut s = crowded_session((DEFAULT_CENTER.latitude, DEFAULT_CENTER.longitude));

    let cmds = s.select_at_crosshair();
    assert!(cmds.iter().any(
        |c| matches!(c, Cmd::FetchStationDetail { station_id, .. } if station_id == FLAGGED)
    ));
    let modal = s.model.modal().expect("modal open");
    assert_eq!(modal.title, format!("Station {}", FLAGGED));
}

#[test]
fn test_empty_spot_selects_nothing() {
    let mut s = crowded_session(far_north());
    s.model.map.viewport.center.longitude -= 3.0;

    assert!(s.selection_at_crosshair().is_none());
    assert!(s.select_at_crosshair().is_empty());
}
