//! Session state and transitions
//!
//! Ties the model, query cache and preference registries together. Every
//! user action and every I/O result goes through a method here; methods
//! that need I/O return [`Cmd`]s for the runtime to execute.

use std::collections::HashSet;
use std::rc::Rc;
use std::time::Instant;

use crate::api::{ApiError, InterestingStation, Station, StationDetail};
use crate::logic::cluster::{cluster_points, expansion_zoom, ClusterConfig, MapMarker};
use crate::logic::map::{pick_nearest, GeoPoint};
use crate::logic::partition::partition_stations;
use crate::logic::search::filter_stations;
use crate::messages::Cmd;
use crate::model::{Model, ReportState};
use crate::prefs::PreferenceStore;
use crate::query::{Phase, QueryCache, QueryError, QueryKey, Ticket};
use crate::registry::{
    BookmarkRegistry, BookmarkedStation, Language, LanguageRegistry, MapStyle, MapStyleRegistry,
};
use crate::route::Route;

/// Pick radius around the crosshair, in cell widths
pub const PICK_RADIUS: f64 = 3.0;

/// Maximum number of search results listed
pub const SEARCH_LIMIT: usize = 10;

/// Zoom used when jumping to a single station
pub const STATION_ZOOM: u8 = 12;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub vim_mode: bool,
    pub cluster: ClusterConfig,
    /// Base URL of shareable links
    pub share_base: String,
}

/// What is drawn on the map this frame
#[derive(Debug, Default)]
pub struct MapLayers<'a> {
    /// Standard stations (indices of `markers` point into this)
    pub standard: Vec<&'a Station>,
    /// Clustered or single markers for `standard`
    pub markers: Vec<MapMarker>,
    /// Flagged stations, always drawn individually
    pub interesting: Vec<(&'a Station, u32)>,
}

/// What the crosshair selected
#[derive(Debug, Clone, PartialEq)]
pub enum MapSelection {
    Station { id: String, name: String },
    Cluster { center: GeoPoint, zoom: u8 },
}

/// One row of the bookmark list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: String,
    pub name: String,
    /// Report count when the station is flagged interesting
    pub heat: Option<u32>,
}

pub struct Session {
    pub model: Model,
    pub queries: QueryCache,
    pub bookmarks: BookmarkRegistry,
    pub map_style: MapStyleRegistry,
    pub language: LanguageRegistry,
    share_base: String,
    /// Stations with a report submission awaiting its response
    reports_in_flight: HashSet<String>,
}

impl Session {
    pub fn new(store: Rc<PreferenceStore>, options: SessionOptions) -> Self {
        Self {
            model: Model::new(options.vim_mode, options.cluster),
            queries: QueryCache::new(),
            bookmarks: BookmarkRegistry::load(store.clone()),
            map_style: MapStyleRegistry::load(store.clone()),
            language: LanguageRegistry::load(store),
            share_base: options.share_base,
            reports_in_flight: HashSet::new(),
        }
    }

    /// Initial requests: station list and interesting stations
    pub fn start(&mut self) -> Vec<Cmd> {
        let mut cmds = Vec::new();
        if let Some(ticket) = self.queries.fetch(&QueryKey::Stations) {
            cmds.push(Cmd::FetchStations { ticket });
        }
        if let Some(ticket) = self.queries.fetch(&QueryKey::Interesting) {
            cmds.push(Cmd::FetchInteresting { ticket });
        }
        cmds
    }

    /// Reload the station list (user asked for it, e.g. after an error)
    pub fn refresh_stations(&mut self) -> Vec<Cmd> {
        let ticket = self.queries.refetch(&QueryKey::Stations);
        vec![Cmd::FetchStations { ticket }]
    }

    // ============================================
    // NAVIGATION
    // ============================================

    /// Switch route. Opening a station starts (or reuses) its detail query.
    pub fn navigate(&mut self, route: Route) -> Vec<Cmd> {
        let bookmarks = &self.bookmarks;
        if !self.model.set_route(route, |id| bookmarks.contains(id)) {
            return Vec::new();
        }
        tracing::debug!("Route changed to {:?}", self.model.route());

        let Some(station_id) = self.model.open_station_id().map(str::to_string) else {
            return Vec::new();
        };

        // A reopened modal picks up a report still in flight
        if self.reports_in_flight.contains(&station_id) {
            if let Some(modal) = self.model.modal_mut() {
                modal.report = ReportState::Sending;
            }
        }

        let key = QueryKey::Station(station_id.clone());
        match self.queries.fetch(&key) {
            Some(ticket) => {
                self.refresh_title();
                vec![Cmd::FetchStationDetail { station_id, ticket }]
            }
            None => {
                // Warm (or already loading) entry: render from the cache
                self.refresh_title();
                self.clamp_camera();
                self.image_commands()
            }
        }
    }

    pub fn close_station(&mut self) {
        self.model.close_station();
    }

    /// Open a station and centre the map on it when its position is known
    pub fn jump_to_station(&mut self, id: &str, name: &str) -> Vec<Cmd> {
        if let Some(station) = self.queries.station(id) {
            let point = GeoPoint::new(station.latitude, station.longitude);
            let zoom = self.model.map.viewport.zoom.max(STATION_ZOOM);
            self.model.map.viewport.focus(point, zoom);
        }
        self.navigate(Route::station(id, name))
    }

    // ============================================
    // FETCH RESULTS
    // ============================================

    pub fn stations_loaded(&mut self, ticket: Ticket, result: Result<Vec<Station>, ApiError>) {
        let result = result.map_err(|e| {
            tracing::warn!("Station list failed: {}", e);
            QueryError::from(&e)
        });
        if let Ok(list) = &result {
            tracing::debug!("Loaded {} stations", list.len());
        }
        if self.queries.resolve_stations(ticket, result) {
            self.refresh_title();
        }
    }

    /// Cache a detail response. It only reaches the modal when it belongs to
    /// the station that is open right now.
    pub fn detail_loaded(
        &mut self,
        station_id: &str,
        ticket: Ticket,
        result: Result<StationDetail, ApiError>,
    ) -> Vec<Cmd> {
        let result = result.map_err(|e| {
            tracing::warn!("Station {} detail failed: {}", station_id, e);
            QueryError::from(&e)
        });

        if !self.queries.resolve_detail(station_id, ticket, result) {
            tracing::debug!("Dropped stale detail response for {}", station_id);
            return Vec::new();
        }

        if self.model.open_station_id() != Some(station_id) {
            tracing::debug!("Detail for {} cached, modal shows another station", station_id);
            return Vec::new();
        }

        self.refresh_title();
        self.clamp_camera();
        self.image_commands()
    }

    pub fn interesting_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<InterestingStation>, ApiError>,
    ) {
        let result = result.map_err(|e| QueryError::from(&e));
        self.queries.resolve_interesting(ticket, result);
    }

    // ============================================
    // DETAIL MODAL ACTIONS
    // ============================================

    /// Detail of the open station, when loaded
    pub fn open_detail(&self) -> Option<&StationDetail> {
        let id = self.model.open_station_id()?;
        self.queries.detail(id)?.data()
    }

    /// Load state of the open station's detail
    pub fn open_detail_phase(&self) -> Option<Phase> {
        let id = self.model.open_station_id()?;
        Some(
            self.queries
                .detail(id)
                .map(|q| q.phase())
                .unwrap_or(Phase::Idle),
        )
    }

    pub fn next_camera(&mut self) -> Vec<Cmd> {
        let count = self.camera_count();
        if let Some(modal) = self.model.modal_mut() {
            modal.next_camera(count);
        }
        self.image_commands()
    }

    pub fn prev_camera(&mut self) -> Vec<Cmd> {
        let count = self.camera_count();
        if let Some(modal) = self.model.modal_mut() {
            modal.prev_camera(count);
        }
        self.image_commands()
    }

    pub fn toggle_fullscreen(&mut self) {
        if let Some(modal) = self.model.modal_mut() {
            modal.toggle_fullscreen();
        }
    }

    /// Shareable link of the current route
    pub fn share_link(&self) -> String {
        self.model.route().to_link(&self.share_base)
    }

    pub fn copy_link(&mut self) -> Vec<Cmd> {
        if self.model.modal().is_none() {
            return Vec::new();
        }
        vec![Cmd::CopyToClipboard {
            text: self.share_link(),
        }]
    }

    pub fn copy_finished(&mut self, result: Result<(), String>, now: Instant) {
        match result {
            Ok(()) => {
                if let Some(modal) = self.model.modal_mut() {
                    modal.mark_copied(now);
                }
            }
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {}", e);
                self.model.show_toast(format!("Error: {}", e));
            }
        }
    }

    /// Flip the bookmark of the open station. Returns the new state.
    pub fn toggle_bookmark(&mut self) -> Option<bool> {
        let modal = self.model.modal()?;
        // Keep the name the station was opened with, not the localized title
        let name = if modal.caller_name.trim().is_empty() {
            modal.title.clone()
        } else {
            modal.caller_name.clone()
        };
        let station = BookmarkedStation::new(modal.station_id.clone(), name);
        let starred = self.bookmarks.toggle(station);
        if let Some(modal) = self.model.modal_mut() {
            modal.starred = starred;
        }
        Some(starred)
    }

    pub fn submit_report(&mut self) -> Vec<Cmd> {
        let Some(modal) = self.model.modal_mut() else {
            return Vec::new();
        };
        if self.reports_in_flight.contains(&modal.station_id) || !modal.begin_report() {
            return Vec::new();
        }
        let station_id = modal.station_id.clone();
        self.reports_in_flight.insert(station_id.clone());
        vec![Cmd::SubmitReport { station_id }]
    }

    /// A report finished. Success refreshes the interesting stations.
    pub fn report_finished(&mut self, station_id: &str, result: Result<(), ApiError>, now: Instant) -> Vec<Cmd> {
        if !self.reports_in_flight.remove(station_id) {
            tracing::debug!("Ignoring report result for {} with nothing in flight", station_id);
            return Vec::new();
        }

        let success = match &result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Report for {} failed: {}", station_id, e);
                false
            }
        };

        if let Some(modal) = self.model.modal_mut() {
            if modal.station_id == station_id {
                modal.report_resolved(success, now);
            }
        }

        if !success {
            return Vec::new();
        }
        let ticket = self.queries.refetch(&QueryKey::Interesting);
        vec![Cmd::FetchInteresting { ticket }]
    }

    // ============================================
    // PREFERENCES
    // ============================================

    pub fn toggle_language(&mut self) -> Language {
        let language = self.language.toggle();
        self.refresh_title();
        language
    }

    pub fn toggle_map_style(&mut self) -> MapStyle {
        self.map_style.toggle()
    }

    /// Pick up bookmark changes written by another instance
    pub fn sync_bookmarks(&mut self) -> bool {
        if !self.bookmarks.sync_from_store() {
            return false;
        }
        let starred = self
            .model
            .open_station_id()
            .map(|id| self.bookmarks.contains(id));
        if let (Some(starred), Some(modal)) = (starred, self.model.modal_mut()) {
            modal.starred = starred;
        }
        self.model.menu.clamp(self.bookmarks.len());
        true
    }

    /// Expire transient indicators
    pub fn tick(&mut self, now: Instant) {
        if let Some(modal) = self.model.modal_mut() {
            modal.tick(now);
        }
    }

    // ============================================
    // MAP
    // ============================================

    /// Markers to draw. Empty unless the station list loaded successfully.
    pub fn map_layers(&self) -> MapLayers<'_> {
        let stations = self.queries.stations();
        let list = match (stations.phase(), stations.data()) {
            (Phase::Success, Some(list)) => list,
            _ => return MapLayers::default(),
        };

        let interesting = self
            .queries
            .interesting()
            .data()
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let partition = partition_stations(list, interesting);

        let points: Vec<GeoPoint> = partition
            .standard
            .iter()
            .map(|s| GeoPoint::new(s.latitude, s.longitude))
            .collect();
        let (cols, rows) = self.model.map.area;
        let markers = cluster_points(
            &points,
            &self.model.map.viewport,
            cols,
            rows,
            &self.model.map.cluster,
        );

        MapLayers {
            standard: partition.standard,
            markers,
            interesting: partition.interesting,
        }
    }

    /// Marker or cluster nearest the crosshair
    pub fn selection_at_crosshair(&self) -> Option<MapSelection> {
        let layers = self.map_layers();
        let viewport = &self.model.map.viewport;
        let (cols, rows) = self.model.map.area;

        // Interesting stations are listed first so they win ties
        let mut points: Vec<GeoPoint> = layers
            .interesting
            .iter()
            .map(|(s, _)| GeoPoint::new(s.latitude, s.longitude))
            .collect();
        points.extend(layers.markers.iter().map(MapMarker::point));

        let index = pick_nearest(viewport, cols, rows, &points, PICK_RADIUS)?;
        if let Some((station, _)) = layers.interesting.get(index) {
            return Some(MapSelection::Station {
                id: station.id.clone(),
                name: station.name.clone(),
            });
        }

        match &layers.markers[index - layers.interesting.len()] {
            MapMarker::Single { index, .. } => {
                let station = layers.standard[*index];
                Some(MapSelection::Station {
                    id: station.id.clone(),
                    name: station.name.clone(),
                })
            }
            MapMarker::Cluster { center, .. } => Some(MapSelection::Cluster {
                center: *center,
                zoom: expansion_zoom(viewport.zoom, self.model.map.cluster.max_zoom),
            }),
        }
    }

    /// Act on whatever is under the crosshair: open a station or expand a
    /// cluster
    pub fn select_at_crosshair(&mut self) -> Vec<Cmd> {
        match self.selection_at_crosshair() {
            Some(MapSelection::Station { id, name }) => self.navigate(Route::station(id, name)),
            Some(MapSelection::Cluster { center, zoom }) => {
                self.model.map.viewport.focus(center, zoom);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn location_resolved(&mut self, position: Option<GeoPoint>) {
        self.model.map.set_location(position);
    }

    // ============================================
    // MENU & SEARCH
    // ============================================

    /// Bookmarks with names from the live list when available
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        self.bookmarks
            .list()
            .iter()
            .map(|b| MenuEntry {
                id: b.id.clone(),
                name: self
                    .queries
                    .station(&b.id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| b.name.clone()),
                heat: self.queries.interesting_count(&b.id),
            })
            .collect()
    }

    pub fn open_selected_bookmark(&mut self) -> Vec<Cmd> {
        let entries = self.menu_entries();
        let Some(entry) = entries.get(self.model.menu.selected) else {
            return Vec::new();
        };
        self.model.menu.close();
        self.jump_to_station(&entry.id, &entry.name)
    }

    pub fn remove_selected_bookmark(&mut self) -> bool {
        let Some(id) = self
            .bookmarks
            .list()
            .get(self.model.menu.selected)
            .map(|b| b.id.clone())
        else {
            return false;
        };
        let removed = self.bookmarks.remove(&id);
        if self.model.open_station_id() == Some(id.as_str()) {
            if let Some(modal) = self.model.modal_mut() {
                modal.starred = false;
            }
        }
        self.model.menu.clamp(self.bookmarks.len());
        removed
    }

    pub fn clear_bookmarks(&mut self) {
        self.bookmarks.clear();
        if let Some(modal) = self.model.modal_mut() {
            modal.starred = false;
        }
        self.model.menu.selected = 0;
        self.model.menu.confirm_clear = false;
    }

    pub fn search_results(&self) -> Vec<&Station> {
        match self.queries.stations().data() {
            Some(list) => filter_stations(list, &self.model.ui.search_query, SEARCH_LIMIT),
            None => Vec::new(),
        }
    }

    pub fn open_search_result(&mut self) -> Vec<Cmd> {
        let Some((id, name)) = self
            .search_results()
            .get(self.model.ui.search_selected)
            .map(|s| (s.id.clone(), s.name.clone()))
        else {
            return Vec::new();
        };
        self.model.ui.cancel_search();
        self.jump_to_station(&id, &name)
    }

    // ============================================
    // HELPERS
    // ============================================

    fn camera_count(&self) -> usize {
        self.open_detail().map(|d| d.cameras.len()).unwrap_or(0)
    }

    fn clamp_camera(&mut self) {
        let count = self.camera_count();
        if let Some(modal) = self.model.modal_mut() {
            modal.camera_index = crate::logic::carousel::clamp_index(modal.camera_index, count);
        }
    }

    fn refresh_title(&mut self) {
        let Some(id) = self.model.open_station_id().map(str::to_string) else {
            return;
        };
        let language = self.language.get();
        let detail = self.queries.detail(&id).and_then(|q| q.data()).cloned();
        let list_name = self.queries.station(&id).map(|s| s.name.clone());
        if let Some(modal) = self.model.modal_mut() {
            modal.resolve_title(detail.as_ref(), language, list_name.as_deref());
        }
    }

    /// Thumbnails for every camera plus the full image of the selected one
    fn image_commands(&self) -> Vec<Cmd> {
        let (Some(modal), Some(detail)) = (self.model.modal(), self.open_detail()) else {
            return Vec::new();
        };

        let mut cmds: Vec<Cmd> = detail
            .cameras
            .iter()
            .map(|camera| Cmd::LoadImage {
                station_id: modal.station_id.clone(),
                generation: modal.generation,
                camera_id: camera.id.clone(),
                thumbnail: true,
            })
            .collect();

        if let Some(camera) = detail.cameras.get(modal.camera_index) {
            cmds.push(Cmd::LoadImage {
                station_id: modal.station_id.clone(),
                generation: modal.generation,
                camera_id: camera.id.clone(),
                thumbnail: false,
            });
        }
        cmds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Camera;

    fn session() -> Session {
        let store = Rc::new(PreferenceStore::new_in_memory().unwrap());
        Session::new(
            store,
            SessionOptions {
                vim_mode: false,
                cluster: ClusterConfig::default(),
                share_base: "https://keli.example".to_string(),
            },
        )
    }

    fn camera(id: &str) -> Camera {
        Camera {
            id: id.to_string(),
            name: id.to_string(),
            url: String::new(),
        }
    }

    fn detail(cameras: &[&str]) -> StationDetail {
        StationDetail {
            cameras: cameras.iter().map(|c| camera(c)).collect(),
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
    fn test_start_fetches_stations_and_interesting() {
        let mut s = session();
        let cmds = s.start();
        assert_eq!(cmds.len(), 2);
        assert!(s.start().is_empty(), "no duplicate requests while loading");
    }

    #[test]
    fn test_navigate_to_map_is_noop() {
        let mut s = session();
        assert!(s.navigate(Route::Map).is_empty());
    }

    #[test]
    fn test_detail_loads_images_for_open_station() {
        let mut s = session();
        let cmds = s.navigate(Route::station("A", "Alpha"));
        let ticket = detail_ticket(&cmds);

        let cmds = s.detail_loaded("A", ticket, Ok(detail(&["c1", "c2"])));
        // two thumbnails and one full image
        assert_eq!(cmds.len(), 3);
        assert!(cmds.contains(&Cmd::LoadImage {
            station_id: "A".into(),
            generation: s.model.modal().unwrap().generation,
            camera_id: "c1".into(),
            thumbnail: false,
        }));
    }

    #[test]
    fn test_warm_detail_not_refetched() {
        let mut s = session();
        let ticket = detail_ticket(&s.navigate(Route::station("A", "")));
        s.detail_loaded("A", ticket, Ok(detail(&["c1"])));
        s.close_station();

        let cmds = s.navigate(Route::station("A", ""));
        assert!(cmds
            .iter()
            .all(|c| !matches!(c, Cmd::FetchStationDetail { .. })));
        assert!(!cmds.is_empty(), "images requested from cached detail");
    }

    #[test]
    fn test_copy_link_uses_route() {
        let mut s = session();
        s.navigate(Route::station("C01503", "Oulu"));
        assert_eq!(
            s.copy_link(),
            vec![Cmd::CopyToClipboard {
                text: "https://keli.example/?id=C01503&name=Oulu".to_string()
            }]
        );

        let now = Instant::now();
        s.copy_finished(Ok(()), now);
        assert!(s.model.modal().unwrap().is_copied(now));
    }

    #[test]
    fn test_copy_failure_shows_error_toast() {
        let mut s = session();
        s.navigate(Route::station("A", ""));
        s.copy_finished(Err("no clipboard".into()), Instant::now());
        let (message, _) = s.model.ui.toast_message.clone().unwrap();
        assert!(message.starts_with("Error:"));
        assert!(s.model.modal().unwrap().copied_at.is_none());
    }

    #[test]
    fn test_toggle_bookmark_mirrors_registry() {
        let mut s = session();
        assert_eq!(s.toggle_bookmark(), None, "nothing open");
        s.navigate(Route::station("A", "Alpha"));
        assert_eq!(s.toggle_bookmark(), Some(true));
        assert!(s.model.modal().unwrap().starred);
        assert_eq!(s.bookmarks.list()[0], BookmarkedStation::new("A", "Alpha"));
        assert_eq!(s.toggle_bookmark(), Some(false));
        assert!(!s.bookmarks.contains("A"));
    }

    #[test]
    fn test_bookmark_keeps_caller_name_over_localized_title() {
        let mut s = session();
        s.language.set(Language::Fi);
        let ticket = detail_ticket(&s.navigate(Route::station("A", "Alpha")));
        let mut d = detail(&[]);
        d.localized_names.insert("fi".into(), "Alfa".into());
        s.detail_loaded("A", ticket, Ok(d));
        assert_eq!(s.model.modal().unwrap().title, "Alfa");

        s.toggle_bookmark();
        assert_eq!(s.bookmarks.list()[0].name, "Alpha");

        // No caller name: the resolved title is all there is
        s.toggle_bookmark();
        s.close_station();
        s.navigate(Route::station("A", ""));
        s.toggle_bookmark();
        assert_eq!(s.bookmarks.list()[0].name, "Alfa");
    }

    #[test]
    fn test_language_change_retitles_open_modal() {
        let mut s = session();
        let ticket = detail_ticket(&s.navigate(Route::station("A", "Alpha")));
        let mut d = detail(&[]);
        d.localized_names.insert("fi".into(), "Alfa".into());
        s.detail_loaded("A", ticket, Ok(d));
        assert_eq!(s.model.modal().unwrap().title, "Alpha");

        s.toggle_language();
        assert_eq!(s.model.modal().unwrap().title, "Alfa");
    }

    #[test]
    fn test_camera_navigation_requests_full_image() {
        let mut s = session();
        let ticket = detail_ticket(&s.navigate(Route::station("A", "")));
        s.detail_loaded("A", ticket, Ok(detail(&["c1", "c2", "c3"])));

        let cmds = s.prev_camera();
        assert_eq!(s.model.modal().unwrap().camera_index, 2);
        assert!(cmds.iter().any(|c| matches!(
            c,
            Cmd::LoadImage { camera_id, thumbnail: false, .. } if camera_id == "c3"
        )));
    }

    #[test]
    fn test_menu_entries_prefer_live_names() {
        let mut s = session();
        s.bookmarks.add(BookmarkedStation::new("A", "Stored"));
        s.bookmarks.add(BookmarkedStation::new("B", "Only stored"));

        let cmds = s.start();
        let ticket = match cmds[0] {
            Cmd::FetchStations { ticket } => ticket,
            _ => unreachable!(),
        };
        s.stations_loaded(
            ticket,
            Ok(vec![Station {
                id: "A".into(),
                name: "Live".into(),
                longitude: 25.0,
                latitude: 64.0,
                updated_time: None,
            }]),
        );

        let entries = s.menu_entries();
        assert_eq!(entries[0].name, "Live");
        assert_eq!(entries[1].name, "Only stored");
        assert_eq!(entries[0].heat, None);
    }
}
