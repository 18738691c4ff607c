//! Pure Application Model - Elm Architecture
//!
//! This module defines the plain, cloneable state for the application.
//! The Model is organized into focused sub-models:
//!
//! - **MapModel**: viewport, device position, clustering parameters
//! - **ModalModel**: the open station's detail modal
//! - **MenuModel**: menu panel selection and prompts
//! - **UiModel**: toasts, search, terminal state
//!
//! The current [`Route`] decides whether a modal exists: the modal is open
//! exactly when the route is a station.

pub mod map;
pub mod menu;
pub mod modal;
pub mod ui;

pub use map::{LocationState, MapModel};
pub use menu::MenuModel;
pub use modal::{ModalModel, ReportState};
pub use ui::UiModel;

use crate::logic::cluster::ClusterConfig;
use crate::route::Route;

/// Root application model composed of focused sub-models
#[derive(Clone, Debug)]
pub struct Model {
    route: Route,
    modal: Option<ModalModel>,

    pub map: MapModel,
    pub menu: MenuModel,
    pub ui: UiModel,

    /// Incremented for every opened modal; tags its image loads
    generation: u64,
}

impl Model {
    pub fn new(vim_mode: bool, cluster: ClusterConfig) -> Self {
        Self {
            route: Route::Map,
            modal: None,
            map: MapModel::new(cluster),
            menu: MenuModel::new(),
            ui: UiModel::new(vim_mode),
            generation: 0,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn modal(&self) -> Option<&ModalModel> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut ModalModel> {
        self.modal.as_mut()
    }

    /// Open station currently shown in the modal
    pub fn open_station_id(&self) -> Option<&str> {
        self.modal.as_ref().map(|m| m.station_id.as_str())
    }

    /// Switch to `route`, replacing any open modal.
    ///
    /// Reopening the station that is already open keeps its modal (and its
    /// in-flight state) untouched. Returns whether the route changed.
    pub fn set_route(&mut self, route: Route, starred: impl FnOnce(&str) -> bool) -> bool {
        if route == self.route {
            return false;
        }
        match &route {
            Route::Map => self.modal = None,
            Route::Station { id, name } => {
                if self.open_station_id() != Some(id.as_str()) {
                    self.generation += 1;
                    self.modal = Some(ModalModel::new(
                        id.clone(),
                        name.clone(),
                        starred(id),
                        self.generation,
                    ));
                } else if let Some(modal) = self.modal.as_mut() {
                    modal.caller_name = name.clone();
                }
            }
        }
        self.route = route;
        true
    }

    /// Closing the modal always returns to the map
    pub fn close_station(&mut self) {
        self.route = Route::Map;
        self.modal = None;
    }

    /// Whether an image result tagged `(station_id, generation)` belongs to
    /// the modal that is currently open
    pub fn is_current_modal(&self, station_id: &str, generation: u64) -> bool {
        self.modal
            .as_ref()
            .map(|m| m.station_id == station_id && m.generation == generation)
            .unwrap_or(false)
    }

    /// Show toast message
    pub fn show_toast(&mut self, message: String) {
        self.ui.show_toast(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model::new(false, ClusterConfig::default())
    }

    #[test]
    fn test_model_creation() {
        let model = model();
        assert_eq!(model.route(), &Route::Map);
        assert!(model.modal().is_none());
        assert!(!model.ui.vim_mode);
    }

    #[test]
    fn test_modal_open_iff_station_route() {
        let mut model = model();
        model.set_route(Route::station("A", "Alpha"), |_| false);
        assert_eq!(model.open_station_id(), Some("A"));
        assert_eq!(model.modal().unwrap().title, "Alpha");

        model.set_route(Route::Map, |_| false);
        assert!(model.modal().is_none());

        model.set_route(Route::station("B", "Beta"), |_| true);
        assert!(model.modal().unwrap().starred);
        model.close_station();
        assert_eq!(model.route(), &Route::Map);
        assert!(model.modal().is_none());
    }

    #[test]
    fn test_switching_station_bumps_generation() {
        let mut model = model();
        model.set_route(Route::station("A", ""), |_| false);
        let first = model.modal().unwrap().generation;
        model.set_route(Route::station("B", ""), |_| false);
        let second = model.modal().unwrap().generation;
        assert!(second > first);
        assert!(!model.is_current_modal("A", first));
        assert!(model.is_current_modal("B", second));
    }

    #[test]
    fn test_same_route_is_noop() {
        let mut model = model();
        assert!(model.set_route(Route::station("A", "x"), |_| false));
        model.modal_mut().unwrap().camera_index = 2;
        assert!(!model.set_route(Route::station("A", "x"), |_| false));
        assert_eq!(model.modal().unwrap().camera_index, 2);
    }

    #[test]
    fn test_reopen_closed_station_is_fresh() {
        let mut model = model();
        model.set_route(Route::station("A", ""), |_| false);
        let first = model.modal().unwrap().generation;
        model.close_station();
        model.set_route(Route::station("A", ""), |_| false);
        assert!(!model.is_current_modal("A", first));
    }
}
