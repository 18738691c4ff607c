//! Map Model
//!
//! Viewport, device position and the area the map was last drawn into.

use crate::logic::cluster::ClusterConfig;
use crate::logic::map::{GeoPoint, Viewport};

/// Device position lookup state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    Pending,
    Known(GeoPoint),
    Unavailable,
}

#[derive(Clone, Debug)]
pub struct MapModel {
    pub viewport: Viewport,
    pub location: LocationState,
    pub cluster: ClusterConfig,

    /// Cell size of the map area in the last frame (used for pan and pick)
    pub area: (u16, u16),
}

impl MapModel {
    pub fn new(cluster: ClusterConfig) -> Self {
        Self {
            viewport: Viewport::default(),
            location: LocationState::Pending,
            cluster,
            area: (80, 24),
        }
    }

    pub fn device_position(&self) -> Option<GeoPoint> {
        match self.location {
            LocationState::Known(point) => Some(point),
            _ => None,
        }
    }

    /// Apply the result of the location lookup. A found position recentres
    /// the map; a failure leaves the viewport at its default.
    pub fn set_location(&mut self, position: Option<GeoPoint>) {
        match position {
            Some(point) => {
                self.location = LocationState::Known(point);
                self.viewport.center = point;
            }
            None => self.location = LocationState::Unavailable,
        }
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (cols, rows) = self.area;
        self.viewport.pan(dx, dy, cols, rows);
    }
}
