//! Marker clustering
//!
//! Groups nearby stations into a single counted marker when the map is
//! crowded. Grouping is by a coarse grid over the visible cell area, so the
//! result only depends on the viewport and the points on screen.

use std::collections::BTreeMap;

use super::map::{GeoPoint, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Clustering kicks in when more points than this are visible
    pub threshold: usize,
    /// At this zoom and above every point is drawn individually
    pub max_zoom: u8,
    /// Grid size in terminal cells
    pub grid_cols: u16,
    pub grid_rows: u16,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            threshold: 50,
            max_zoom: 11,
            grid_cols: 8,
            grid_rows: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapMarker {
    Single { index: usize, point: GeoPoint },
    Cluster { members: Vec<usize>, center: GeoPoint },
}

impl MapMarker {
    pub fn point(&self) -> GeoPoint {
        match self {
            MapMarker::Single { point, .. } => *point,
            MapMarker::Cluster { center, .. } => *center,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            MapMarker::Single { .. } => 1,
            MapMarker::Cluster { members, .. } => members.len(),
        }
    }
}

/// Whether the visible points should be grouped at this zoom
pub fn should_cluster(visible: usize, zoom: u8, config: &ClusterConfig) -> bool {
    visible > config.threshold && zoom < config.max_zoom
}

/// Zoom level to jump to when a cluster is selected
///
/// # Examples
/// ```
/// use kelitui::logic::cluster::expansion_zoom;
///
/// assert_eq!(expansion_zoom(6, 11), 8);
/// assert_eq!(expansion_zoom(10, 11), 11);
/// ```
pub fn expansion_zoom(current: u8, max_zoom: u8) -> u8 {
    current.saturating_add(2).min(max_zoom.max(current))
}

/// Build the markers for the points currently on screen.
///
/// Off-screen points are skipped. Indices refer to positions in `points`.
pub fn cluster_points(
    points: &[GeoPoint],
    viewport: &Viewport,
    cols: u16,
    rows: u16,
    config: &ClusterConfig,
) -> Vec<MapMarker> {
    let visible: Vec<(usize, (u16, u16))> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| viewport.project(*p, cols, rows).map(|cell| (i, cell)))
        .collect();

    if !should_cluster(visible.len(), viewport.zoom, config) {
        return visible
            .into_iter()
            .map(|(index, _)| MapMarker::Single {
                index,
                point: points[index],
            })
            .collect();
    }

    let grid_cols = config.grid_cols.max(1);
    let grid_rows = config.grid_rows.max(1);
    let mut cells: BTreeMap<(u16, u16), Vec<usize>> = BTreeMap::new();
    for (index, (x, y)) in visible {
        cells
            .entry((y / grid_rows, x / grid_cols))
            .or_default()
            .push(index);
    }

    cells
        .into_values()
        .map(|members| {
            if members.len() == 1 {
                let index = members[0];
                return MapMarker::Single {
                    index,
                    point: points[index],
                };
            }
            let n = members.len() as f64;
            let (lat, lon) = members.iter().fold((0.0, 0.0), |(lat, lon), &i| {
                (lat + points[i].latitude, lon + points[i].longitude)
            });
            MapMarker::Cluster {
                center: GeoPoint::new(lat / n, lon / n),
                members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A tight blob of points around the viewport centre
    fn blob(center: GeoPoint, n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(center.latitude, center.longitude + i as f64 * 0.0001))
            .collect()
    }

    #[test]
    fn test_below_threshold_no_clustering() {
        let vp = Viewport::default();
        let points = blob(vp.center, 10);
        let markers = cluster_points(&points, &vp, 80, 40, &ClusterConfig::default());
        assert_eq!(markers.len(), 10);
        assert!(markers.iter().all(|m| m.count() == 1));
    }

    #[test]
    fn test_crowded_points_are_grouped() {
        let vp = Viewport::default();
        let points = blob(vp.center, 60);
        let markers = cluster_points(&points, &vp, 80, 40, &ClusterConfig::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].count(), 60);
    }

    #[test]
    fn test_high_zoom_disables_clustering() {
        let mut vp = Viewport::default();
        vp.set_zoom(11);
        let points = blob(vp.center, 60);
        let markers = cluster_points(&points, &vp, 80, 40, &ClusterConfig::default());
        assert_eq!(markers.len(), 60);
    }

    #[test]
    fn test_every_visible_point_appears_once() {
        let vp = Viewport::default();
        let mut points = blob(vp.center, 55);
        points.push(GeoPoint::new(vp.center.latitude + 2.0, vp.center.longitude + 3.0));
        points.push(GeoPoint::new(-40.0, -70.0)); // off screen

        let markers = cluster_points(&points, &vp, 80, 40, &ClusterConfig::default());
        let total: usize = markers.iter().map(|m| m.count()).sum();
        assert_eq!(total, 56);
    }

    #[test]
    fn test_expansion_never_exceeds_max() {
        assert_eq!(expansion_zoom(11, 11), 11);
        assert_eq!(expansion_zoom(15, 11), 15);
    }
}
