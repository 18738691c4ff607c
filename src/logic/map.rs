//! Map viewport logic
//!
//! Equirectangular projection of geographic coordinates onto a grid of
//! terminal cells. The viewport is a centre plus a zoom level; each zoom
//! step halves the visible longitude span.

/// Smallest zoom level (whole world visible)
pub const MIN_ZOOM: u8 = 1;
/// Largest zoom level
pub const MAX_ZOOM: u8 = 18;

/// Map centre used when no device position is known
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 64.1807,
    longitude: 25.8032,
};
pub const DEFAULT_ZOOM: u8 = 6;

/// Fraction of the visible span moved by one pan step
pub const PAN_STEP: f64 = 0.2;

const MAX_LATITUDE: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geographic rectangle currently on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Visible longitude span in degrees
    ///
    /// # Examples
    /// ```
    /// use kelitui::logic::map::{GeoPoint, Viewport};
    ///
    /// assert_eq!(Viewport::new(GeoPoint::new(0.0, 0.0), 1).lon_span(), 360.0);
    /// assert_eq!(Viewport::new(GeoPoint::new(0.0, 0.0), 3).lon_span(), 90.0);
    /// ```
    pub fn lon_span(&self) -> f64 {
        360.0 / 2f64.powi(self.zoom as i32 - 1)
    }

    /// Geographic bounds of a `cols` x `rows` cell area.
    ///
    /// Terminal cells are about twice as tall as wide, and a degree of
    /// longitude shrinks with latitude, so the latitude span is derived from
    /// both.
    pub fn bounds(&self, cols: u16, rows: u16) -> Bounds {
        let lon_span = self.lon_span();
        let aspect = if cols == 0 {
            1.0
        } else {
            (rows as f64 * 2.0) / cols as f64
        };
        let shrink = self.center.latitude.to_radians().cos().max(0.05);
        let lat_span = lon_span * aspect * shrink;

        Bounds {
            west: self.center.longitude - lon_span / 2.0,
            east: self.center.longitude + lon_span / 2.0,
            south: self.center.latitude - lat_span / 2.0,
            north: self.center.latitude + lat_span / 2.0,
        }
    }

    /// Longitude shifted by whole turns into `[west, west + 360)`, so points
    /// across the antimeridian line up with a centre that has wrapped.
    ///
    /// # Examples
    /// ```
    /// use kelitui::logic::map::{GeoPoint, Viewport};
    ///
    /// let vp = Viewport::new(GeoPoint::new(0.0, 179.0), 5);
    /// assert_eq!(vp.unwrap_longitude(-179.0), 181.0);
    /// assert_eq!(vp.unwrap_longitude(178.0), 178.0);
    /// ```
    pub fn unwrap_longitude(&self, longitude: f64) -> f64 {
        let west = self.center.longitude - self.lon_span() / 2.0;
        west + (longitude - west).rem_euclid(360.0)
    }

    /// Fractional cell position of a point (may lie outside the area)
    pub fn project_f(&self, point: GeoPoint, cols: u16, rows: u16) -> Option<(f64, f64)> {
        if cols == 0 || rows == 0 {
            return None;
        }
        let b = self.bounds(cols, rows);
        let x = (self.unwrap_longitude(point.longitude) - b.west) / (b.east - b.west) * cols as f64;
        let y = (b.north - point.latitude) / (b.north - b.south) * rows as f64;
        Some((x, y))
    }

    /// Cell a point falls into, or `None` when it is off screen
    pub fn project(&self, point: GeoPoint, cols: u16, rows: u16) -> Option<(u16, u16)> {
        let (x, y) = self.project_f(point, cols, rows)?;
        if x < 0.0 || y < 0.0 || x >= cols as f64 || y >= rows as f64 {
            return None;
        }
        Some((x as u16, y as u16))
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(1));
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Centre on a point at the given zoom
    pub fn focus(&mut self, point: GeoPoint, zoom: u8) {
        self.center = point;
        self.set_zoom(zoom);
    }

    /// Move the centre by a fraction of the visible span.
    /// Positive `dx` pans east, positive `dy` pans north.
    pub fn pan(&mut self, dx: f64, dy: f64, cols: u16, rows: u16) {
        let b = self.bounds(cols, rows);
        let mut lon = self.center.longitude + dx * (b.east - b.west);
        let lat = self.center.latitude + dy * (b.north - b.south);

        if lon > 180.0 {
            lon -= 360.0;
        } else if lon < -180.0 {
            lon += 360.0;
        }

        self.center = GeoPoint::new(lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lon);
    }
}

/// Index of the point nearest the viewport centre within `radius` cells.
///
/// Distances are measured in cell widths with rows counted double, so the
/// radius is round on screen.
pub fn pick_nearest(
    viewport: &Viewport,
    cols: u16,
    rows: u16,
    points: &[GeoPoint],
    radius: f64,
) -> Option<usize> {
    let cx = cols as f64 / 2.0;
    let cy = rows as f64 / 2.0;

    points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let (x, y) = viewport.project_f(*p, cols, rows)?;
            let dx = x - cx;
            let dy = (y - cy) * 2.0;
            let dist = (dx * dx + dy * dy).sqrt();
            (dist <= radius).then_some((i, dist))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let vp = Viewport::default();
        assert_eq!(vp.zoom, 6);
        assert_eq!(vp.center, DEFAULT_CENTER);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::new(DEFAULT_CENTER, 40);
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_in();
        assert_eq!(vp.zoom, MAX_ZOOM);

        vp.set_zoom(0);
        assert_eq!(vp.zoom, MIN_ZOOM);
        vp.zoom_out();
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_center_projects_to_middle() {
        let vp = Viewport::new(GeoPoint::new(0.0, 0.0), 3);
        assert_eq!(vp.project(vp.center, 80, 40), Some((40, 20)));
    }

    #[test]
    fn test_offscreen_point_not_projected() {
        let vp = Viewport::default();
        assert_eq!(vp.project(GeoPoint::new(-33.9, 151.2), 80, 40), None);
        assert_eq!(vp.project(vp.center, 0, 40), None);
    }

    #[test]
    fn test_bounds_surround_center() {
        let vp = Viewport::default();
        let b = vp.bounds(100, 30);
        assert!(b.west < vp.center.longitude && vp.center.longitude < b.east);
        assert!(b.south < vp.center.latitude && vp.center.latitude < b.north);
    }

    #[test]
    fn test_pan_east_and_north() {
        let mut vp = Viewport::default();
        let before = vp.center;
        vp.pan(PAN_STEP, PAN_STEP, 80, 40);
        assert!(vp.center.longitude > before.longitude);
        assert!(vp.center.latitude > before.latitude);
    }

    #[test]
    fn test_pan_wraps_longitude_and_clamps_latitude() {
        let mut vp = Viewport::new(GeoPoint::new(84.0, 179.0), 1);
        vp.pan(0.5, 0.5, 80, 40);
        assert!(vp.center.longitude >= -180.0 && vp.center.longitude <= 180.0);
        assert_eq!(vp.center.latitude, MAX_LATITUDE);
    }

    #[test]
    fn test_stations_across_antimeridian_stay_visible() {
        // Centre wrapped from 179.9 to -179.9 by panning east
        let vp = Viewport::new(GeoPoint::new(65.0, -179.9), 8);
        let west_side = GeoPoint::new(65.0, 179.95);
        let east_side = GeoPoint::new(65.0, -179.85);

        let (wx, _) = vp.project(west_side, 80, 40).unwrap();
        let (ex, _) = vp.project(east_side, 80, 40).unwrap();
        assert!(wx < 40 && ex >= 40);
    }

    #[test]
    fn test_pick_nearest_prefers_closest() {
        let vp = Viewport::new(GeoPoint::new(64.0, 25.0), 10);
        let points = [
            GeoPoint::new(64.0, 25.01),
            GeoPoint::new(64.0, 25.001),
            GeoPoint::new(60.0, 20.0),
        ];
        assert_eq!(pick_nearest(&vp, 80, 40, &points, 5.0), Some(1));
    }

    #[test]
    fn test_pick_nearest_respects_radius() {
        let vp = Viewport::new(GeoPoint::new(64.0, 25.0), 10);
        let points = [GeoPoint::new(64.0, 25.2)];
        assert_eq!(pick_nearest(&vp, 80, 40, &points, 3.0), None);
        assert_eq!(pick_nearest(&vp, 80, 40, &[], 3.0), None);
    }
}
