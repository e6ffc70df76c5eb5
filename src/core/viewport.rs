use crate::core::{
    bounds::Bounds,
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6378137.0;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 19.0),
            size,
            min_zoom: 0.0,
            max_zoom: 19.0,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Recenters and optionally zooms in one step
    pub fn set_view(&mut self, center: LatLng, zoom: Option<f64>) {
        self.set_center(center);
        if let Some(zoom) = zoom {
            self.set_zoom(zoom);
        }
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((std::f64::consts::PI / 4.0 + lat_lng.lat.to_radians() / 2.0).tan().ln())
            * EARTH_RADIUS;

        let circumference = 2.0 * std::f64::consts::PI * EARTH_RADIUS;
        let pixel_x = (x + std::f64::consts::PI * EARTH_RADIUS) / circumference * scale;
        let pixel_y = (-y + std::f64::consts::PI * EARTH_RADIUS) / circumference * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Inverse of [`Viewport::project`]
    pub fn unproject(&self, point: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);

        let lng = point.x / scale * 360.0 - 180.0;
        let n = std::f64::consts::PI - 2.0 * std::f64::consts::PI * point.y / scale;
        LatLng::new(n.sinh().atan().to_degrees(), lng)
    }

    /// Moves the center by a container-pixel drag delta
    pub fn pan_by(&mut self, delta: &Point) {
        let center = self.project(&self.center, None);
        let target = self.unproject(&center.subtract(delta), None);
        self.center = LatLng::new(target.lat.clamp(-85.0511, 85.0511), target.lng);
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project(&self.center, None);
        let projected = self.project(lat_lng, None);
        projected
            .subtract(&origin)
            .add(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Centers on the bounds and picks the largest zoom at which they fit
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.center = bounds.center();

        let sw = self.project(&bounds.south_west, Some(0.0));
        let ne = self.project(&bounds.north_east, Some(0.0));
        let width = (ne.x - sw.x).abs();
        let height = (sw.y - ne.y).abs();

        if width <= f64::EPSILON && height <= f64::EPSILON {
            self.zoom = self.max_zoom;
            return;
        }

        let zoom_x = if width > f64::EPSILON {
            (self.size.x / width).log2()
        } else {
            self.max_zoom
        };
        let zoom_y = if height > f64::EPSILON {
            (self.size.y / height).log2()
        } else {
            self.max_zoom
        };

        self.set_zoom(zoom_x.min(zoom_y).floor());
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let (lat, lng) = crate::core::constants::DEFAULT_CENTER;
        Self::new(
            LatLng::new(lat, lng),
            crate::core::constants::DEFAULT_ZOOM,
            Point::new(800.0, 600.0),
        )
    }
}

/// Scrollable container around a rendered PDF page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollViewport {
    pub scroll: Point,
    pub client_size: Point,
}

impl ScrollViewport {
    pub fn new(client_size: Point) -> Self {
        Self {
            scroll: Point::default(),
            client_size,
        }
    }

    /// Scroll offset that centers `target` in the container, never negative
    pub fn centered_on(&self, target: &Bounds) -> Point {
        let center = target.center();
        Point::new(
            (center.x - self.client_size.x / 2.0).max(0.0),
            (center.y - self.client_size.y / 2.0).max(0.0),
        )
    }

    pub fn scroll_to(&mut self, target: &Bounds) -> Point {
        self.scroll = self.centered_on(target);
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(37.29, 127.20), 16.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.center, LatLng::new(37.29, 127.20));
        assert_eq!(viewport.zoom, 16.0);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let viewport = Viewport::default();
        let position = LatLng::new(37.2939, 127.2025);
        let back = viewport.unproject(&viewport.project(&position, None), None);

        assert!((back.lat - position.lat).abs() < 1e-9);
        assert!((back.lng - position.lng).abs() < 1e-9);
    }

    #[test]
    fn test_pan_by_moves_center_against_drag() {
        let mut viewport = Viewport::default();
        let before = viewport.center;
        viewport.pan_by(&Point::new(100.0, 0.0));

        assert!(viewport.center.lng < before.lng);
        assert!((viewport.center.lat - before.lat).abs() < 1e-9);
    }

    #[test]
    fn test_set_view_clamps_zoom() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(10.0, 18.0);
        viewport.set_view(LatLng::new(37.30, 127.21), Some(25.0));

        assert_eq!(viewport.center, LatLng::new(37.30, 127.21));
        assert_eq!(viewport.zoom, 18.0);

        viewport.set_view(LatLng::new(37.31, 127.21), None);
        assert_eq!(viewport.zoom, 18.0);
    }

    #[test]
    fn test_center_projects_to_middle() {
        let viewport = Viewport::new(LatLng::new(37.29, 127.20), 16.0, Point::new(800.0, 600.0));
        let pixel = viewport.lat_lng_to_pixel(&viewport.center);

        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_bounds() {
        let mut viewport = Viewport::default();
        let bounds = LatLngBounds::new(LatLng::new(37.28, 127.19), LatLng::new(37.31, 127.22));
        viewport.fit_bounds(&bounds);

        assert_eq!(viewport.center, bounds.center());
        let sw = viewport.lat_lng_to_pixel(&bounds.south_west);
        let ne = viewport.lat_lng_to_pixel(&bounds.north_east);
        assert!(sw.x >= 0.0 && ne.x <= viewport.size.x);
        assert!(ne.y >= 0.0 && sw.y <= viewport.size.y);
    }

    #[test]
    fn test_fit_single_point_uses_max_zoom() {
        let mut viewport = Viewport::default();
        let point = LatLng::new(37.30, 127.20);
        viewport.fit_bounds(&LatLngBounds::new(point, point));

        assert_eq!(viewport.zoom, viewport.max_zoom);
        assert_eq!(viewport.center, point);
    }

    #[test]
    fn test_scroll_clamps_at_origin() {
        let mut scroll = ScrollViewport::new(Point::new(400.0, 300.0));

        let near_corner = Bounds::from_rect(10.0, 10.0, 20.0, 10.0);
        assert_eq!(scroll.scroll_to(&near_corner), Point::new(0.0, 0.0));

        let far = Bounds::from_rect(1000.0, 800.0, 40.0, 20.0);
        assert_eq!(scroll.scroll_to(&far), Point::new(820.0, 660.0));
    }
}
