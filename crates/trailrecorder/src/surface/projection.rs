//! Spherical Web Mercator projection into viewport pixels.
//!
//! Matches the slippy-map convention: EPSG:3857 with a 256 pixel tile at
//! zoom 0, projected points snapped to whole pixels, and the view centre at
//! the middle of the viewport. Because the jitter filter works on these
//! pixels, the same geographic step can be kept at one zoom and dropped at
//! another.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::ScreenPoint;
use crate::sample::LatLng;

/// Sphere radius used by EPSG:3857, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit of the square Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Tile edge length at zoom 0, in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// What part of the world the viewport shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Geographic position at the middle of the viewport.
    pub center: LatLng,
    /// Fractional zoom level.
    pub zoom: f64,
}

impl ViewState {
    /// Create a new view.
    #[must_use]
    pub const fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// Projects geographic positions into a fixed-size viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    view: ViewState,
    width: f64,
    height: f64,
}

impl WebMercator {
    /// Create a projector for a `width` x `height` pixel viewport.
    #[must_use]
    pub fn new(view: ViewState, width: f64, height: f64) -> Self {
        Self {
            view,
            width,
            height,
        }
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Replace the view, keeping the viewport size.
    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Pixels spanning the whole world at `zoom`.
    #[must_use]
    pub fn world_size(zoom: f64) -> f64 {
        TILE_SIZE * 2f64.powf(zoom)
    }

    /// Unrounded world pixel coordinates of `position` at `zoom`.
    #[must_use]
    pub fn project(position: LatLng, zoom: f64) -> ScreenPoint {
        let d = PI / 180.0;
        let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let sin = (lat * d).sin();

        let x = EARTH_RADIUS_M * position.lng * d;
        let y = EARTH_RADIUS_M * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;

        let k = 0.5 / (PI * EARTH_RADIUS_M);
        let scale = Self::world_size(zoom);
        ScreenPoint::new(scale * (k * x + 0.5), scale * (-k * y + 0.5))
    }

    /// Pixel coordinates of the viewport's top-left corner in world space.
    #[must_use]
    pub fn pixel_origin(&self) -> ScreenPoint {
        let center = Self::project(self.view.center, self.view.zoom);
        round(ScreenPoint::new(
            center.x - self.width / 2.0,
            center.y - self.height / 2.0,
        ))
    }

    /// Position relative to the viewport's top-left corner, in whole pixels.
    #[must_use]
    pub fn to_container_point(&self, position: LatLng) -> ScreenPoint {
        let point = round(Self::project(position, self.view.zoom));
        let origin = self.pixel_origin();
        ScreenPoint::new(point.x - origin.x, point.y - origin.y)
    }
}

/// Round half up, like the browser's `Math.round`.
fn round(point: ScreenPoint) -> ScreenPoint {
    ScreenPoint::new((point.x + 0.5).floor(), (point.y + 0.5).floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector(zoom: f64) -> WebMercator {
        WebMercator::new(ViewState::new(LatLng::new(0.0, 0.0), zoom), 800.0, 600.0)
    }

    #[test]
    fn test_origin_projects_to_world_center() {
        let p = WebMercator::project(LatLng::new(0.0, 0.0), 0.0);
        assert!((p.x - 128.0).abs() < 1e-9);
        assert!((p.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_spans_world() {
        let west = WebMercator::project(LatLng::new(0.0, -180.0), 1.0);
        let east = WebMercator::project(LatLng::new(0.0, 180.0), 1.0);
        assert!((east.x - west.x - 512.0).abs() < 1e-6);
    }

    #[test]
    fn test_latitude_is_clamped() {
        let pole = WebMercator::project(LatLng::new(90.0, 0.0), 0.0);
        let limit = WebMercator::project(LatLng::new(MAX_LATITUDE, 0.0), 0.0);
        assert_eq!(pole, limit);
        assert!(pole.y.abs() < 1e-6);
    }

    #[test]
    fn test_view_center_lands_mid_viewport() {
        let center = LatLng::new(42.8333, 12.8333);
        let map = WebMercator::new(ViewState::new(center, 13.0), 800.0, 600.0);
        let p = map.to_container_point(center);
        assert!((p.x - 400.0).abs() <= 1.0);
        assert!((p.y - 300.0).abs() <= 1.0);
    }

    #[test]
    fn test_container_points_are_whole_pixels() {
        let map = projector(13.0);
        let p = map.to_container_point(LatLng::new(0.0123, 0.0456));
        assert_eq!(p.x, p.x.trunc());
        assert_eq!(p.y, p.y.trunc());
    }

    #[test]
    fn test_north_is_up() {
        let map = projector(10.0);
        let south = map.to_container_point(LatLng::new(-0.1, 0.0));
        let north = map.to_container_point(LatLng::new(0.1, 0.0));
        assert!(north.y < south.y);
    }

    #[test]
    fn test_zoom_doubles_distances() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 0.01);
        let d10 = projector(10.0)
            .to_container_point(a)
            .distance_to(projector(10.0).to_container_point(b));
        let d11 = projector(11.0)
            .to_container_point(a)
            .distance_to(projector(11.0).to_container_point(b));
        assert!((d11 - 2.0 * d10).abs() <= 2.0);
    }

    #[test]
    fn test_set_view() {
        let mut map = projector(3.0);
        map.set_view(ViewState::new(LatLng::new(10.0, 10.0), 5.0));
        assert_eq!(map.view().zoom, 5.0);
        assert_eq!(map.size(), (800.0, 600.0));
    }
}
