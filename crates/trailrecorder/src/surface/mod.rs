//! Rendering surface abstraction.
//!
//! The trail recorder draws through this trait and never talks to a map
//! library directly. A surface owns the visual elements; the recorder only
//! holds the [`PolylineId`] it was handed on attach.

mod headless;
mod projection;

use serde::{Deserialize, Serialize};

use crate::sample::LatLng;

pub use headless::{HeadlessMap, Polyline};
pub use projection::{ViewState, WebMercator, EARTH_RADIUS_M, MAX_LATITUDE, TILE_SIZE};

/// Opacity the trail is drawn with outside of view transforms.
pub const DEFAULT_OPACITY: f64 = 0.7;

/// Identifier of a polyline created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolylineId(u64);

impl PolylineId {
    /// Wrap a raw surface-assigned id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PolylineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "polyline#{}", self.0)
    }
}

/// A point in the surface's local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal offset from the left edge, in pixels.
    pub x: f64,
    /// Vertical offset from the top edge, in pixels.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Presentation parameters for the trail polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineStyle {
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Nominal stroke opacity, 0.0 to 1.0.
    pub opacity: f64,
    /// How aggressively the surface may simplify the line when drawing.
    pub smooth_factor: f64,
    /// Optional CSS class for DOM-backed surfaces.
    pub class_name: Option<String>,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: "#4CAF50".to_string(),
            weight: 2.0,
            opacity: DEFAULT_OPACITY,
            smooth_factor: 1.0,
            class_name: Some("mouse-trail".to_string()),
        }
    }
}

/// A map or drawing system that can display polylines.
///
/// Implementations must tolerate ids they do not know (already removed, or
/// created by another surface) by ignoring the call.
pub trait RenderingSurface {
    /// Create a polyline and return its handle.
    fn create_polyline(&mut self, points: &[LatLng], style: &PolylineStyle) -> PolylineId;

    /// Replace every point of a polyline in one update.
    fn set_points(&mut self, id: PolylineId, points: &[LatLng]);

    /// Change a polyline's stroke opacity.
    fn set_opacity(&mut self, id: PolylineId, opacity: f64);

    /// Remove a polyline from the surface.
    fn remove_polyline(&mut self, id: PolylineId);

    /// Project a geographic position into local pixel coordinates.
    fn project_to_local(&self, position: LatLng) -> ScreenPoint;

    /// Move the view. Called when a view transform finishes with a new view.
    fn set_view(&mut self, _view: ViewState) {}
}
