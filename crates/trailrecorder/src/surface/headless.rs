//! In-memory rendering surface.
//!
//! `HeadlessMap` keeps polylines in a map keyed by id and projects through
//! [`WebMercator`]. It backs the `trailrec replay` command and doubles as a
//! surface for tests: every visible mutation bumps [`HeadlessMap::revision`].

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::{PolylineId, PolylineStyle, RenderingSurface, ScreenPoint, ViewState, WebMercator};
use crate::sample::LatLng;

/// A polyline as currently displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Points in draw order.
    pub points: Vec<LatLng>,
    /// Style the polyline was created with.
    pub style: PolylineStyle,
    /// Current opacity, which view transforms change independently of the style.
    pub opacity: f64,
}

/// A map surface that draws nothing and remembers everything.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    projector: WebMercator,
    polylines: BTreeMap<PolylineId, Polyline>,
    next_id: u64,
    revision: u64,
}

impl HeadlessMap {
    /// Create a map with a `width` x `height` pixel viewport.
    #[must_use]
    pub fn new(view: ViewState, width: f64, height: f64) -> Self {
        Self {
            projector: WebMercator::new(view, width, height),
            polylines: BTreeMap::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Look up a polyline.
    #[must_use]
    pub fn polyline(&self, id: PolylineId) -> Option<&Polyline> {
        self.polylines.get(&id)
    }

    /// Number of polylines on the map.
    #[must_use]
    pub fn polyline_count(&self) -> usize {
        self.polylines.len()
    }

    /// Number of visible mutations applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.projector.view()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl RenderingSurface for HeadlessMap {
    fn create_polyline(&mut self, points: &[LatLng], style: &PolylineStyle) -> PolylineId {
        let id = PolylineId::new(self.next_id);
        self.next_id += 1;
        self.polylines.insert(
            id,
            Polyline {
                points: points.to_vec(),
                style: style.clone(),
                opacity: style.opacity,
            },
        );
        self.touch();
        debug!(%id, "Created polyline");
        id
    }

    fn set_points(&mut self, id: PolylineId, points: &[LatLng]) {
        if let Some(polyline) = self.polylines.get_mut(&id) {
            polyline.points.clear();
            polyline.points.extend_from_slice(points);
            self.touch();
        } else {
            trace!(%id, "set_points on unknown polyline");
        }
    }

    fn set_opacity(&mut self, id: PolylineId, opacity: f64) {
        if let Some(polyline) = self.polylines.get_mut(&id) {
            polyline.opacity = opacity;
            self.touch();
        } else {
            trace!(%id, "set_opacity on unknown polyline");
        }
    }

    fn remove_polyline(&mut self, id: PolylineId) {
        if self.polylines.remove(&id).is_some() {
            self.touch();
            debug!(%id, "Removed polyline");
        }
    }

    fn project_to_local(&self, position: LatLng) -> ScreenPoint {
        self.projector.to_container_point(position)
    }

    fn set_view(&mut self, view: ViewState) {
        debug!(zoom = view.zoom, center = %view.center, "View changed");
        self.projector.set_view(view);
        self.touch();
    }
}
