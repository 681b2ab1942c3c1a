//! The trail recorder.
//!
//! A [`TrailRecorder`] turns a stream of pointer or GPS positions into a
//! polyline on a [`RenderingSurface`]:
//!
//! - samples arriving while the pointer is off the surface, or while the view
//!   is mid-transform, are dropped without doing any projection work;
//! - samples closer than `min_distance_px` on screen to the previous accepted
//!   sample are dropped as jitter;
//! - accepted samples go into a bounded FIFO [`TrailBuffer`] and the whole
//!   buffer is pushed to the surface in a single `set_points` call.
//!
//! Nothing here returns an error. Handlers called without an attached surface
//! do nothing, and bad input is reported through [`MoveOutcome`] only.
//!
//! # Example
//!
//! ```
//! use trailrecorder::recorder::{MoveOutcome, TrailRecorder, TrailSettings};
//! use trailrecorder::surface::{HeadlessMap, ViewState};
//! use trailrecorder::LatLng;
//!
//! let map = HeadlessMap::new(ViewState::new(LatLng::new(0.0, 0.0), 13.0), 800.0, 600.0);
//! let mut recorder = TrailRecorder::new(TrailSettings::default());
//! recorder.attach(map);
//!
//! assert!(recorder.on_move(0.0, 0.0).is_accepted());
//! assert_eq!(recorder.on_move(0.0, 0.000_000_1), MoveOutcome::Jitter);
//! assert!(recorder.on_move(1.0, 1.0).is_accepted());
//! assert_eq!(recorder.buffer().len(), 2);
//! ```

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::buffer::{TrailBuffer, DEFAULT_CAPACITY};
use crate::events::TrailEvent;
use crate::sample::{now_millis, Sample};
use crate::surface::{PolylineId, PolylineStyle, RenderingSurface, ViewState};

/// Default minimum on-screen step between accepted samples, in pixels.
pub const DEFAULT_MIN_DISTANCE_PX: f64 = 1.0;

/// Tunables for a recorder.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailSettings {
    /// Maximum number of samples kept in the trail.
    pub capacity: usize,
    /// Samples closer than this to the previous one on screen are dropped.
    pub min_distance_px: f64,
    /// Style of the trail polyline.
    pub style: PolylineStyle,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_distance_px: DEFAULT_MIN_DISTANCE_PX,
            style: PolylineStyle::default(),
        }
    }
}

/// Whether the pointer is over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// New samples are accepted.
    #[default]
    Active,
    /// New samples are ignored.
    Inactive,
}

/// Whether the view is in the middle of a zoom or pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    /// Projection is current.
    #[default]
    Normal,
    /// The trail is hidden and projection is stale.
    Transforming,
}

/// The recorder's drawing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DrawingState {
    /// Pointer presence.
    pub presence: Presence,
    /// View transform phase.
    pub phase: ViewPhase,
}

impl DrawingState {
    /// Samples are accepted only when active and not transforming.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.presence == Presence::Active && self.phase == ViewPhase::Normal
    }
}

/// What happened to a single move event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The sample was appended and the polyline redrawn.
    Accepted {
        /// The oldest sample was evicted to make room.
        evicted: bool,
    },
    /// No surface is attached.
    Detached,
    /// The pointer is off the surface.
    Inactive,
    /// A view transform is in progress.
    Transforming,
    /// Latitude or longitude was not a finite number.
    Malformed,
    /// Too close on screen to the previous accepted sample.
    Jitter,
}

impl MoveOutcome {
    /// True if the sample made it into the trail.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Counters for the current attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RecorderStats {
    /// Samples appended to the trail.
    pub accepted: u64,
    /// Samples pushed out of the front of a full trail.
    pub evicted: u64,
    /// Samples dropped as on-screen jitter.
    pub jitter: u64,
    /// Samples dropped while the pointer was off the surface.
    pub inactive: u64,
    /// Samples dropped during a view transform.
    pub transforming: u64,
    /// Samples with non-finite coordinates.
    pub malformed: u64,
}

impl RecorderStats {
    /// Every move event that reached an attached recorder.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.accepted + self.jitter + self.inactive + self.transforming + self.malformed
    }
}

#[derive(Debug)]
struct Attachment<S> {
    surface: S,
    polyline: PolylineId,
}

/// Records a bounded, de-jittered trail onto a rendering surface.
///
/// The recorder owns the surface while attached. [`TrailRecorder::detach`]
/// hands it back after removing the trail, and dropping the recorder detaches
/// it as well.
#[derive(Debug)]
pub struct TrailRecorder<S: RenderingSurface> {
    settings: TrailSettings,
    attachment: Option<Attachment<S>>,
    buffer: TrailBuffer,
    state: DrawingState,
    stats: RecorderStats,
}

impl<S: RenderingSurface> TrailRecorder<S> {
    /// Create a detached recorder.
    #[must_use]
    pub fn new(settings: TrailSettings) -> Self {
        let buffer = TrailBuffer::new(settings.capacity);
        Self {
            settings,
            attachment: None,
            buffer,
            state: DrawingState::default(),
            stats: RecorderStats::default(),
        }
    }

    /// Attach to a surface, creating an empty trail polyline on it.
    ///
    /// If a surface is already attached it is detached first and returned.
    pub fn attach(&mut self, mut surface: S) -> Option<S> {
        let previous = self.detach();
        if previous.is_some() {
            warn!("Attached while already attached; previous surface detached");
        }

        let polyline = surface.create_polyline(&[], &self.settings.style);
        self.attachment = Some(Attachment { surface, polyline });
        self.state = DrawingState::default();
        self.stats = RecorderStats::default();
        debug!(%polyline, capacity = self.buffer.capacity(), "Trail attached");
        previous
    }

    /// Remove the trail from its surface, drop all samples and return the surface.
    ///
    /// Returns `None` if nothing was attached.
    pub fn detach(&mut self) -> Option<S> {
        let Attachment {
            mut surface,
            polyline,
        } = self.attachment.take()?;
        surface.remove_polyline(polyline);
        self.buffer.clear();
        self.state = DrawingState::default();
        debug!(%polyline, accepted = self.stats.accepted, "Trail detached");
        Some(surface)
    }

    /// Handle a position stamped with the current wall-clock time.
    pub fn on_move(&mut self, lat: f64, lng: f64) -> MoveOutcome {
        self.on_move_at(lat, lng, now_millis())
    }

    /// Handle a position with an explicit timestamp in milliseconds.
    pub fn on_move_at(&mut self, lat: f64, lng: f64, timestamp: i64) -> MoveOutcome {
        let Some(attachment) = self.attachment.as_mut() else {
            return MoveOutcome::Detached;
        };

        if self.state.presence == Presence::Inactive {
            self.stats.inactive += 1;
            return MoveOutcome::Inactive;
        }
        if self.state.phase == ViewPhase::Transforming {
            self.stats.transforming += 1;
            return MoveOutcome::Transforming;
        }

        let sample = Sample::at(lat, lng, timestamp);
        if !sample.is_finite() {
            self.stats.malformed += 1;
            debug!(lat, lng, "Discarding non-finite sample");
            return MoveOutcome::Malformed;
        }

        if let Some(previous) = self.buffer.last() {
            let from = attachment.surface.project_to_local(previous.position());
            let to = attachment.surface.project_to_local(sample.position());
            let distance = from.distance_to(to);
            // Negated so a NaN distance counts as jitter
            if !(distance >= self.settings.min_distance_px) {
                self.stats.jitter += 1;
                trace!(distance, "Discarding jitter sample");
                return MoveOutcome::Jitter;
            }
        }

        let evicted = self.buffer.push(sample).is_some();
        attachment
            .surface
            .set_points(attachment.polyline, &self.buffer.coordinates());

        self.stats.accepted += 1;
        if evicted {
            self.stats.evicted += 1;
        }
        trace!(
            lat,
            lng,
            len = self.buffer.len(),
            evicted,
            "Sample accepted"
        );
        MoveOutcome::Accepted { evicted }
    }

    /// The pointer entered the surface.
    pub fn on_enter(&mut self) {
        if self.attachment.is_some() {
            self.state.presence = Presence::Active;
        }
    }

    /// The pointer left the surface.
    pub fn on_leave(&mut self) {
        if self.attachment.is_some() {
            self.state.presence = Presence::Inactive;
        }
    }

    /// A zoom or pan started: hide the trail, keep its samples.
    pub fn on_transform_start(&mut self) {
        if let Some(attachment) = self.attachment.as_mut() {
            attachment.surface.set_opacity(attachment.polyline, 0.0);
            self.state.phase = ViewPhase::Transforming;
        }
    }

    /// A zoom or pan finished: show the trail again at its nominal opacity.
    pub fn on_transform_end(&mut self) {
        if let Some(attachment) = self.attachment.as_mut() {
            attachment
                .surface
                .set_opacity(attachment.polyline, self.settings.style.opacity);
            self.state.phase = ViewPhase::Normal;
        }
    }

    /// Move the attached surface's view.
    pub fn set_view(&mut self, view: ViewState) {
        if let Some(attachment) = self.attachment.as_mut() {
            attachment.surface.set_view(view);
        }
    }

    /// Dispatch an event to the matching handler.
    ///
    /// Returns the outcome for move events and `None` for everything else.
    pub fn handle(&mut self, event: TrailEvent) -> Option<MoveOutcome> {
        match event {
            TrailEvent::Move {
                lat,
                lng,
                timestamp,
            } => Some(match timestamp {
                Some(ts) => self.on_move_at(lat, lng, ts),
                None => self.on_move(lat, lng),
            }),
            TrailEvent::Enter => {
                self.on_enter();
                None
            }
            TrailEvent::Leave => {
                self.on_leave();
                None
            }
            TrailEvent::TransformStart => {
                self.on_transform_start();
                None
            }
            TrailEvent::TransformEnd { view } => {
                if let Some(view) = view {
                    self.set_view(view);
                }
                self.on_transform_end();
                None
            }
        }
    }

    /// True while a surface is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// The attached surface.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.attachment.as_ref().map(|a| &a.surface)
    }

    /// Handle of the trail polyline on the attached surface.
    #[must_use]
    pub fn polyline(&self) -> Option<PolylineId> {
        self.attachment.as_ref().map(|a| a.polyline)
    }

    /// Retained samples.
    #[must_use]
    pub fn buffer(&self) -> &TrailBuffer {
        &self.buffer
    }

    /// Current drawing state.
    #[must_use]
    pub fn state(&self) -> DrawingState {
        self.state
    }

    /// Counters since the last attach.
    #[must_use]
    pub fn stats(&self) -> RecorderStats {
        self.stats
    }

    /// Settings the recorder was built with.
    #[must_use]
    pub fn settings(&self) -> &TrailSettings {
        &self.settings
    }
}

impl<S: RenderingSurface> Drop for TrailRecorder<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
