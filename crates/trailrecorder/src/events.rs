//! Event delivery into a trail recorder.
//!
//! Hosts deliver pointer and view events as [`TrailEvent`] values. A recorder
//! consumes them through [`TrailRecorder::handle`], either directly from a
//! host callback or by draining a channel fed by an [`EventSource`].

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::recorder::{MoveOutcome, TrailRecorder};
use crate::surface::{RenderingSurface, ViewState};

/// A host event addressed to a trail recorder.
///
/// Serialized as JSON objects tagged by `type`, for example
/// `{"type": "move", "lat": 42.1, "lng": 12.5, "timestamp": 1700000000000}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrailEvent {
    /// A new pointer or GPS position.
    Move {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
        /// Capture time in milliseconds; the recorder's clock is used when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
    /// The pointer entered the surface.
    Enter,
    /// The pointer left the surface.
    Leave,
    /// A zoom or pan started.
    TransformStart,
    /// A zoom or pan finished, optionally landing on a new view.
    TransformEnd {
        /// The view after the transform.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        view: Option<ViewState>,
    },
}

impl TrailEvent {
    /// A move event with an explicit timestamp.
    #[must_use]
    pub const fn move_at(lat: f64, lng: f64, timestamp: i64) -> Self {
        Self::Move {
            lat,
            lng,
            timestamp: Some(timestamp),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Enter => "enter",
            Self::Leave => "leave",
            Self::TransformStart => "transform_start",
            Self::TransformEnd { .. } => "transform_end",
        }
    }
}

/// Something that produces trail events, such as a GPS watcher or a replay file.
///
/// The source owns its own lifecycle; the recorder only sees the events it
/// sends. `run` returns once the source is exhausted or the receiver is gone.
#[async_trait::async_trait]
pub trait EventSource: Send {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Deliver events until exhausted.
    ///
    /// Returns the number of events delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the source itself fails. A closed receiver is not
    /// an error; the source simply stops.
    async fn run(&mut self, tx: mpsc::Sender<TrailEvent>) -> Result<u64>;
}

/// Tally of a drained channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct DrainReport {
    /// Events received.
    pub events: u64,
    /// Move events received.
    pub moves: u64,
    /// Move events that were accepted into the trail.
    pub accepted: u64,
}

/// Apply every event from `rx` to `recorder`, in arrival order, until the
/// channel closes.
pub async fn drain<S: RenderingSurface>(
    recorder: &mut TrailRecorder<S>,
    mut rx: mpsc::Receiver<TrailEvent>,
) -> DrainReport {
    let mut report = DrainReport::default();
    while let Some(event) = rx.recv().await {
        report.events += 1;
        trace!(kind = event.kind(), "Dispatching event");
        if let Some(outcome) = recorder.handle(event) {
            report.moves += 1;
            if let MoveOutcome::Accepted { .. } = outcome {
                report.accepted += 1;
            }
        }
    }
    debug!(
        events = report.events,
        accepted = report.accepted,
        "Event channel closed"
    );
    report
}

/// Run `source` on its own task and drain its events into `recorder`.
///
/// The recorder stays on the calling task, so it never needs to be `Send`.
///
/// # Errors
///
/// Returns an error if the source fails or its task panics.
pub async fn pump<E, S>(
    source: E,
    recorder: &mut TrailRecorder<S>,
    channel_capacity: usize,
) -> Result<(u64, DrainReport)>
where
    E: EventSource + 'static,
    S: RenderingSurface,
{
    let name = source.name();
    let (tx, rx) = mpsc::channel(channel_capacity.max(1));
    let producer = tokio::spawn(async move {
        let mut source = source;
        source.run(tx).await
    });

    let report = drain(recorder, rx).await;
    let sent = producer
        .await
        .map_err(|e| Error::event_source(name, e.to_string()))??;
    debug!(source = name, sent, "Event source finished");
    Ok((sent, report))
}
