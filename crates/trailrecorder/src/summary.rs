//! Distance and duration of a trail, for display.

use serde::Serialize;

use crate::buffer::TrailBuffer;
use crate::sample::LatLng;

/// Mean Earth radius in metres, as used for great-circle distances.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two positions, in metres.
#[must_use]
pub fn haversine_m(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Format a distance: whole metres under a kilometre, otherwise one decimal km.
#[must_use]
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{:.0} m", distance_km * 1000.0)
    } else {
        format!("{distance_km:.1} km")
    }
}

/// Format a duration given in minutes as `"1h 5m"` or `"12m"`.
#[must_use]
pub fn format_duration(duration_min: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = duration_min.max(0.0).floor() as u64;
    let hours = total / 60;
    let minutes = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Summary of the samples currently in a trail.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrailSummary {
    /// Number of retained samples.
    pub points: usize,
    /// Path length along the retained samples, in metres.
    pub distance_m: f64,
    /// Time between the oldest and newest retained samples, in milliseconds.
    pub duration_ms: i64,
    /// Timestamp of the oldest retained sample.
    pub started_at: Option<i64>,
    /// Timestamp of the newest retained sample.
    pub ended_at: Option<i64>,
}

impl TrailSummary {
    /// Summarize a trail buffer.
    #[must_use]
    pub fn from_buffer(buffer: &TrailBuffer) -> Self {
        let coordinates = buffer.coordinates();
        let distance_m = coordinates
            .windows(2)
            .map(|pair| haversine_m(pair[0], pair[1]))
            .fold(0.0, |total, step| total + step);

        let started_at = buffer.first().map(|s| s.timestamp());
        let ended_at = buffer.last().map(|s| s.timestamp());
        let duration_ms = match (started_at, ended_at) {
            (Some(start), Some(end)) => end.saturating_sub(start).max(0),
            _ => 0,
        };

        Self {
            points: buffer.len(),
            distance_m,
            duration_ms,
            started_at,
            ended_at,
        }
    }

    /// Distance in kilometres.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Duration in minutes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_min(&self) -> f64 {
        self.duration_ms as f64 / 60_000.0
    }
}

impl std::fmt::Display for TrailSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} points, {}, {}",
            self.points,
            format_distance(self.distance_km()),
            format_duration(self.duration_min())
        )
    }
}
