//! Positional samples.
//!
//! A [`Sample`] is one timestamped reading from the pointer or the GPS
//! receiver. Samples are plain `Copy` values and never change after creation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Create a new position.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A timestamped positional reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    lat: f64,
    lng: f64,
    /// Milliseconds since the Unix epoch.
    timestamp: i64,
}

impl Sample {
    /// Create a sample stamped with the current wall-clock time.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self::at(lat, lng, now_millis())
    }

    /// Create a sample with an explicit timestamp in milliseconds.
    #[must_use]
    pub const fn at(lat: f64, lng: f64, timestamp: i64) -> Self {
        Self {
            lat,
            lng,
            timestamp,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Capture time in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The sample's position.
    #[must_use]
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// False for NaN or infinite coordinates.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position().is_finite()
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_at() {
        let sample = Sample::at(42.5, 12.25, 1_700_000_000_000);
        assert_eq!(sample.lat(), 42.5);
        assert_eq!(sample.lng(), 12.25);
        assert_eq!(sample.timestamp(), 1_700_000_000_000);
        assert_eq!(sample.position(), LatLng::new(42.5, 12.25));
    }

    #[test]
    fn test_sample_new_uses_wall_clock() {
        let before = now_millis();
        let sample = Sample::new(1.0, 2.0);
        let after = now_millis();
        assert!(sample.timestamp() >= before);
        assert!(sample.timestamp() <= after);
    }

    #[test]
    fn test_non_finite_samples() {
        assert!(Sample::at(0.0, 0.0, 0).is_finite());
        assert!(!Sample::at(f64::NAN, 0.0, 0).is_finite());
        assert!(!Sample::at(0.0, f64::INFINITY, 0).is_finite());
        assert!(!Sample::at(f64::NEG_INFINITY, f64::NAN, 0).is_finite());
    }

    #[test]
    fn test_latlng_from_tuple_and_display() {
        let pos: LatLng = (42.8333, 12.8333).into();
        assert_eq!(pos.to_string(), "(42.833300, 12.833300)");
    }

    #[test]
    fn test_sample_serialization() {
        let sample = Sample::at(45.1, 9.2, 1000);
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"timestamp\":1000"));
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
