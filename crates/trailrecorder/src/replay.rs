//! Replaying recorded event streams.
//!
//! A replay file is JSON lines, one [`TrailEvent`] per line. Blank lines and
//! lines starting with `#` are skipped:
//!
//! ```text
//! # morning walk, Monte Cucco
//! {"type": "move", "lat": 43.3601, "lng": 12.7452, "timestamp": 1700000000000}
//! {"type": "transform_start"}
//! {"type": "transform_end", "view": {"center": {"lat": 43.36, "lng": 12.74}, "zoom": 15}}
//! {"type": "leave"}
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::events::{EventSource, TrailEvent};

/// Parse replay text into events.
///
/// # Errors
///
/// Returns [`Error::ReplayParse`] with the one-based line number of the first
/// line that is not a valid event.
pub fn parse_events(text: &str) -> Result<Vec<TrailEvent>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| Error::ReplayParse { line, source })
        })
        .collect()
}

/// An [`EventSource`] backed by a recorded event list.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    path: Option<PathBuf>,
    events: Vec<TrailEvent>,
    speed: f64,
}

impl ReplaySource {
    /// Replay `events` as fast as the receiver accepts them.
    #[must_use]
    pub fn new(events: Vec<TrailEvent>) -> Self {
        Self {
            path: None,
            events,
            speed: 0.0,
        }
    }

    /// Load a replay file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains an invalid event.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| Error::ReplayRead {
            path: path.clone(),
            source,
        })?;
        let events = parse_events(&text)?;
        info!(path = %path.display(), events = events.len(), "Loaded replay file");
        Ok(Self {
            path: Some(path),
            events,
            speed: 0.0,
        })
    }

    /// Pace moves by their timestamps, `speed` times faster than real time.
    ///
    /// Zero, negative or non-finite speeds disable pacing.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Events still to be replayed.
    #[must_use]
    pub fn events(&self) -> &[TrailEvent] {
        &self.events
    }

    /// File the events came from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn is_paced(&self) -> bool {
        self.speed.is_finite() && self.speed > 0.0
    }

    /// Wall-clock wait between two move timestamps.
    ///
    /// Gaps that overflow `i64` or scale past what a [`Duration`] can hold
    /// are not waited for.
    fn delay(&self, from: i64, to: i64) -> Option<Duration> {
        if !self.is_paced() || to <= from {
            return None;
        }
        let gap = to.checked_sub(from)?;
        #[allow(clippy::cast_precision_loss)]
        let millis = gap as f64 / self.speed;
        Duration::try_from_secs_f64(millis / 1000.0).ok()
    }
}

#[async_trait::async_trait]
impl EventSource for ReplaySource {
    fn name(&self) -> &'static str {
        "replay"
    }

    async fn run(&mut self, tx: mpsc::Sender<TrailEvent>) -> Result<u64> {
        let mut sent = 0;
        let mut last_timestamp = None;

        for event in std::mem::take(&mut self.events) {
            if let TrailEvent::Move {
                timestamp: Some(ts),
                ..
            } = event
            {
                if let Some(delay) = last_timestamp.and_then(|prev| self.delay(prev, ts)) {
                    tokio::time::sleep(delay).await;
                }
                last_timestamp = Some(ts);
            }

            if tx.send(event).await.is_err() {
                debug!(sent, "Replay receiver closed early");
                break;
            }
            sent += 1;
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALK: &str = r#"
# short walk
{"type": "move", "lat": 43.0, "lng": 12.0, "timestamp": 0}

{"type": "move", "lat": 43.001, "lng": 12.001, "timestamp": 1000}
{"type": "leave"}
{"type": "enter"}
"#;

    #[test]
    fn test_parse_events_skips_blanks_and_comments() {
        let events = parse_events(WALK).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], TrailEvent::move_at(43.0, 12.0, 0));
        assert_eq!(events[2], TrailEvent::Leave);
    }

    #[test]
    fn test_parse_events_reports_line() {
        let text = "{\"type\": \"enter\"}\n\n{\"type\": \"move\", \"lat\": 1.0}\n";
        let err = parse_events(text).unwrap_err();
        assert!(matches!(err, Error::ReplayParse { line: 3, .. }));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = ReplaySource::from_path("/nonexistent/walk.jsonl").unwrap_err();
        assert!(matches!(err, Error::ReplayRead { .. }));
    }

    #[test]
    fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "trailrecorder-replay-{}.jsonl",
            std::process::id()
        ));
        std::fs::write(&path, WALK).unwrap();

        let source = ReplaySource::from_path(&path).unwrap();
        assert_eq!(source.events().len(), 4);
        assert_eq!(source.path(), Some(path.as_path()));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_delay() {
        let source = ReplaySource::new(Vec::new());
        assert_eq!(source.delay(0, 1000), None);

        let source = source.with_speed(10.0);
        assert_eq!(source.delay(0, 1000), Some(Duration::from_millis(100)));
        assert_eq!(source.delay(1000, 1000), None);
        assert_eq!(source.delay(2000, 1000), None);

        let source = source.with_speed(f64::NAN);
        assert_eq!(source.delay(0, 1000), None);
    }

    #[test]
    fn test_delay_too_long_for_duration() {
        let source = ReplaySource::new(Vec::new()).with_speed(1e-300);
        assert_eq!(source.delay(0, 1000), None);
    }

    #[test]
    fn test_delay_extreme_timestamps() {
        let source = ReplaySource::new(Vec::new()).with_speed(1.0);
        assert_eq!(source.delay(i64::MIN, i64::MAX), None);
        assert_eq!(source.delay(i64::MAX, i64::MIN), None);
        assert_eq!(
            source.delay(i64::MAX - 1000, i64::MAX),
            Some(Duration::from_secs(1))
        );
    }

    #[tokio::test]
    async fn test_run_sends_everything_in_order() {
        let events = parse_events(WALK).unwrap();
        let mut source = ReplaySource::new(events.clone());
        let (tx, mut rx) = mpsc::channel(8);

        let sent = source.run(tx).await.unwrap();
        assert_eq!(sent, 4);
        assert!(source.events().is_empty());

        let mut received = Vec::new();
        while let Some(event) = rx.recv().await {
            received.push(event);
        }
        assert_eq!(received, events);
    }

    #[tokio::test]
    async fn test_paced_run_waits_between_moves() {
        let events = vec![
            TrailEvent::move_at(0.0, 0.0, 0),
            TrailEvent::Leave,
            TrailEvent::move_at(0.0, 1.0, 200),
        ];
        let mut source = ReplaySource::new(events).with_speed(2.0);
        let (tx, _rx) = mpsc::channel(8);

        let start = tokio::time::Instant::now();
        source.run(tx).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
