//! `trailrecorder` - live trail drawing for map views
//!
//! This library keeps a short, de-jittered trail of recent pointer or GPS
//! positions and mirrors it onto a map as a single polyline. The map itself
//! is abstracted behind [`RenderingSurface`]; a headless implementation is
//! included for replays and tests.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod recorder;
pub mod replay;
pub mod sample;
pub mod summary;
pub mod surface;

pub use buffer::TrailBuffer;
pub use config::Config;
pub use error::{Error, Result};
pub use events::{EventSource, TrailEvent};
pub use logging::init_logging;
pub use recorder::{MoveOutcome, TrailRecorder, TrailSettings};
pub use sample::{LatLng, Sample};
pub use summary::TrailSummary;
pub use surface::{HeadlessMap, RenderingSurface};
