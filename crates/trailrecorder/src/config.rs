//! Configuration management for trailrecorder.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::buffer::DEFAULT_CAPACITY;
use crate::error::{Error, Result};
use crate::recorder::{TrailSettings, DEFAULT_MIN_DISTANCE_PX};
use crate::sample::LatLng;
use crate::surface::{HeadlessMap, PolylineStyle, ViewState};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "trailrecorder";

/// Environment variable prefix.
const ENV_PREFIX: &str = "TRAILRECORDER_";

/// Highest zoom level a view may use.
const MAX_ZOOM: f64 = 24.0;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TRAILRECORDER_`, sections split by `__`)
/// 2. TOML config file at `~/.config/trailrecorder/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trail buffering.
    pub trail: TrailConfig,
    /// Trail polyline style.
    pub style: PolylineStyle,
    /// Headless map used for replays.
    pub map: MapConfig,
    /// Replay pacing.
    pub replay: ReplayConfig,
}

/// Trail buffering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Maximum number of samples kept in the trail.
    pub capacity: usize,
    /// Minimum on-screen distance between consecutive samples, in pixels.
    pub min_distance_px: f64,
}

/// Headless map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Initial zoom level.
    pub zoom: f64,
    /// Initial view centre latitude.
    pub center_lat: f64,
    /// Initial view centre longitude.
    pub center_lng: f64,
}

/// Replay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Playback speed relative to recorded timestamps. 0 replays without waiting.
    pub speed: f64,
    /// Capacity of the event channel between source and recorder.
    pub channel_capacity: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_distance_px: DEFAULT_MIN_DISTANCE_PX,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        // Central Italy
        Self {
            width: 800,
            height: 600,
            zoom: 13.0,
            center_lat: 42.8333,
            center_lng: 12.8333,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 0.0,
            channel_capacity: 100,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.trail.capacity == 0 {
            return Err(Error::config_validation(
                "trail.capacity must be greater than 0",
            ));
        }

        let threshold = self.trail.min_distance_px;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::config_validation(format!(
                "trail.min_distance_px must be a non-negative number, got {threshold}"
            )));
        }

        if !(0.0..=1.0).contains(&self.style.opacity) {
            return Err(Error::config_validation(format!(
                "style.opacity must be between 0 and 1, got {}",
                self.style.opacity
            )));
        }

        if !(self.style.weight > 0.0) {
            return Err(Error::config_validation(
                "style.weight must be greater than 0",
            ));
        }

        if self.map.width == 0 || self.map.height == 0 {
            return Err(Error::config_validation(format!(
                "map viewport must be non-empty, got {}x{}",
                self.map.width, self.map.height
            )));
        }

        if !(0.0..=MAX_ZOOM).contains(&self.map.zoom) {
            return Err(Error::config_validation(format!(
                "map.zoom must be between 0 and {MAX_ZOOM}, got {}",
                self.map.zoom
            )));
        }

        if !LatLng::new(self.map.center_lat, self.map.center_lng).is_finite() {
            return Err(Error::config_validation("map center must be finite"));
        }

        if !self.replay.speed.is_finite() || self.replay.speed < 0.0 {
            return Err(Error::config_validation(format!(
                "replay.speed must be a non-negative number, got {}",
                self.replay.speed
            )));
        }

        if self.replay.channel_capacity == 0 {
            return Err(Error::config_validation(
                "replay.channel_capacity must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Recorder settings derived from the trail and style sections.
    #[must_use]
    pub fn trail_settings(&self) -> TrailSettings {
        TrailSettings {
            capacity: self.trail.capacity,
            min_distance_px: self.trail.min_distance_px,
            style: self.style.clone(),
        }
    }

    /// The configured initial view.
    #[must_use]
    pub fn initial_view(&self) -> ViewState {
        ViewState::new(
            LatLng::new(self.map.center_lat, self.map.center_lng),
            self.map.zoom,
        )
    }

    /// A headless map sized and centred as configured.
    #[must_use]
    pub fn headless_map(&self) -> HeadlessMap {
        HeadlessMap::new(
            self.initial_view(),
            f64::from(self.map.width),
            f64::from(self.map.height),
        )
    }
}
