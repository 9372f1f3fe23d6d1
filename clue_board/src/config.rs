//! Board configuration.
//!
//! Every section has working defaults, so a TOML file only needs to name the
//! values it overrides.

use serde::Deserialize;
use thiserror::Error;

use clue_model::Vec2;

/// Failure to parse or validate a board configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid board config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid board config: {0}")]
    Invalid(String),
}

/// Tunables of the expanding-ring placement search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// First ring radius.
    pub start_radius: f32,
    /// Radius increment between rings.
    pub radius_step: f32,
    /// Largest ring searched before giving up.
    pub max_radius: f32,
    /// Minimum distance between node centres.
    pub min_spacing: f32,
    /// Furthest a new node may sit from the centroid of its related nodes.
    pub related_max_distance: f32,
    /// Random angular jitter as a fraction of one sample slot.
    pub jitter: f32,
    pub min_samples: usize,
    pub max_samples: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            start_radius: 80.0,
            radius_step: 60.0,
            max_radius: 1200.0,
            min_spacing: 140.0,
            related_max_distance: 420.0,
            jitter: 0.35,
            min_samples: 8,
            max_samples: 48,
        }
    }
}

/// Tunables of cone-constrained directional navigation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub cone_half_angle_deg: f32,
    /// Candidates closer than this are ignored.
    pub min_hop_distance: f32,
    /// Held-stick auto-repeat interval in seconds.
    pub repeat_interval: f32,
    /// A new direction whose dot with the last one falls below this counts
    /// as a reversal and fires at once.
    pub reversal_dot: f32,
    /// Stick magnitude below which the stick counts as released.
    pub deadzone: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            cone_half_angle_deg: 35.0,
            min_hop_distance: 1.0,
            repeat_interval: 0.15,
            reversal_dot: 0.65,
            deadzone: 0.5,
        }
    }
}

impl NavigationConfig {
    pub fn cone_cos(&self) -> f32 {
        self.cone_half_angle_deg.to_radians().cos()
    }
}

/// Tunables of the board camera.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub default_zoom: f32,
    /// Exponential smoothing rate of zoom (1/s).
    pub zoom_rate: f32,
    /// Exponential smoothing rate of pan (1/s).
    pub pan_rate: f32,
    /// Margin added around the scaled content on every side.
    pub padding: f32,
    pub viewport: Vec2,
    /// Smallest content size; grows as nodes are placed.
    pub content: Vec2,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.4,
            max_zoom: 2.5,
            default_zoom: 1.0,
            zoom_rate: 12.0,
            pan_rate: 10.0,
            padding: 160.0,
            viewport: Vec2::new(1280.0, 720.0),
            content: Vec2::new(2400.0, 1600.0),
        }
    }
}

/// Timings of the discovery reveal sequence, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub focus_zoom: f32,
    pub zoom_in_duration: f32,
    pub pop_duration: f32,
    pub pop_stagger: f32,
    /// Minimum time between releasing advance and the press that counts.
    pub advance_debounce: f32,
    pub edge_grow_duration: f32,
    pub zoom_out_duration: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            focus_zoom: 1.5,
            zoom_in_duration: 0.5,
            pop_duration: 0.35,
            pop_stagger: 0.15,
            advance_debounce: 0.5,
            edge_grow_duration: 0.6,
            zoom_out_duration: 0.5,
        }
    }
}

/// Complete board configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub placement: PlacementConfig,
    pub navigation: NavigationConfig,
    pub camera: CameraConfig,
    pub reveal: RevealConfig,
    /// Free-look pan speed in viewport units per second at full stick.
    pub look_speed: f32,
    /// Zoom multiplier per second at full zoom input.
    pub zoom_speed: f32,
    /// Extra room kept around the outermost node when growing content bounds.
    pub content_margin: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            navigation: NavigationConfig::default(),
            camera: CameraConfig::default(),
            reveal: RevealConfig::default(),
            look_speed: 900.0,
            zoom_speed: 2.0,
            content_margin: 200.0,
        }
    }
}

impl CameraConfig {
    /// Zoom bounds must be positive, finite and ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("default_zoom", self.default_zoom),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "camera.{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "camera.min_zoom ({}) exceeds camera.max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        if !self.padding.is_finite() {
            return Err(ConfigError::Invalid("camera.padding must be finite".into()));
        }
        Ok(())
    }
}

impl BoardConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        if self.reveal.focus_zoom.is_nan() || self.reveal.focus_zoom <= 0.0 {
            return Err(ConfigError::Invalid(
                "reveal.focus_zoom must be a positive number".into(),
            ));
        }
        Ok(())
    }
}
