#![forbid(unsafe_code)]

//! Tunables for tracking, nudging and overlay geometry.
//!
//! Every parameter lives in one [`TourConfig`] that can be loaded from TOML
//! or JSON at startup (`config` feature). `TourConfig::default()` produces
//! the stock behavior.
//!
//! ```toml
//! [tracker]
//! settle_delay_ms = 350
//! poll_interval_ms = 500
//!
//! [nudge]
//! duration_ms = 2500
//!
//! [layout]
//! card_width = 360.0
//! min_margin = 24.0
//! ```

#[cfg(feature = "config")]
use std::path::Path;

use web_time::Duration;

use crate::geometry::Size;
use crate::nudge::{DEFAULT_NUDGE_MESSAGE, NudgeEscalator};

/// Top-level tour configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TourConfig {
    pub tracker: TrackerConfig,
    pub nudge: NudgeConfig,
    pub layout: LayoutConfig,
}

/// Target measurement timing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Delay between the scroll-into-view request and the first measurement.
    pub settle_delay_ms: u64,
    /// Re-measurement period while a targeted step is active.
    pub poll_interval_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 350,
            poll_interval_ms: 500,
        }
    }
}

impl TrackerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Nudge display parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NudgeConfig {
    /// How long a nudge stays visible.
    pub duration_ms: u64,
    pub message: String,
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2500,
            message: DEFAULT_NUDGE_MESSAGE.to_string(),
        }
    }
}

impl NudgeConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Build an escalator from this configuration.
    pub fn escalator(&self) -> NudgeEscalator {
        NudgeEscalator::new(self.duration(), self.message.clone())
    }
}

/// Overlay geometry, in pixels unless noted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    pub card_width: f64,
    pub card_height: f64,
    /// Gap between the card's right edge and the side region.
    pub card_gap: f64,
    /// Minimum distance between the card's left edge and the viewport edge.
    pub min_margin: f64,
    /// Space left between the connector ends and the boxes they join.
    pub connector_standoff: f64,
    /// Fraction of the horizontal span used for the Bezier control points.
    pub curvature: f64,
    pub arrow_length: f64,
    /// Half-angle of the arrowhead, in degrees.
    pub arrow_spread_deg: f64,
    /// How far the highlight ring extends past the target.
    pub ring_padding: f64,
    pub ring_radius: f64,
    /// Scrim opacity in `[0, 1]`.
    pub scrim_opacity: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 360.0,
            card_height: 220.0,
            card_gap: 32.0,
            min_margin: 24.0,
            connector_standoff: 8.0,
            curvature: 0.45,
            arrow_length: 10.0,
            arrow_spread_deg: 28.0,
            ring_padding: 6.0,
            ring_radius: 8.0,
            scrim_opacity: 0.55,
        }
    }
}

impl LayoutConfig {
    pub fn card_size(&self) -> Size {
        Size::new(self.card_width, self.card_height)
    }
}

impl TourConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.tracker.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.tracker.poll_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn nudge_duration_ms(mut self, ms: u64) -> Self {
        self.nudge.duration_ms = ms;
        self
    }

    #[must_use]
    pub fn nudge_message(mut self, message: impl Into<String>) -> Self {
        self.nudge.message = message.into();
        self
    }

    #[must_use]
    pub fn card_size(mut self, width: f64, height: f64) -> Self {
        self.layout.card_width = width;
        self.layout.card_height = height;
        self
    }

    #[must_use]
    pub fn min_margin(mut self, margin: f64) -> Self {
        self.layout.min_margin = margin;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.into_validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.into_validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config")]
    fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Check every parameter is within range.
    ///
    /// Returns a list of problems; empty means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.tracker.poll_interval_ms == 0 {
            errors.push("tracker.poll_interval_ms must be > 0".into());
        }
        if self.nudge.duration_ms == 0 {
            errors.push("nudge.duration_ms must be > 0".into());
        }

        let layout = &self.layout;
        for (name, value) in [
            ("layout.card_width", layout.card_width),
            ("layout.card_height", layout.card_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} must be > 0, got {value}"));
            }
        }
        for (name, value) in [
            ("layout.card_gap", layout.card_gap),
            ("layout.min_margin", layout.min_margin),
            ("layout.connector_standoff", layout.connector_standoff),
            ("layout.arrow_length", layout.arrow_length),
            ("layout.ring_padding", layout.ring_padding),
            ("layout.ring_radius", layout.ring_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be >= 0, got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&layout.curvature) {
            errors.push(format!(
                "layout.curvature must be in [0, 1], got {}",
                layout.curvature
            ));
        }
        if !(0.0..=1.0).contains(&layout.scrim_opacity) {
            errors.push(format!(
                "layout.scrim_opacity must be in [0, 1], got {}",
                layout.scrim_opacity
            ));
        }
        if !(0.0..90.0).contains(&layout.arrow_spread_deg) {
            errors.push(format!(
                "layout.arrow_spread_deg must be in [0, 90), got {}",
                layout.arrow_spread_deg
            ));
        }

        errors
    }
}

/// Errors from loading configuration.
#[cfg(feature = "config")]
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    /// Parsed, but out of range.
    Invalid(Vec<String>),
}

#[cfg(feature = "config")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Toml(e) => write!(f, "config TOML parse error: {e}"),
            Self::Json(e) => write!(f, "config JSON parse error: {e}"),
            Self::Invalid(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

#[cfg(feature = "config")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TourConfig::default().validate().is_empty());
    }

    #[test]
    fn builder_setters() {
        let config = TourConfig::new()
            .settle_delay_ms(10)
            .poll_interval_ms(20)
            .nudge_duration_ms(30)
            .nudge_message("hi")
            .card_size(100.0, 50.0)
            .min_margin(4.0);
        assert_eq!(config.tracker.settle_delay(), Duration::from_millis(10));
        assert_eq!(config.tracker.poll_interval(), Duration::from_millis(20));
        assert_eq!(config.nudge.duration(), Duration::from_millis(30));
        assert_eq!(config.nudge.message, "hi");
        assert_eq!(config.layout.card_size(), Size::new(100.0, 50.0));
        assert_eq!(config.layout.min_margin, 4.0);
    }

    #[test]
    fn validate_reports_each_problem() {
        let mut config = TourConfig::new().poll_interval_ms(0).card_size(0.0, 10.0);
        config.layout.curvature = 1.5;
        config.layout.min_margin = -1.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("poll_interval_ms")));
        assert!(errors.iter().any(|e| e.contains("card_width")));
        assert!(errors.iter().any(|e| e.contains("curvature")));
        assert!(errors.iter().any(|e| e.contains("min_margin")));
    }

    #[test]
    fn escalator_uses_config() {
        let escalator = TourConfig::new().nudge_duration_ms(900).nudge.escalator();
        assert_eq!(escalator.duration(), Duration::from_millis(900));
    }

    #[cfg(feature = "config")]
    #[test]
    fn loads_partial_toml() {
        let config = TourConfig::from_toml_str(
            "[tracker]\npoll_interval_ms = 250\n\n[layout]\ncard_width = 300.0\n",
        )
        .unwrap();
        assert_eq!(config.tracker.poll_interval_ms, 250);
        assert_eq!(config.tracker.settle_delay_ms, 350);
        assert_eq!(config.layout.card_width, 300.0);
    }

    #[cfg(feature = "config")]
    #[test]
    fn loads_json_and_rejects_invalid() {
        let config = TourConfig::from_json_str(r#"{"nudge": {"duration_ms": 1000}}"#).unwrap();
        assert_eq!(config.nudge.duration_ms, 1000);
        assert!(!config.nudge.message.is_empty());

        let err = TourConfig::from_json_str(r#"{"nudge": {"duration_ms": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref errors) if errors.len() == 1));
    }
}
