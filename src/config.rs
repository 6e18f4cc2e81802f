//! Configuration of the simulated sensor. Every value can be changed between update cycles; the
//! projection pipeline picks up the new values on its next cycle.

use crate::Result;
use crate::common::AngularSpan;
use crate::errors::InvalidConfig;
use crate::palette::Color;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The externally settable parameters of the LIDAR projection. Angles are in degrees, distances
/// and sizes are in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Edge length of the quad drawn at each sample
    pub square_size: f64,

    /// Width of the quad outline
    pub line_thickness: f64,

    /// Number of colors in the distance gradient
    pub gradient_steps: usize,

    /// Horizontal angular step between samples
    pub x_interval: f64,

    /// Vertical angular step between samples
    pub y_interval: f64,

    /// Full horizontal field of view, centered on the forward direction
    pub x_range: f64,

    /// Full vertical field of view, centered on the forward direction
    pub y_range: f64,

    /// Maximum range of each ray. A ray which hits nothing is recorded at exactly this distance.
    pub detection_distance: f64,

    /// The color the gradient palette entries are derived from
    pub base_color: Color,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            square_size: 0.5,
            line_thickness: 0.05,
            gradient_steps: 25,
            x_interval: 10.0,
            y_interval: 10.0,
            x_range: 110.0,
            y_range: 110.0,
            detection_distance: 200.0,
            base_color: Color::WHITE,
        }
    }
}

fn positive(field: &'static str, value: f64) -> std::result::Result<(), InvalidConfig> {
    if !value.is_finite() {
        Err(InvalidConfig::NotFinite { field })
    } else if value <= 0.0 {
        Err(InvalidConfig::NonPositive { field, value })
    } else {
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> std::result::Result<(), InvalidConfig> {
    if !value.is_finite() {
        Err(InvalidConfig::NotFinite { field })
    } else if value < 0.0 {
        Err(InvalidConfig::Negative { field, value })
    } else {
        Ok(())
    }
}

impl SensorConfig {
    /// Parse a configuration from JSON text. Fields which are not present keep their default
    /// values.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration from a JSON file, see `from_json`
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The horizontal axis of the field of view, stepped once per lattice column
    pub fn x_span(&self) -> AngularSpan {
        AngularSpan::new(self.x_range, self.x_interval)
    }

    /// The vertical axis of the field of view, stepped once per lattice row
    pub fn y_span(&self) -> AngularSpan {
        AngularSpan::new(self.y_range, self.y_interval)
    }

    /// Check that the configuration can be run by the projection pipeline without producing
    /// undefined numeric results. The first offending field is reported.
    pub fn validate(&self) -> std::result::Result<(), InvalidConfig> {
        positive("detection_distance", self.detection_distance)?;
        positive("x_interval", self.x_interval)?;
        positive("y_interval", self.y_interval)?;
        non_negative("x_range", self.x_range)?;
        non_negative("y_range", self.y_range)?;
        non_negative("square_size", self.square_size)?;
        non_negative("line_thickness", self.line_thickness)?;

        if self.gradient_steps == 0 {
            return Err(InvalidConfig::NoGradientSteps);
        }

        Ok(())
    }

    /// Returns a copy of the configuration with every degenerate value clamped or replaced so
    /// that the pipeline degrades to a flat or empty projection instead of failing. Valid
    /// configurations are returned unchanged.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let or_default = |value: f64, default: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                default
            }
        };
        let clamped = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };

        Self {
            square_size: clamped(self.square_size),
            line_thickness: clamped(self.line_thickness),
            gradient_steps: self.gradient_steps.max(1),
            x_interval: or_default(self.x_interval, defaults.x_interval),
            y_interval: or_default(self.y_interval, defaults.y_interval),
            x_range: clamped(self.x_range),
            y_range: clamped(self.y_range),
            detection_distance: or_default(self.detection_distance, defaults.detection_distance),
            base_color: self.base_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_is_valid() {
        assert!(SensorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_spans() {
        let config = SensorConfig::default();
        assert_eq!(config.x_span().count(), 11);
        assert_eq!(config.y_span().count(), 11);
    }

    #[test_case(0.0)]
    #[test_case(-5.0)]
    fn test_rejects_detection_distance(value: f64) {
        let config = SensorConfig {
            detection_distance: value,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::NonPositive {
                field: "detection_distance",
                value
            })
        );
    }

    #[test]
    fn test_rejects_zero_gradient_steps() {
        let config = SensorConfig {
            gradient_steps: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(InvalidConfig::NoGradientSteps));
    }

    #[test]
    fn test_rejects_nan_interval() {
        let config = SensorConfig {
            y_interval: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::NotFinite {
                field: "y_interval"
            })
        );
    }

    #[test]
    fn test_sanitized_clamps_degenerate_values() {
        let config = SensorConfig {
            gradient_steps: 0,
            detection_distance: 0.0,
            x_interval: -1.0,
            y_range: -20.0,
            ..Default::default()
        };

        let clean = config.sanitized();
        assert!(clean.validate().is_ok());
        assert_eq!(clean.gradient_steps, 1);
        assert_eq!(clean.detection_distance, 200.0);
        assert_eq!(clean.x_interval, 10.0);
        assert_eq!(clean.y_range, 0.0);
    }

    #[test]
    fn test_sanitized_keeps_valid_config() {
        let config = SensorConfig {
            x_range: 45.0,
            x_interval: 2.5,
            ..Default::default()
        };
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_from_json_partial() {
        let config = SensorConfig::from_json(r#"{"x_range": 30.0, "gradient_steps": 8}"#).unwrap();
        assert_eq!(config.x_range, 30.0);
        assert_eq!(config.gradient_steps, 8);
        assert_eq!(config.detection_distance, 200.0);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(SensorConfig::from_json("{\"x_range\": \"wide\"}").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SensorConfig {
            square_size: 1.25,
            base_color: Color::new(0.1, 0.2, 0.3, 0.4),
            ..Default::default()
        };
        let text = config.to_json().unwrap();
        assert_eq!(SensorConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(SensorConfig::load(Path::new("/nonexistent/lidar.json")).is_err());
    }
}
