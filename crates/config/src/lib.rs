//! Shared configuration for dentsculpt
//!
//! This crate is the single source of truth for brush defaults, spatial query
//! tolerances, occlusal thresholds and the display settings used when the
//! engine hands geometry to a renderer.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default brush radius in mesh units
pub const DEFAULT_BRUSH_RADIUS: f32 = 1.0;

/// Default brush strength (0.0 - 1.0)
pub const DEFAULT_BRUSH_STRENGTH: f32 = 0.5;

/// Distance below which two vertices count as smoothing neighbors
pub const DEFAULT_NEIGHBOR_EPSILON: f32 = 0.1;

/// Distance below which a vertex is classified as a near contact
pub const DEFAULT_CONTACT_THRESHOLD: f32 = 0.5;

/// Lower bound of the cross-section offset slider
pub const DEFAULT_MIN_SECTION_OFFSET: f32 = -5.0;

/// Upper bound of the cross-section offset slider
pub const DEFAULT_MAX_SECTION_OFFSET: f32 = 5.0;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Brush values used when the UI does not supply its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushDefaults {
    /// Influence falloff boundary in mesh units
    pub radius: f32,
    /// Displacement magnitude factor in (0, 1]
    pub strength: f32,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
            strength: DEFAULT_BRUSH_STRENGTH,
        }
    }
}

/// Spatial query tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Proximity threshold for smoothing neighbors. Distance based, not edge based.
    pub neighbor_epsilon: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            neighbor_epsilon: DEFAULT_NEIGHBOR_EPSILON,
        }
    }
}

/// Occlusal proximity classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusalConfig {
    /// Strict upper bound on near-contact distance
    pub contact_threshold: f32,
    /// Linear RGB for near-contact vertices
    pub near_color: [f32; 3],
    /// Linear RGB for everything else
    pub far_color: [f32; 3],
}

impl Default for OcclusalConfig {
    fn default() -> Self {
        Self {
            contact_threshold: DEFAULT_CONTACT_THRESHOLD,
            near_color: [1.0, 0.0, 0.0],
            far_color: [0.0, 0.0, 1.0],
        }
    }
}

/// Cross-section offset range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub min_offset: f32,
    pub max_offset: f32,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            min_offset: DEFAULT_MIN_SECTION_OFFSET,
            max_offset: DEFAULT_MAX_SECTION_OFFSET,
        }
    }
}

impl SectionConfig {
    /// Clamp an offset into the configured range.
    pub fn clamp_offset(&self, value: f32) -> f32 {
        value.clamp(self.min_offset, self.max_offset)
    }
}

/// Measurement label formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Digits after the decimal point
    pub decimals: usize,
    /// Suffix appended after the number
    pub unit_suffix: String,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            decimals: 2,
            unit_suffix: "units".to_string(),
        }
    }
}

impl MeasureConfig {
    /// Format a distance for display, e.g. `3.00 units`.
    pub fn format_distance(&self, distance: f32) -> String {
        format!("{:.*} {}", self.decimals, distance, self.unit_suffix)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct EngineConfig {
    pub brush: BrushDefaults,
    pub spatial: SpatialConfig,
    pub occlusal: OcclusalConfig,
    pub section: SectionConfig,
    pub measure: MeasureConfig,
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.brush.radius > 0.0) {
            return Err(ConfigError::invalid("brush.radius", "must be positive"));
        }
        if !(self.brush.strength > 0.0 && self.brush.strength <= 1.0) {
            return Err(ConfigError::invalid("brush.strength", "must be in (0, 1]"));
        }
        if !(self.spatial.neighbor_epsilon > 0.0) {
            return Err(ConfigError::invalid(
                "spatial.neighbor_epsilon",
                "must be positive",
            ));
        }
        if !(self.occlusal.contact_threshold > 0.0) {
            return Err(ConfigError::invalid(
                "occlusal.contact_threshold",
                "must be positive",
            ));
        }
        if self.section.min_offset > self.section.max_offset {
            return Err(ConfigError::invalid(
                "section",
                format!(
                    "min_offset {} exceeds max_offset {}",
                    self.section.min_offset, self.section.max_offset
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.spatial.neighbor_epsilon, DEFAULT_NEIGHBOR_EPSILON);
        assert_eq!(config.occlusal.contact_threshold, DEFAULT_CONTACT_THRESHOLD);
        assert_eq!(config.section.min_offset, -5.0);
        assert_eq!(config.section.max_offset, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "brush": { "radius": 2.5 } }"#).unwrap();
        assert_eq!(config.brush.radius, 2.5);
        assert_eq!(config.brush.strength, DEFAULT_BRUSH_STRENGTH);
        assert_eq!(config.measure.unit_suffix, "units");
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = EngineConfig::default();
        config.spatial.neighbor_epsilon = 0.25;
        let json = config.to_json().unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_json(r#"{ "brush": { "strength": 1.5 } }"#).unwrap_err();
        assert!(format!("{err}").contains("brush.strength"));

        let err = EngineConfig::from_json(r#"{ "section": { "min_offset": 3.0, "max_offset": 1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "section", .. }));

        let err = EngineConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_format_distance() {
        let measure = MeasureConfig::default();
        assert_eq!(measure.format_distance(3.0), "3.00 units");
        assert_eq!(measure.format_distance(0.0), "0.00 units");
        assert_eq!(measure.format_distance(1.23456), "1.23 units");
    }

    #[test]
    fn test_clamp_offset() {
        let section = SectionConfig::default();
        assert_eq!(section.clamp_offset(2.5), 2.5);
        assert_eq!(section.clamp_offset(9.0), 5.0);
        assert_eq!(section.clamp_offset(-9.0), -5.0);
    }
}
