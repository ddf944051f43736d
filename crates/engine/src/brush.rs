//! Brush parameters and influence falloff.

use serde::{Deserialize, Serialize};

use dentsculpt_config::BrushDefaults;
use dentsculpt_ipc::BrushSettings;

/// Radius and strength for one brush invocation. Configuration, not state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushParams {
    /// Influence boundary in mesh units
    pub radius: f32,
    /// Displacement magnitude factor, nominally in (0, 1]
    pub strength: f32,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self::from(BrushDefaults::default())
    }
}

impl From<BrushDefaults> for BrushParams {
    fn from(defaults: BrushDefaults) -> Self {
        Self::new(defaults.radius, defaults.strength)
    }
}

impl From<BrushSettings> for BrushParams {
    fn from(settings: BrushSettings) -> Self {
        Self::new(settings.radius, settings.strength)
    }
}

impl BrushParams {
    pub fn new(radius: f32, strength: f32) -> Self {
        Self { radius, strength }
    }

    /// Positive radius and strength in [0, 1]. Strength 0 is a valid no-op.
    pub fn is_valid(&self) -> bool {
        self.radius > 0.0 && (0.0..=1.0).contains(&self.strength)
    }

    /// Linear influence `1 - distance/radius` at `distance` from the brush
    /// center, or `None` outside the radius.
    ///
    /// Inside the radius the value is in (0, 1].
    pub fn influence(&self, distance: f32) -> Option<f32> {
        if !(self.radius > 0.0) || distance >= self.radius {
            return None;
        }
        Some(1.0 - distance.max(0.0) / self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_influence_linear() {
        let brush = BrushParams::new(4.0, 1.0);
        assert_eq!(brush.influence(0.0), Some(1.0));
        assert!((brush.influence(1.0).unwrap() - 0.75).abs() < 1e-6);
        assert!((brush.influence(3.0).unwrap() - 0.25).abs() < 1e-6);
        assert!(brush.influence(3.999).unwrap() > 0.0);
    }

    #[test]
    fn test_influence_bounds() {
        let brush = BrushParams::new(2.0, 0.5);
        assert_eq!(brush.influence(0.0), Some(1.0));
        assert_eq!(brush.influence(1.0), Some(0.5));
        assert_eq!(brush.influence(2.0), None);
        assert_eq!(brush.influence(3.0), None);

        let degenerate = BrushParams::new(0.0, 0.5);
        assert_eq!(degenerate.influence(0.0), None);
    }

    #[test]
    fn test_validity() {
        assert!(BrushParams::new(1.0, 0.5).is_valid());
        assert!(BrushParams::new(1.0, 0.0).is_valid());
        assert!(BrushParams::new(1.0, 1.0).is_valid());
        assert!(!BrushParams::new(0.0, 0.5).is_valid());
        assert!(!BrushParams::new(-1.0, 0.5).is_valid());
        assert!(!BrushParams::new(1.0, 1.5).is_valid());
        assert!(!BrushParams::new(1.0, -0.1).is_valid());
        assert!(!BrushParams::new(f32::NAN, 0.5).is_valid());
    }

    #[test]
    fn test_params_from_config() {
        let params = BrushParams::from(BrushDefaults {
            radius: 3.0,
            strength: 0.25,
        });
        assert_eq!(params.radius, 3.0);
        assert_eq!(params.strength, 0.25);
    }
}
