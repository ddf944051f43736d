//! Two-point distance measurement.

use glam::Vec3;
use tracing::debug;

use dentsculpt_config::MeasureConfig;
use dentsculpt_ipc::{GeometryDesc, GeometryHandle, LabelRole, LineRole, MarkerRole};

use crate::registry::GeometryRegistry;

/// Measurement pair state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasureState {
    /// No point captured
    #[default]
    Empty,
    /// First point captured and marked
    Armed { point: Vec3, marker: GeometryHandle },
}

/// What a call to [`MeasureTool::record_point`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureOutcome {
    /// First point stored
    Armed { point: Vec3 },
    /// Second point stored and the pair resolved
    Complete(Measurement),
}

/// A finished measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub start: Vec3,
    pub end: Vec3,
    /// Euclidean distance in mesh-local units
    pub distance: f32,
    pub label: String,
}

/// Measurement state machine plus the visible line/label of the last result.
#[derive(Debug, Default)]
pub struct MeasureTool {
    state: MeasureState,
    /// Segment and label of the most recent measurement
    shown: Option<(GeometryHandle, GeometryHandle)>,
}

impl MeasureTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MeasureState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, MeasureState::Armed { .. })
    }

    /// Handles of the visible measurement line and label.
    pub fn shown(&self) -> Option<(GeometryHandle, GeometryHandle)> {
        self.shown
    }

    /// Capture a point.
    ///
    /// The first call marks the point and arms the tool. The second marks the
    /// new point, replaces any previous line/label with a segment and a
    /// midpoint label, removes both intermediate markers and returns to empty.
    pub fn record_point(&mut self, point: Vec3, registry: &mut GeometryRegistry, config: &MeasureConfig) -> MeasureOutcome {
        match self.state {
            MeasureState::Empty => {
                let marker = registry.insert(marker_at(point));
                self.state = MeasureState::Armed { point, marker };
                debug!("measure: armed at {:?}", point);
                MeasureOutcome::Armed { point }
            }
            MeasureState::Armed { point: start, marker } => {
                let end_marker = registry.insert(marker_at(point));
                let distance = start.distance(point);
                let label = config.format_distance(distance);

                registry.remove(marker);
                registry.remove(end_marker);
                if let Some((line, text)) = self.shown.take() {
                    registry.remove(line);
                    registry.remove(text);
                }

                let line = registry.insert(GeometryDesc::Polyline {
                    points: vec![start.to_array(), point.to_array()],
                    role: LineRole::Measurement,
                });
                let text = registry.insert(GeometryDesc::Label {
                    position: ((start + point) * 0.5).to_array(),
                    text: label.clone(),
                    role: LabelRole::Measurement,
                });
                self.shown = Some((line, text));
                self.state = MeasureState::Empty;

                debug!("measure: {:?} -> {:?} = {}", start, point, distance);
                MeasureOutcome::Complete(Measurement {
                    start,
                    end: point,
                    distance,
                    label,
                })
            }
        }
    }

    /// Drop the pending point and the visible result.
    pub fn reset(&mut self, registry: &mut GeometryRegistry) {
        if let MeasureState::Armed { marker, .. } = self.state {
            registry.remove(marker);
        }
        if let Some((line, text)) = self.shown.take() {
            registry.remove(line);
            registry.remove(text);
        }
        self.state = MeasureState::Empty;
    }
}

fn marker_at(point: Vec3) -> GeometryDesc {
    GeometryDesc::Marker {
        position: point.to_array(),
        role: MarkerRole::Measurement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_counts() {
        let mut registry = GeometryRegistry::new();
        let mut tool = MeasureTool::new();
        let config = MeasureConfig::default();

        let outcome = tool.record_point(Vec3::ZERO, &mut registry, &config);
        assert_eq!(outcome, MeasureOutcome::Armed { point: Vec3::ZERO });
        assert!(tool.is_armed());
        assert_eq!(registry.marker_count(MarkerRole::Measurement), 1);
        assert_eq!(registry.line_count(LineRole::Measurement), 0);

        let outcome = tool.record_point(Vec3::new(3.0, 0.0, 0.0), &mut registry, &config);
        let MeasureOutcome::Complete(measurement) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(measurement.distance, 3.0);
        assert_eq!(measurement.label, "3.00 units");
        assert_eq!(tool.state(), MeasureState::Empty);
        assert_eq!(registry.marker_count(MarkerRole::Measurement), 0);
        assert_eq!(registry.line_count(LineRole::Measurement), 1);
        assert_eq!(registry.label_count(LabelRole::Measurement), 1);
    }

    #[test]
    fn test_label_at_midpoint() {
        let mut registry = GeometryRegistry::new();
        let mut tool = MeasureTool::new();
        let config = MeasureConfig::default();
        tool.record_point(Vec3::new(0.0, 0.0, 0.0), &mut registry, &config);
        tool.record_point(Vec3::new(2.0, 4.0, 0.0), &mut registry, &config);

        let (_, label) = tool.shown().unwrap();
        match registry.get(label).unwrap() {
            GeometryDesc::Label { position, text, .. } => {
                assert_eq!(*position, [1.0, 2.0, 0.0]);
                assert_eq!(text, "4.47 units");
            }
            other => panic!("expected label, got {other:?}"),
        }
    }

    #[test]
    fn test_second_measurement_replaces_first() {
        let mut registry = GeometryRegistry::new();
        let mut tool = MeasureTool::new();
        let config = MeasureConfig::default();

        tool.record_point(Vec3::ZERO, &mut registry, &config);
        tool.record_point(Vec3::X, &mut registry, &config);
        let (first_line, first_label) = tool.shown().unwrap();

        tool.record_point(Vec3::Y, &mut registry, &config);
        // Previous result stays visible while the next pair is armed
        assert!(registry.contains(first_line));
        tool.record_point(Vec3::Z, &mut registry, &config);

        assert!(!registry.contains(first_line));
        assert!(!registry.contains(first_label));
        assert_eq!(registry.line_count(LineRole::Measurement), 1);
        assert_eq!(registry.label_count(LabelRole::Measurement), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_zero_distance_is_valid() {
        let mut registry = GeometryRegistry::new();
        let mut tool = MeasureTool::new();
        let config = MeasureConfig::default();
        tool.record_point(Vec3::ONE, &mut registry, &config);
        let outcome = tool.record_point(Vec3::ONE, &mut registry, &config);
        assert!(matches!(outcome, MeasureOutcome::Complete(m) if m.distance == 0.0 && m.label == "0.00 units"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut registry = GeometryRegistry::new();
        let mut tool = MeasureTool::new();
        let config = MeasureConfig::default();
        tool.record_point(Vec3::ZERO, &mut registry, &config);
        tool.record_point(Vec3::X, &mut registry, &config);
        tool.record_point(Vec3::Y, &mut registry, &config);
        tool.reset(&mut registry);
        assert!(registry.is_empty());
        assert_eq!(tool.state(), MeasureState::Empty);
    }
}
