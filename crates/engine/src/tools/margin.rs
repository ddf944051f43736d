//! Margin-line tracing.

use glam::Vec3;
use tracing::debug;

use dentsculpt_ipc::{GeometryDesc, GeometryHandle, LineRole};

use crate::registry::GeometryRegistry;

/// Ordered margin points and the polyline drawn through them.
///
/// Append-only; a single line is shown at a time and only once there are at
/// least two points.
#[derive(Debug, Default)]
pub struct MarginLine {
    points: Vec<Vec3>,
    line: Option<GeometryHandle>,
}

impl MarginLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Handle of the visible polyline, if any.
    pub fn line(&self) -> Option<GeometryHandle> {
        self.line
    }

    /// Append a point and redraw the polyline through every point so far.
    pub fn add_point(&mut self, point: Vec3, registry: &mut GeometryRegistry) {
        self.points.push(point);
        if self.points.len() < 2 {
            return;
        }

        if let Some(old) = self.line.take() {
            registry.remove(old);
        }
        self.line = Some(registry.insert(GeometryDesc::Polyline {
            points: self.points.iter().map(|p| p.to_array()).collect(),
            role: LineRole::Margin,
        }));
        debug!("margin: {} points, length {}", self.points.len(), self.length());
    }

    /// Sum of segment lengths along the traced path.
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Forget every point and remove the line.
    pub fn clear(&mut self, registry: &mut GeometryRegistry) {
        if let Some(line) = self.line.take() {
            registry.remove(line);
        }
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_appears_at_two_points() {
        let mut registry = GeometryRegistry::new();
        let mut margin = MarginLine::new();

        margin.add_point(Vec3::ZERO, &mut registry);
        assert!(margin.line().is_none());
        assert!(registry.is_empty());

        margin.add_point(Vec3::X, &mut registry);
        let handle = margin.line().unwrap();
        assert_eq!(registry.line_count(LineRole::Margin), 1);
        match registry.get(handle).unwrap() {
            GeometryDesc::Polyline { points, .. } => assert_eq!(points.len(), 2),
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_single_line_replaced() {
        let mut registry = GeometryRegistry::new();
        let mut margin = MarginLine::new();
        margin.add_point(Vec3::ZERO, &mut registry);
        margin.add_point(Vec3::X, &mut registry);
        let first = margin.line().unwrap();
        margin.add_point(Vec3::new(1.0, 1.0, 0.0), &mut registry);

        assert!(!registry.contains(first));
        assert_eq!(registry.line_count(LineRole::Margin), 1);
        match registry.get(margin.line().unwrap()).unwrap() {
            GeometryDesc::Polyline { points, .. } => {
                assert_eq!(points, &vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
            }
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_length_and_clear() {
        let mut registry = GeometryRegistry::new();
        let mut margin = MarginLine::new();
        for p in [Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 0.0)] {
            margin.add_point(p, &mut registry);
        }
        assert!((margin.length() - 7.0).abs() < 1e-6);

        margin.clear(&mut registry);
        assert!(margin.is_empty());
        assert!(registry.is_empty());
        assert_eq!(margin.length(), 0.0);
    }
}
