//! Auxiliary geometry registry.
//!
//! Markers, lines and labels shown alongside the mesh are owned here and
//! addressed by a [`GeometryHandle`]. Every insertion and removal is mirrored
//! as a [`RenderCommand`] so the renderer stays in step without the engine
//! holding references to anything it draws.

use std::collections::BTreeMap;

use dentsculpt_ipc::{GeometryDesc, GeometryHandle, LabelRole, LineRole, MarkerRole, RenderCommand};

/// Handle-keyed store of auxiliary geometry with a pending render queue.
#[derive(Debug, Default)]
pub struct GeometryRegistry {
    entries: BTreeMap<GeometryHandle, GeometryDesc>,
    next_handle: u64,
    pending: Vec<RenderCommand>,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store geometry under a fresh handle and queue it for display.
    ///
    /// Handles are never reused, even after [`GeometryRegistry::clear`].
    pub fn insert(&mut self, geometry: GeometryDesc) -> GeometryHandle {
        let handle = GeometryHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(RenderCommand::AddGeometry {
            handle,
            geometry: geometry.clone(),
        });
        self.entries.insert(handle, geometry);
        handle
    }

    /// Drop geometry and queue its removal. Unknown handles are ignored.
    pub fn remove(&mut self, handle: GeometryHandle) -> Option<GeometryDesc> {
        let removed = self.entries.remove(&handle);
        if removed.is_some() {
            self.pending.push(RenderCommand::RemoveGeometry { handle });
        }
        removed
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        let handles: Vec<_> = self.entries.keys().copied().collect();
        for handle in handles {
            self.remove(handle);
        }
    }

    pub fn get(&self, handle: GeometryHandle) -> Option<&GeometryDesc> {
        self.entries.get(&handle)
    }

    pub fn contains(&self, handle: GeometryHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeometryHandle, &GeometryDesc)> {
        self.entries.iter().map(|(h, g)| (*h, g))
    }

    /// Number of markers with the given role.
    pub fn marker_count(&self, role: MarkerRole) -> usize {
        self.entries
            .values()
            .filter(|g| matches!(g, GeometryDesc::Marker { role: r, .. } if *r == role))
            .count()
    }

    /// Number of polylines or segment sets with the given role.
    pub fn line_count(&self, role: LineRole) -> usize {
        self.entries
            .values()
            .filter(|g| match g {
                GeometryDesc::Polyline { role: r, .. } | GeometryDesc::Segments { role: r, .. } => *r == role,
                _ => false,
            })
            .count()
    }

    /// Number of labels with the given role.
    pub fn label_count(&self, role: LabelRole) -> usize {
        self.entries
            .values()
            .filter(|g| matches!(g, GeometryDesc::Label { role: r, .. } if *r == role))
            .count()
    }

    /// Queue an arbitrary render command alongside geometry changes.
    pub fn push_command(&mut self, command: RenderCommand) {
        self.pending.push(command);
    }

    /// Hand queued render commands to the caller.
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(x: f32) -> GeometryDesc {
        GeometryDesc::Marker {
            position: [x, 0.0, 0.0],
            role: MarkerRole::Measurement,
        }
    }

    #[test]
    fn test_insert_remove_queue() {
        let mut registry = GeometryRegistry::new();
        let a = registry.insert(marker(0.0));
        let b = registry.insert(marker(1.0));
        assert_ne!(a, b);
        assert_eq!(registry.marker_count(MarkerRole::Measurement), 2);

        assert!(registry.remove(a).is_some());
        assert!(registry.remove(a).is_none());
        assert!(!registry.contains(a));
        assert!(registry.contains(b));

        let commands = registry.drain_commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[2], RenderCommand::RemoveGeometry { handle } if handle == a));
        assert!(registry.drain_commands().is_empty());
    }

    #[test]
    fn test_handles_not_reused_after_clear() {
        let mut registry = GeometryRegistry::new();
        let first = registry.insert(marker(0.0));
        registry.insert(marker(1.0));
        registry.clear();
        assert!(registry.is_empty());

        let next = registry.insert(marker(2.0));
        assert!(next > first);
        assert_eq!(next, GeometryHandle(2));
    }

    #[test]
    fn test_counts_by_role() {
        let mut registry = GeometryRegistry::new();
        registry.insert(GeometryDesc::Polyline {
            points: vec![[0.0; 3], [1.0, 0.0, 0.0]],
            role: LineRole::Margin,
        });
        registry.insert(GeometryDesc::Segments {
            segments: vec![[[0.0; 3], [1.0, 0.0, 0.0]]],
            role: LineRole::SectionOutline,
        });
        registry.insert(GeometryDesc::Label {
            position: [0.0; 3],
            text: "hi".to_string(),
            role: LabelRole::Note,
        });
        assert_eq!(registry.line_count(LineRole::Margin), 1);
        assert_eq!(registry.line_count(LineRole::SectionOutline), 1);
        assert_eq!(registry.line_count(LineRole::Measurement), 0);
        assert_eq!(registry.label_count(LabelRole::Note), 1);
    }
}
