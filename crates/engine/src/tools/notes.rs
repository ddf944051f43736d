//! Point annotations.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use dentsculpt_ipc::{GeometryDesc, LabelRole, MarkerRole};

use crate::registry::GeometryRegistry;

/// A free-text annotation anchored at a surface point. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub position: Vec3,
    pub text: String,
}

/// Append-only note list.
#[derive(Debug, Default)]
pub struct Notes {
    notes: Vec<Note>,
}

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Attach `text` at `position` with a marker and a label.
    ///
    /// Blank or missing text adds nothing. Returns the index of the new note.
    pub fn add_note(&mut self, position: Vec3, text: Option<&str>, registry: &mut GeometryRegistry) -> Option<usize> {
        let text = text.map(str::trim).filter(|t| !t.is_empty())?;

        registry.insert(GeometryDesc::Marker {
            position: position.to_array(),
            role: MarkerRole::Note,
        });
        registry.insert(GeometryDesc::Label {
            position: position.to_array(),
            text: text.to_string(),
            role: LabelRole::Note,
        });
        self.notes.push(Note {
            position,
            text: text.to_string(),
        });

        let index = self.notes.len() - 1;
        debug!("note {} at {:?}: {}", index, position, text);
        Some(index)
    }

    /// Forget every note. Their geometry goes with the registry.
    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_note() {
        let mut registry = GeometryRegistry::new();
        let mut notes = Notes::new();

        assert_eq!(notes.add_note(Vec3::X, Some("check contact"), &mut registry), Some(0));
        assert_eq!(notes.add_note(Vec3::Y, Some("  distal  "), &mut registry), Some(1));
        assert_eq!(notes.len(), 2);
        assert_eq!(notes.as_slice()[1].text, "distal");
        assert_eq!(registry.marker_count(MarkerRole::Note), 2);
        assert_eq!(registry.label_count(LabelRole::Note), 2);
    }

    #[test]
    fn test_blank_text_ignored() {
        let mut registry = GeometryRegistry::new();
        let mut notes = Notes::new();
        assert_eq!(notes.add_note(Vec3::ZERO, None, &mut registry), None);
        assert_eq!(notes.add_note(Vec3::ZERO, Some(""), &mut registry), None);
        assert_eq!(notes.add_note(Vec3::ZERO, Some("   "), &mut registry), None);
        assert!(notes.is_empty());
        assert!(registry.is_empty());
        assert!(registry.drain_commands().is_empty());
    }
}
