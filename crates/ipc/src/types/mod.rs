//! Shared value types carried by render commands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable key for a piece of auxiliary geometry shown by the renderer.
///
/// Handles are allocated by the engine and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GeometryHandle(pub u64);

impl fmt::Display for GeometryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geom#{}", self.0)
    }
}

/// What a point marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerRole {
    /// Endpoint of a measurement in progress
    Measurement,
    /// Anchor of a note
    Note,
}

/// What a line stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRole {
    /// Traced margin polyline
    Margin,
    /// Completed measurement segment
    Measurement,
    /// Plane/mesh intersection outline
    SectionOutline,
}

/// What a text label stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelRole {
    Measurement,
    Note,
}

/// Auxiliary geometry the renderer draws on top of the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GeometryDesc {
    /// Small sphere/sprite at a point
    Marker { position: [f32; 3], role: MarkerRole },
    /// Connected line strip
    Polyline { points: Vec<[f32; 3]>, role: LineRole },
    /// Disconnected segments, two points each
    Segments {
        segments: Vec<[[f32; 3]; 2]>,
        role: LineRole,
    },
    /// Camera-facing text
    Label {
        position: [f32; 3],
        text: String,
        role: LabelRole,
    },
}
