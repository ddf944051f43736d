//! Outbound message enums: render commands and user notifications.

use serde::{Deserialize, Serialize};

use crate::commands::ToolMode;
use crate::types::{GeometryDesc, GeometryHandle};

/// Instructions for the rendering collaborator.
///
/// The engine never issues draw calls; it only describes what should be shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RenderCommand {
    /// Show a new piece of auxiliary geometry
    AddGeometry {
        handle: GeometryHandle,
        geometry: GeometryDesc,
    },

    /// Hide and forget a piece of auxiliary geometry
    RemoveGeometry { handle: GeometryHandle },

    /// Replace the per-vertex color attribute and toggle vertex coloring
    SetVertexColors {
        colors: Vec<[f32; 3]>,
        enabled: bool,
    },

    /// Drop the per-vertex color attribute
    ClearVertexColors,

    /// Clip mesh geometry against a plane `normal · x + constant = 0`,
    /// discarding the side where `normal · x + constant > 0`
    SetClipPlane { normal: [f32; 3], constant: f32 },

    /// Remove the active clip plane
    ClearClipPlane,

    /// Vertex buffers changed after deformation (flat xyz triples)
    UpdateMeshBuffers {
        positions: Vec<f32>,
        normals: Vec<f32>,
    },
}

/// Discrete events for the notification sink.
///
/// The engine does not format or render these itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Notification {
    /// A new mesh replaced the previous one
    MeshLoaded {
        vertex_count: usize,
        triangle_count: usize,
    },

    /// The active tool changed
    ModeChanged { mode: ToolMode },

    /// A point was picked in pick mode
    PointPicked {
        position: [f32; 3],
        normal: [f32; 3],
        triangle: u32,
    },

    /// First measurement point captured
    MeasurementStarted { position: [f32; 3] },

    /// Second measurement point captured
    MeasurementComplete { distance: f32, label: String },

    /// A brush pass finished
    DeformApplied {
        mode: ToolMode,
        vertices_modified: usize,
    },

    /// A margin point was appended
    MarginUpdated { point_count: usize, length: f32 },

    /// Occlusal coloring finished
    OcclusalComplete { near_contacts: usize, total: usize },

    /// A clip plane was created
    SectionCreated {
        normal: [f32; 3],
        constant: f32,
        outline_segments: usize,
    },

    /// The clip plane moved
    SectionOffsetChanged { offset: f32, constant: f32 },

    /// A note was attached
    NoteAdded { index: usize, text: String },
}
