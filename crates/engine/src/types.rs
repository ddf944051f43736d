//! Core engine types.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use dentsculpt_ipc::{PickPayload, ToolMode};

/// Type-safe vertex identifier (index into the position buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type of brush deformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeformationType {
    /// Displace vertices along their surface normal
    #[default]
    Push = 0,
    /// Relax vertices toward the centroid of their proximity neighbors
    Smooth = 1,
    /// Expand vertices away from the brush center
    Scale = 2,
}

impl DeformationType {
    /// Brush deformation for a tool mode, if the mode is a brush.
    pub fn from_mode(mode: ToolMode) -> Option<Self> {
        match mode {
            ToolMode::Push => Some(Self::Push),
            ToolMode::Smooth => Some(Self::Smooth),
            ToolMode::Scale => Some(Self::Scale),
            _ => None,
        }
    }

    pub fn mode(self) -> ToolMode {
        match self {
            Self::Push => ToolMode::Push,
            Self::Smooth => ToolMode::Smooth,
            Self::Scale => ToolMode::Scale,
        }
    }
}

/// A surface point resolved from a 2D input via ray intersection.
///
/// Ephemeral: produced per interaction and never retained by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickPoint {
    /// Hit position in mesh-local space
    pub position: Vec3,
    /// Surface normal at the hit
    pub normal: Vec3,
    /// Triangle the hit lies on
    pub triangle: u32,
}

impl PickPoint {
    pub fn new(position: Vec3, normal: Vec3, triangle: u32) -> Self {
        Self {
            position,
            normal,
            triangle,
        }
    }

    /// Pick with no meaningful normal or triangle, for tools that only need a position.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::Z, 0)
    }
}

impl From<PickPayload> for PickPoint {
    fn from(payload: PickPayload) -> Self {
        Self::new(
            Vec3::from_array(payload.position),
            Vec3::from_array(payload.normal),
            payload.triangle,
        )
    }
}
