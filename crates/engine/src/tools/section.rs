//! Cross-section clip plane and outline.
//!
//! The engine owns only the plane definition; the renderer clips. Whenever the
//! plane changes the plane/mesh intersection is recomputed and shown as a set
//! of outline segments.

use glam::Vec3;
use tracing::{debug, warn};

use dentsculpt_config::SectionConfig;
use dentsculpt_ipc::{GeometryDesc, GeometryHandle, LineRole, RenderCommand};

use crate::mesh::EditMesh;
use crate::registry::GeometryRegistry;

/// Plane `normal · x + constant = 0` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// Plane through `point`. `None` when `normal` has no direction.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Option<Self> {
        let normal = normal.normalize_or_zero();
        if normal == Vec3::ZERO {
            return None;
        }
        Some(Self {
            normal,
            constant: -normal.dot(point),
        })
    }

    /// Signed distance, positive on the side the normal points to.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    fn edge_crossing(&self, a: Vec3, b: Vec3) -> Option<Vec3> {
        let d_a = self.distance_to_point(a);
        let d_b = self.distance_to_point(b);
        // Half-open sides so a vertex on the plane counts once
        if (d_a >= 0.0) == (d_b >= 0.0) {
            return None;
        }
        let t = d_a / (d_a - d_b);
        Some(a + (b - a) * t)
    }
}

/// Segments where the plane cuts the mesh surface, one per crossed triangle.
pub fn contour(mesh: &EditMesh, plane: &Plane) -> Vec<[Vec3; 2]> {
    let mut segments = Vec::new();
    for tri in 0..mesh.triangle_count() {
        let Some([v0, v1, v2]) = mesh.triangle_positions(tri) else {
            continue;
        };
        let crossings: Vec<Vec3> = [(v0, v1), (v1, v2), (v2, v0)]
            .into_iter()
            .filter_map(|(a, b)| plane.edge_crossing(a, b))
            .collect();
        if let [a, b] = crossings[..] {
            segments.push([a, b]);
        }
    }
    segments
}

/// Section tool state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SectionState {
    #[default]
    Inactive,
    Active {
        plane: Plane,
        /// Pick point the plane was created through
        origin: Vec3,
        offset: f32,
    },
}

/// Cross-section tool: plane state plus the outline shown for it.
#[derive(Debug, Default)]
pub struct CrossSection {
    state: SectionState,
    outline: Option<GeometryHandle>,
}

impl CrossSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SectionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SectionState::Active { .. })
    }

    pub fn plane(&self) -> Option<Plane> {
        match self.state {
            SectionState::Active { plane, .. } => Some(plane),
            SectionState::Inactive => None,
        }
    }

    pub fn offset(&self) -> Option<f32> {
        match self.state {
            SectionState::Active { offset, .. } => Some(offset),
            SectionState::Inactive => None,
        }
    }

    pub fn outline(&self) -> Option<GeometryHandle> {
        self.outline
    }

    /// Create a plane through `point`, replacing any existing one.
    ///
    /// Returns the new plane and the number of outline segments, or `None`
    /// when `normal` is zero.
    pub fn create_section(
        &mut self,
        point: Vec3,
        normal: Vec3,
        mesh: &EditMesh,
        registry: &mut GeometryRegistry,
    ) -> Option<(Plane, usize)> {
        let Some(plane) = Plane::from_normal_and_point(normal, point) else {
            warn!("create_section: zero normal at {:?}, ignoring", point);
            return None;
        };
        self.state = SectionState::Active {
            plane,
            origin: point,
            offset: 0.0,
        };
        let segments = self.apply_plane(plane, mesh, registry);
        debug!("section: created {:?} with {} outline segments", plane, segments);
        Some((plane, segments))
    }

    /// Move the active plane so its constant becomes `-offset`.
    ///
    /// The offset is clamped into the configured range. Returns the applied
    /// offset and plane constant; no-op without an active section.
    pub fn set_offset(
        &mut self,
        value: f32,
        config: &SectionConfig,
        mesh: &EditMesh,
        registry: &mut GeometryRegistry,
    ) -> Option<(f32, f32)> {
        let SectionState::Active { plane, origin, .. } = self.state else {
            return None;
        };
        let offset = config.clamp_offset(value);
        if offset != value {
            warn!("set_offset: {} clamped to {}", value, offset);
        }
        let plane = Plane {
            normal: plane.normal,
            constant: -offset,
        };
        self.state = SectionState::Active { plane, origin, offset };
        self.apply_plane(plane, mesh, registry);
        debug!("section: offset {} constant {}", offset, plane.constant);
        Some((offset, plane.constant))
    }

    /// Drop the plane and its outline. Queues a clear only if a plane existed.
    pub fn clear(&mut self, registry: &mut GeometryRegistry) {
        if let Some(outline) = self.outline.take() {
            registry.remove(outline);
        }
        if self.is_active() {
            registry.push_command(RenderCommand::ClearClipPlane);
        }
        self.state = SectionState::Inactive;
    }

    /// Send the clip plane and redraw the outline. Returns the segment count.
    fn apply_plane(&mut self, plane: Plane, mesh: &EditMesh, registry: &mut GeometryRegistry) -> usize {
        registry.push_command(RenderCommand::SetClipPlane {
            normal: plane.normal.to_array(),
            constant: plane.constant,
        });

        if let Some(old) = self.outline.take() {
            registry.remove(old);
        }
        let segments = contour(mesh, &plane);
        let count = segments.len();
        if count > 0 {
            self.outline = Some(registry.insert(GeometryDesc::Segments {
                segments: segments
                    .iter()
                    .map(|[a, b]| [a.to_array(), b.to_array()])
                    .collect(),
                role: LineRole::SectionOutline,
            }));
        }
        count
    }
}
