//! Vertex deformation algorithms for sculpting.
//!
//! Every pass reads from a duplicated position buffer taken at call time and
//! writes only after all targets are known, so the result does not depend on
//! the order vertices are visited in.

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, trace};

use crate::brush::BrushParams;
use crate::mesh::EditMesh;
use crate::spatial::{VertexOctree, average_of};
use crate::types::{DeformationType, VertexId};

/// Result of one brush pass.
#[derive(Debug, Default)]
pub struct DeformationResult {
    /// Vertices whose position changed, ascending
    pub modified_vertices: Vec<VertexId>,
    /// Positions before the pass (for undo)
    pub original_positions: HashMap<VertexId, Vec3>,
}

impl DeformationResult {
    pub fn is_empty(&self) -> bool {
        self.modified_vertices.is_empty()
    }
}

/// Read-only inputs shared by every vertex in a pass.
struct PassContext<'a> {
    snapshot: &'a [Vec3],
    normals: &'a [Vec3],
    octree: &'a VertexOctree,
    center: Vec3,
    neighbor_epsilon: f32,
}

/// Move along the pre-deformation normal.
fn push_target(position: Vec3, normal: Vec3, factor: f32) -> Vec3 {
    position + normal.normalize_or_zero() * factor
}

/// Interpolate toward the centroid of proximity neighbors.
///
/// Returns `None` for a vertex with no neighbors inside epsilon.
fn smooth_target(ctx: &PassContext<'_>, vertex: VertexId, position: Vec3, factor: f32) -> Option<Vec3> {
    let neighbors = ctx.octree.neighbors_of(vertex, ctx.snapshot, ctx.neighbor_epsilon);
    // The centroid of an empty set is the origin; lerping toward it would
    // drag isolated vertices across the scene.
    if neighbors.is_empty() {
        return None;
    }
    let centroid = average_of(&neighbors, ctx.snapshot);
    Some(position.lerp(centroid, factor))
}

/// Scale the offset from the brush center.
fn scale_target(position: Vec3, center: Vec3, factor: f32) -> Vec3 {
    center + (position - center) * (1.0 + factor)
}

/// Apply one brush pass centered on `center`.
///
/// Vertices strictly inside `brush.radius` are displaced by
/// `brush.strength × influence`; everything else keeps bit-identical
/// positions and normals. Normals of displaced vertices are recomputed from
/// the updated positions afterward.
pub fn deform(
    mesh: &mut EditMesh,
    octree: &VertexOctree,
    center: Vec3,
    deformation_type: DeformationType,
    brush: &BrushParams,
    neighbor_epsilon: f32,
) -> DeformationResult {
    if mesh.is_empty() || !(brush.radius > 0.0) {
        return DeformationResult::default();
    }

    let snapshot = mesh.snapshot_positions();
    let normals = mesh.normals().to_vec();
    let ctx = PassContext {
        snapshot: &snapshot,
        normals: &normals,
        octree,
        center,
        neighbor_epsilon,
    };

    let affected = octree.within(&snapshot, center, brush.radius);
    let mut targets: Vec<(VertexId, Vec3)> = Vec::with_capacity(affected.len());

    for vertex in affected {
        let position = snapshot[vertex.index()];
        let Some(influence) = brush.influence(position.distance(center)) else {
            continue;
        };
        let factor = brush.strength * influence;
        if factor == 0.0 {
            continue;
        }

        let target = match deformation_type {
            DeformationType::Push => Some(push_target(position, ctx.normals[vertex.index()], factor)),
            DeformationType::Smooth => smooth_target(&ctx, vertex, position, factor),
            DeformationType::Scale => Some(scale_target(position, ctx.center, factor)),
        };

        if let Some(target) = target.filter(|t| *t != position) {
            trace!("deform: {:?} {:?} -> {:?}", vertex, position, target);
            targets.push((vertex, target));
        }
    }

    let mut result = DeformationResult::default();
    for (vertex, target) in targets {
        result.original_positions.insert(vertex, snapshot[vertex.index()]);
        result.modified_vertices.push(vertex);
        mesh.set_position(vertex, target);
    }
    mesh.recompute_normals_for(&result.modified_vertices);

    debug!(
        "deform: {:?} at {:?} r={} s={} modified {} vertices",
        deformation_type,
        center,
        brush.radius,
        brush.strength,
        result.modified_vertices.len()
    );

    result
}
