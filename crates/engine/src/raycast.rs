//! Ray–mesh intersection semantics for picking.
//!
//! The pick dispatcher owns the camera and turns screen coordinates into a
//! ray; this module resolves that ray against the mesh using Möller–Trumbore
//! and reports the nearest hit.

use glam::Vec3;

use crate::mesh::EditMesh;
use crate::types::PickPoint;

/// Epsilon for floating point comparisons in ray intersection
const EPSILON: f32 = 1e-6;

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Two-sided: scans are not guaranteed to have consistent winding. Hits
/// behind the ray origin are rejected.
pub fn ray_triangle_intersection(ray_origin: Vec3, ray_dir: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray parallel to the triangle plane
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray_origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Interpolate a Vec3 attribute using barycentric coordinates.
pub fn interpolate_vec3(v0: Vec3, v1: Vec3, v2: Vec3, u: f32, v: f32) -> Vec3 {
    let w = 1.0 - u - v;
    v0 * w + v1 * u + v2 * v
}

/// Cast a ray against the mesh and return the closest hit.
///
/// `None` means the ray missed every triangle; the session performs no
/// operation for that interaction.
pub fn pick(mesh: &EditMesh, ray_origin: Vec3, ray_dir: Vec3) -> Option<PickPoint> {
    let ray_dir = ray_dir.normalize_or_zero();
    if ray_dir == Vec3::ZERO {
        return None;
    }

    let mut closest: Option<(TriangleHit, usize)> = None;
    for tri in 0..mesh.triangle_count() {
        let Some([v0, v1, v2]) = mesh.triangle_positions(tri) else {
            continue;
        };
        if let Some(hit) = ray_triangle_intersection(ray_origin, ray_dir, v0, v1, v2) {
            if closest.is_none_or(|(prev, _)| hit.t < prev.t) {
                closest = Some((hit, tri));
            }
        }
    }

    let (hit, tri) = closest?;
    let [i0, i1, i2] = mesh.triangle(tri)?;
    let normals = mesh.normals();
    let interpolated = interpolate_vec3(
        normals[i0 as usize],
        normals[i1 as usize],
        normals[i2 as usize],
        hit.u,
        hit.v,
    )
    .normalize_or_zero();
    let normal = if interpolated == Vec3::ZERO {
        mesh.face_normal(tri)
    } else {
        interpolated
    };

    Some(PickPoint::new(ray_origin + ray_dir * hit.t, normal, tri as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::test_meshes::grid;

    #[test]
    fn test_ray_triangle_hit() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);

        let hit = ray_triangle_intersection(Vec3::new(0.25, 0.25, 1.0), Vec3::NEG_Z, v0, v1, v2).unwrap();
        assert!((hit.t - 1.0).abs() < EPSILON);
        assert!((hit.u - 0.25).abs() < EPSILON);
        assert!((hit.v - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_ray_triangle_miss_and_behind() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);

        assert!(ray_triangle_intersection(Vec3::new(2.0, 2.0, 1.0), Vec3::NEG_Z, v0, v1, v2).is_none());
        assert!(ray_triangle_intersection(Vec3::new(0.25, 0.25, 1.0), Vec3::Z, v0, v1, v2).is_none());
    }

    #[test]
    fn test_pick_nearest_surface() {
        let mesh = grid(4);
        let hit = pick(&mesh, Vec3::new(1.3, 2.6, 5.0), Vec3::new(0.0, 0.0, -2.0)).unwrap();
        assert!((hit.position - Vec3::new(1.3, 2.6, 0.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        let [a, b, c] = mesh.triangle_positions(hit.triangle as usize).unwrap();
        let (min, max) = (a.min(b).min(c), a.max(b).max(c));
        assert!(min.x <= 1.3 && max.x >= 1.3 && min.y <= 2.6 && max.y >= 2.6);
    }

    #[test]
    fn test_pick_miss() {
        let mesh = grid(2);
        assert!(pick(&mesh, Vec3::new(10.0, 10.0, 5.0), Vec3::NEG_Z).is_none());
        assert!(pick(&mesh, Vec3::new(1.0, 1.0, 5.0), Vec3::ZERO).is_none());
    }
}
