//! Indexed triangle mesh owned by an editing session.
//!
//! Positions and normals are parallel buffers; the index list references
//! positions three at a time. A vertex → triangle adjacency table is built on
//! construction so normal updates after a brush pass stay local.

use glam::Vec3;

use crate::types::VertexId;

/// Errors raised when a decoder hands over inconsistent buffers.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("Normal count {normals} does not match vertex count {positions}")]
    NormalCountMismatch { positions: usize, normals: usize },
    #[error("Index count {0} is not divisible by 3")]
    IndexCountNotTriangles(usize),
    #[error("Index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
    #[error("Flat {buffer} buffer length {len} is not a multiple of 3")]
    FlatBufferLength { buffer: &'static str, len: usize },
    #[error("Mesh has no position attribute")]
    NoPositions,
    #[error("Mesh has no indices")]
    NoIndices,
}

/// The single long-lived geometry resource of an editing session.
#[derive(Debug, Clone)]
pub struct EditMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    /// Per-vertex color attribute (occlusal classification)
    colors: Option<Vec<[f32; 3]>>,
    /// Material flag telling the renderer to use vertex colors
    vertex_colors_enabled: bool,
    /// Triangles incident to each vertex
    vertex_faces: Vec<Vec<u32>>,
}

impl EditMesh {
    /// Build a mesh from decoded buffers.
    ///
    /// An empty normal buffer is accepted and replaced by normals computed from
    /// the triangles; any other length mismatch is an error.
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count: positions.len(),
            });
        }

        let generate_normals = normals.is_empty() && !positions.is_empty();
        if !generate_normals && normals.len() != positions.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }

        let mut vertex_faces = vec![Vec::new(); positions.len()];
        for (tri, corners) in indices.chunks_exact(3).enumerate() {
            for &i in corners {
                let faces: &mut Vec<u32> = &mut vertex_faces[i as usize];
                if !faces.contains(&(tri as u32)) {
                    faces.push(tri as u32);
                }
            }
        }

        let vertex_count = positions.len();
        let mut mesh = Self {
            positions,
            normals: if generate_normals {
                vec![Vec3::Z; vertex_count]
            } else {
                normals
            },
            indices,
            colors: None,
            vertex_colors_enabled: false,
            vertex_faces,
        };

        if generate_normals {
            tracing::debug!("EditMesh::new: generating normals for {} vertices", vertex_count);
            mesh.recompute_normals();
        }

        Ok(mesh)
    }

    /// Build a mesh from flat `xyz` float buffers as produced by an STL decoder.
    pub fn from_flat_buffers(positions: &[f32], normals: &[f32], indices: &[u32]) -> Result<Self, MeshError> {
        let positions: &[Vec3] = bytemuck::try_cast_slice(positions).map_err(|_| {
            MeshError::FlatBufferLength {
                buffer: "position",
                len: positions.len(),
            }
        })?;
        let normals: &[Vec3] = bytemuck::try_cast_slice(normals).map_err(|_| {
            MeshError::FlatBufferLength {
                buffer: "normal",
                len: normals.len(),
            }
        })?;
        Self::new(positions.to_vec(), normals.to_vec(), indices.to_vec())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn position(&self, id: VertexId) -> Option<Vec3> {
        self.positions.get(id.index()).copied()
    }

    pub fn normal(&self, id: VertexId) -> Option<Vec3> {
        self.normals.get(id.index()).copied()
    }

    /// Iterate `(id, position)` pairs in buffer order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, Vec3)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &p)| (VertexId(i as u32), p))
    }

    /// Vertex indices of a triangle.
    pub fn triangle(&self, tri: usize) -> Option<[u32; 3]> {
        let base = tri * 3;
        self.indices
            .get(base..base + 3)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex positions of a triangle.
    pub fn triangle_positions(&self, tri: usize) -> Option<[Vec3; 3]> {
        self.triangle(tri).map(|[a, b, c]| {
            [
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            ]
        })
    }

    /// Unit normal of a triangle from its winding, zero when degenerate.
    pub fn face_normal(&self, tri: usize) -> Vec3 {
        match self.triangle_positions(tri) {
            Some([v0, v1, v2]) => (v1 - v0).cross(v2 - v0).normalize_or_zero(),
            None => Vec3::ZERO,
        }
    }

    /// Triangles incident to a vertex.
    pub fn vertex_faces(&self, id: VertexId) -> &[u32] {
        self.vertex_faces
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Copy of the position buffer for snapshot-then-write passes.
    pub fn snapshot_positions(&self) -> Vec<Vec3> {
        self.positions.clone()
    }

    /// Overwrite a single vertex position. Out-of-range ids are ignored.
    pub fn set_position(&mut self, id: VertexId, position: Vec3) {
        if let Some(slot) = self.positions.get_mut(id.index()) {
            *slot = position;
        }
    }

    /// Recompute every vertex normal from the current positions.
    pub fn recompute_normals(&mut self) {
        let face_normals: Vec<Vec3> = (0..self.triangle_count())
            .map(|tri| self.face_normal(tri))
            .collect();

        for (i, faces) in self.vertex_faces.iter().enumerate() {
            if faces.is_empty() {
                continue;
            }
            let sum: Vec3 = faces.iter().map(|&f| face_normals[f as usize]).sum();
            let averaged = sum.normalize_or_zero();
            if averaged != Vec3::ZERO {
                self.normals[i] = averaged;
            }
        }
    }

    /// Recompute normals of the given vertices only.
    ///
    /// Face normals of every incident triangle are refreshed first, then each
    /// listed vertex takes the average of its face normals. Vertices that are
    /// not listed keep their normals untouched.
    pub fn recompute_normals_for(&mut self, vertices: &[VertexId]) {
        let mut face_normals = std::collections::HashMap::new();
        for &vid in vertices {
            for &face in self.vertex_faces(vid) {
                face_normals
                    .entry(face)
                    .or_insert_with(|| self.face_normal(face as usize));
            }
        }

        for &vid in vertices {
            let sum: Vec3 = self
                .vertex_faces(vid)
                .iter()
                .filter_map(|f| face_normals.get(f))
                .copied()
                .sum();
            let averaged = sum.normalize_or_zero();
            if averaged != Vec3::ZERO {
                if let Some(normal) = self.normals.get_mut(vid.index()) {
                    *normal = averaged;
                }
            }
        }
    }

    /// Per-vertex colors, if a classification has been written.
    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        self.colors.as_deref()
    }

    pub fn vertex_colors_enabled(&self) -> bool {
        self.vertex_colors_enabled
    }

    /// Write the per-vertex color attribute and flag the material to use it.
    ///
    /// Returns false (and leaves the mesh untouched) if the buffer length does
    /// not match the vertex count.
    pub fn set_vertex_colors(&mut self, colors: Vec<[f32; 3]>) -> bool {
        if colors.len() != self.positions.len() {
            tracing::warn!(
                "set_vertex_colors: {} colors for {} vertices, ignoring",
                colors.len(),
                self.positions.len()
            );
            return false;
        }
        self.colors = Some(colors);
        self.vertex_colors_enabled = true;
        true
    }

    pub fn clear_vertex_colors(&mut self) {
        self.colors = None;
        self.vertex_colors_enabled = false;
    }

    /// Positions as a flat `xyz` float buffer for upload.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as a flat `xyz` float buffer for upload.
    pub fn normal_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Colors as a flat `rgb` float buffer for upload.
    pub fn color_buffer(&self) -> Option<&[f32]> {
        self.colors.as_deref().map(bytemuck::cast_slice)
    }
}

#[cfg(test)]
pub(crate) mod test_meshes {
    use super::*;

    /// Flat `size`×`size` grid of quads in the XY plane, spacing 1, normals +Z.
    pub fn grid(size: u32) -> EditMesh {
        let n = size + 1;
        let mut positions = Vec::new();
        for y in 0..n {
            for x in 0..n {
                positions.push(Vec3::new(x as f32, y as f32, 0.0));
            }
        }
        let mut indices = Vec::new();
        for y in 0..size {
            for x in 0..size {
                let i = y * n + x;
                indices.extend_from_slice(&[i, i + 1, i + n, i + 1, i + n + 1, i + n]);
            }
        }
        let normals = vec![Vec3::Z; positions.len()];
        EditMesh::new(positions, normals, indices).unwrap()
    }

    /// Vertices only, no triangles, normals +Z.
    pub fn points(positions: &[Vec3]) -> EditMesh {
        EditMesh::new(positions.to_vec(), vec![Vec3::Z; positions.len()], Vec::new()).unwrap()
    }
}
