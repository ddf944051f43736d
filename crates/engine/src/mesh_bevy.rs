//! Conversion between [`EditMesh`] and Bevy mesh assets.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::mesh::{EditMesh, MeshError};

impl EditMesh {
    /// Build an edit mesh from a decoded Bevy mesh.
    ///
    /// The mesh must have position attributes and triangle indices. Missing
    /// normals are generated from the triangles.
    pub fn from_bevy_mesh(mesh: &Mesh) -> Result<Self, MeshError> {
        let positions: Vec<Vec3> = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attr| attr.as_float3())
            .ok_or(MeshError::NoPositions)?
            .iter()
            .map(|p| Vec3::from_array(*p))
            .collect();

        let normals: Vec<Vec3> = mesh
            .attribute(Mesh::ATTRIBUTE_NORMAL)
            .and_then(|attr| attr.as_float3())
            .map(|n| n.iter().map(|v| Vec3::from_array(*v)).collect())
            .unwrap_or_default();

        let indices: Vec<u32> = match mesh.indices() {
            Some(Indices::U16(idx)) => idx.iter().map(|&i| i as u32).collect(),
            Some(Indices::U32(idx)) => idx.to_vec(),
            None => return Err(MeshError::NoIndices),
        };

        Self::new(positions, normals, indices)
    }

    /// Convert to a Bevy mesh, including vertex colors when enabled.
    pub fn to_bevy_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions().iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals().iter().map(|n| n.to_array()).collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);

        if self.vertex_colors_enabled() {
            if let Some(colors) = self.colors() {
                let rgba: Vec<[f32; 4]> = colors.iter().map(|[r, g, b]| [*r, *g, *b, 1.0]).collect();
                mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, rgba);
            }
        }

        mesh.insert_indices(Indices::U32(self.indices().to_vec()));
        mesh
    }
}
