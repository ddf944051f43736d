//! Spatial queries over the active mesh's vertex set.
//!
//! This module provides:
//! - [`neighbors_of`] / [`VertexOctree::neighbors_of`] - proximity neighbors
//!   (distance based, not edge based, so near-duplicate vertices count)
//! - [`average_of`] - centroid of a vertex set
//! - [`VertexOctree`] - octree index for brush-radius queries

use glam::Vec3;

use crate::mesh::EditMesh;
use crate::types::VertexId;

/// Relative slack added to octree candidate queries before the exact filter.
const CANDIDATE_SLACK: f32 = 1e-4;

/// Every vertex other than `vertex` strictly closer than `epsilon`, by linear scan.
///
/// Returned ids are sorted ascending. Unknown vertices have no neighbors.
pub fn neighbors_of(vertex: VertexId, mesh: &EditMesh, epsilon: f32) -> Vec<VertexId> {
    let Some(origin) = mesh.position(vertex) else {
        return Vec::new();
    };
    mesh.vertices()
        .filter(|&(id, p)| id != vertex && p.distance(origin) < epsilon)
        .map(|(id, _)| id)
        .collect()
}

/// Centroid of the given vertex positions.
///
/// Returns [`Vec3::ZERO`] for an empty set. Ids outside the mesh are skipped.
pub fn average_of(indices: &[VertexId], positions: &[Vec3]) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    for id in indices {
        if let Some(p) = positions.get(id.index()) {
            sum += *p;
            count += 1;
        }
    }
    if count == 0 {
        return Vec3::ZERO;
    }
    sum / count as f32
}

/// Configuration for octree construction.
#[derive(Debug, Clone)]
pub struct OctreeConfig {
    /// Maximum depth of the octree.
    pub max_depth: u32,
    /// Maximum items per leaf node before splitting.
    pub max_items_per_leaf: usize,
    /// Minimum node size (prevents infinite subdivision).
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_items_per_leaf: 16,
            min_node_size: 0.01,
        }
    }
}

/// A spatial octree over vertex positions.
///
/// Built from a mesh and rebuilt after every deformation pass, so it always
/// reflects the positions the next pass will read.
#[derive(Debug)]
pub struct VertexOctree {
    root: OctreeNode,
    config: OctreeConfig,
}

#[derive(Debug, Clone, Copy)]
struct OctreeItem {
    vertex_id: VertexId,
    position: Vec3,
}

#[derive(Debug)]
enum OctreeNode {
    Leaf {
        bounds: Aabb,
        items: Vec<OctreeItem>,
    },
    Internal {
        bounds: Aabb,
        children: Box<[Option<OctreeNode>; 8]>,
    },
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// Get the octant index for a point (0-7).
    fn octant_for_point(&self, point: Vec3) -> usize {
        let center = self.center();
        let mut index = 0;
        if point.x >= center.x {
            index |= 1;
        }
        if point.y >= center.y {
            index |= 2;
        }
        if point.z >= center.z {
            index |= 4;
        }
        index
    }

    /// Get the bounds for a specific octant.
    fn octant_bounds(&self, octant: usize) -> Aabb {
        let center = self.center();
        let min = Vec3::new(
            if octant & 1 != 0 { center.x } else { self.min.x },
            if octant & 2 != 0 { center.y } else { self.min.y },
            if octant & 4 != 0 { center.z } else { self.min.z },
        );
        let max = Vec3::new(
            if octant & 1 != 0 { self.max.x } else { center.x },
            if octant & 2 != 0 { self.max.y } else { center.y },
            if octant & 4 != 0 { self.max.z } else { center.z },
        );
        Aabb::new(min, max)
    }
}

impl VertexOctree {
    /// Create a new empty octree with the given bounds.
    pub fn new(bounds: Aabb) -> Self {
        Self::with_config(bounds, OctreeConfig::default())
    }

    /// Create a new octree with custom configuration.
    pub fn with_config(bounds: Aabb, config: OctreeConfig) -> Self {
        Self {
            root: OctreeNode::Leaf {
                bounds,
                items: Vec::new(),
            },
            config,
        }
    }

    /// Build an octree over every vertex of a mesh.
    pub fn from_mesh(mesh: &EditMesh) -> Self {
        Self::from_vertices(mesh.vertices())
    }

    /// Build an octree from `(id, position)` pairs.
    ///
    /// The root is a padded cube around the input so flat scans still subdivide.
    pub fn from_vertices(vertices: impl Iterator<Item = (VertexId, Vec3)>) -> Self {
        let mut bounds = Aabb::empty();
        let items: Vec<OctreeItem> = vertices
            .map(|(id, pos)| {
                bounds.include_point(pos);
                OctreeItem {
                    vertex_id: id,
                    position: pos,
                }
            })
            .collect();

        if bounds.is_empty() {
            return Self::new(Aabb::new(Vec3::ZERO, Vec3::ZERO));
        }

        let half = bounds.size().max_element() * 0.505 + 0.001;
        let center = bounds.center();
        let mut octree = Self::new(Aabb::new(center - Vec3::splat(half), center + Vec3::splat(half)));

        for item in items {
            octree.insert(item.vertex_id, item.position);
        }

        octree
    }

    /// Insert a vertex into the octree.
    pub fn insert(&mut self, vertex_id: VertexId, position: Vec3) {
        let config = self.config.clone();
        Self::insert_into_node(&mut self.root, vertex_id, position, 0, &config);
    }

    fn insert_into_node(
        node: &mut OctreeNode,
        vertex_id: VertexId,
        position: Vec3,
        depth: u32,
        config: &OctreeConfig,
    ) {
        match node {
            OctreeNode::Leaf { bounds, items } => {
                items.push(OctreeItem { vertex_id, position });

                if items.len() > config.max_items_per_leaf
                    && depth < config.max_depth
                    && bounds.size().min_element() > config.min_node_size * 2.0
                {
                    let old_items = std::mem::take(items);
                    let old_bounds = *bounds;

                    *node = OctreeNode::Internal {
                        bounds: old_bounds,
                        children: Box::new([None, None, None, None, None, None, None, None]),
                    };

                    for item in old_items {
                        Self::insert_into_node(node, item.vertex_id, item.position, depth, config);
                    }
                }
            }
            OctreeNode::Internal { bounds, children } => {
                let octant = bounds.octant_for_point(position);

                if children[octant].is_none() {
                    let child_bounds = bounds.octant_bounds(octant);
                    children[octant] = Some(OctreeNode::Leaf {
                        bounds: child_bounds,
                        items: Vec::new(),
                    });
                }

                if let Some(child) = &mut children[octant] {
                    Self::insert_into_node(child, vertex_id, position, depth + 1, config);
                }
            }
        }
    }

    /// Query all vertices within a sphere (inclusive of the boundary).
    pub fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<VertexId> {
        let mut results = Vec::new();
        Self::query_sphere_node(&self.root, center, radius, &mut results);
        results
    }

    fn query_sphere_node(node: &OctreeNode, center: Vec3, radius: f32, results: &mut Vec<VertexId>) {
        match node {
            OctreeNode::Leaf { bounds, items } => {
                if !bounds.intersects_sphere(center, radius) {
                    return;
                }

                let radius_sq = radius * radius;
                for item in items {
                    if item.position.distance_squared(center) <= radius_sq {
                        results.push(item.vertex_id);
                    }
                }
            }
            OctreeNode::Internal { bounds, children } => {
                if !bounds.intersects_sphere(center, radius) {
                    return;
                }

                for child in children.iter().flatten() {
                    Self::query_sphere_node(child, center, radius, results);
                }
            }
        }
    }

    /// Vertices strictly closer than `radius` to `center`, sorted ascending.
    ///
    /// Candidates come from a slightly padded sphere query and are then
    /// filtered with the same comparison a linear scan would use.
    pub fn within(&self, positions: &[Vec3], center: Vec3, radius: f32) -> Vec<VertexId> {
        if !(radius > 0.0) {
            return Vec::new();
        }
        let padded = radius * (1.0 + CANDIDATE_SLACK) + f32::EPSILON;
        let mut found: Vec<VertexId> = self
            .query_sphere(center, padded)
            .into_iter()
            .filter(|id| {
                positions
                    .get(id.index())
                    .is_some_and(|p| p.distance(center) < radius)
            })
            .collect();
        found.sort_unstable();
        found
    }

    /// Indexed equivalent of [`neighbors_of`]; yields the identical set.
    pub fn neighbors_of(&self, vertex: VertexId, positions: &[Vec3], epsilon: f32) -> Vec<VertexId> {
        let Some(&origin) = positions.get(vertex.index()) else {
            return Vec::new();
        };
        let mut found = self.within(positions, origin, epsilon);
        found.retain(|&id| id != vertex);
        found
    }

    /// Get the total number of items in the octree.
    pub fn len(&self) -> usize {
        Self::count_items(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn count_items(node: &OctreeNode) -> usize {
        match node {
            OctreeNode::Leaf { items, .. } => items.len(),
            OctreeNode::Internal { children, .. } => children.iter().flatten().map(Self::count_items).sum(),
        }
    }
}
