//! Mesh editing and measurement engine for dentsculpt.
//!
//! This crate owns a scanned dental arch as an indexed triangle mesh and
//! applies single-pick tool operations to it:
//! - Brush deformation (Push, Smooth, Scale) with linear falloff
//! - Margin-line tracing and occlusal proximity coloring
//! - Plane cross-sections driven by a scalar offset
//! - Two-point measurement and text notes
//!
//! # Architecture
//!
//! An external pick dispatcher resolves screen input to a [`PickPoint`] (the
//! ray semantics live in [`raycast`]) and hands it to [`EditSession`] along
//! with the active [`ToolMode`](dentsculpt_ipc::ToolMode). The session
//! mutates the mesh in place or records auxiliary geometry, and queues
//! render commands and notifications for collaborators to drain.
//!
//! ## Key Components
//!
//! - **Mesh**: Position/normal/index buffers with vertex adjacency
//! - **Spatial**: Octree radius queries and proximity neighbors
//! - **Deformation**: Snapshot-then-write brush passes
//! - **Tools**: Margin, occlusal, section, measure, notes
//! - **Registry**: Handle-keyed auxiliary geometry
//! - **Session**: Mode dispatch and state invalidation

pub mod brush;
pub mod deformation;
pub mod mesh;
#[cfg(feature = "bevy")]
mod mesh_bevy;
pub mod raycast;
pub mod registry;
pub mod session;
pub mod spatial;
pub mod tools;
pub mod types;

pub use brush::BrushParams;
pub use deformation::{DeformationResult, deform};
pub use mesh::{EditMesh, MeshError};
pub use raycast::pick;
pub use registry::GeometryRegistry;
pub use session::{EditSession, ToolOutcome, ToolParams};
pub use spatial::{VertexOctree, average_of, neighbors_of};
pub use types::{DeformationType, PickPoint, VertexId};
