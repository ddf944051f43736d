//! Editing session: owns the mesh and every piece of tool state, and
//! dispatches picks to the active tool.
//!
//! All output is queued. Collaborators drain render commands and
//! notifications after each call.

use tracing::{debug, info, warn};

use dentsculpt_config::EngineConfig;
use dentsculpt_ipc::{EngineRequest, IpcError, Notification, RenderCommand, ToolMode};

use crate::brush::BrushParams;
use crate::deformation::{DeformationResult, deform};
use crate::mesh::EditMesh;
use crate::registry::GeometryRegistry;
use crate::spatial::VertexOctree;
use crate::tools::{
    CrossSection, MarginLine, MeasureOutcome, MeasureTool, Notes, Plane, classify_occlusion,
};
use crate::types::{DeformationType, PickPoint};

/// Per-call tool inputs beyond the pick point.
#[derive(Debug, Clone, Default)]
pub struct ToolParams {
    pub brush: BrushParams,
    /// Note content for note mode
    pub note_text: Option<String>,
}

/// What [`EditSession::apply_tool`] did.
#[derive(Debug)]
pub enum ToolOutcome {
    /// No mesh, view mode, or nothing to do
    Ignored,
    Picked(PickPoint),
    Deformed(DeformationResult),
    MarginUpdated { point_count: usize, length: f32 },
    Occlusal { near_contacts: usize, total: usize },
    SectionCreated { plane: Plane, outline_segments: usize },
    Measure(MeasureOutcome),
    NoteAdded(usize),
}

/// The editing engine for one loaded mesh at a time.
pub struct EditSession {
    config: EngineConfig,
    mesh: Option<EditMesh>,
    octree: Option<VertexOctree>,
    registry: GeometryRegistry,
    margin: MarginLine,
    measure: MeasureTool,
    section: CrossSection,
    notes: Notes,
    mode: ToolMode,
    brush: BrushParams,
    notifications: Vec<Notification>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EditSession {
    pub fn new(config: EngineConfig) -> Self {
        let brush = BrushParams::from(config.brush);
        Self {
            config,
            mesh: None,
            octree: None,
            registry: GeometryRegistry::new(),
            margin: MarginLine::new(),
            measure: MeasureTool::new(),
            section: CrossSection::new(),
            notes: Notes::new(),
            mode: ToolMode::default(),
            brush,
            notifications: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mesh(&self) -> Option<&EditMesh> {
        self.mesh.as_ref()
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    pub fn margin(&self) -> &MarginLine {
        &self.margin
    }

    pub fn measure(&self) -> &MeasureTool {
        &self.measure
    }

    pub fn section(&self) -> &CrossSection {
        &self.section
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn brush(&self) -> BrushParams {
        self.brush
    }

    /// Replace the mesh and invalidate everything derived from the old one.
    pub fn load_mesh(&mut self, mesh: EditMesh) {
        self.section.clear(&mut self.registry);
        self.measure.reset(&mut self.registry);
        self.margin.clear(&mut self.registry);
        self.notes.clear();
        self.registry.clear();

        if self.mesh.as_ref().is_some_and(EditMesh::vertex_colors_enabled) {
            self.registry.push_command(RenderCommand::ClearVertexColors);
        }

        self.octree = Some(VertexOctree::from_mesh(&mesh));
        self.notifications.push(Notification::MeshLoaded {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
        });
        info!(
            "Loaded mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.mesh = Some(mesh);
    }

    /// Switch the active tool. Leaving section mode removes the clip plane.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode == self.mode {
            return;
        }
        if self.mode == ToolMode::Section {
            self.section.clear(&mut self.registry);
        }
        debug!("mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.notifications.push(Notification::ModeChanged { mode });
    }

    /// Set the brush used for picks that arrive through [`EditSession::handle_request`].
    pub fn set_brush(&mut self, brush: BrushParams) {
        if !brush.is_valid() {
            warn!(
                "set_brush: radius {} strength {} out of range, ignoring",
                brush.radius, brush.strength
            );
            return;
        }
        self.brush = brush;
    }

    /// Dispatch a resolved pick to the tool for `mode`.
    ///
    /// `mode` becomes the active mode first, so switching tools through a pick
    /// has the same side effects as [`EditSession::set_mode`]. Brush picks with
    /// a radius or strength that [`EditSession::set_brush`] would reject are
    /// ignored.
    pub fn apply_tool(&mut self, mode: ToolMode, pick: &PickPoint, params: &ToolParams) -> ToolOutcome {
        if self.mesh.is_none() {
            debug!("apply_tool: no mesh loaded, ignoring {}", mode);
            return ToolOutcome::Ignored;
        }
        if mode.is_brush() && !params.brush.is_valid() {
            warn!(
                "apply_tool: {} brush radius {} strength {} out of range, ignoring",
                mode, params.brush.radius, params.brush.strength
            );
            return ToolOutcome::Ignored;
        }
        self.set_mode(mode);

        let Some(mesh) = self.mesh.as_mut() else {
            return ToolOutcome::Ignored;
        };

        match mode {
            ToolMode::View => ToolOutcome::Ignored,

            ToolMode::Pick => {
                self.notifications.push(Notification::PointPicked {
                    position: pick.position.to_array(),
                    normal: pick.normal.to_array(),
                    triangle: pick.triangle,
                });
                ToolOutcome::Picked(*pick)
            }

            ToolMode::Push | ToolMode::Smooth | ToolMode::Scale => {
                let (Some(kind), Some(octree)) = (DeformationType::from_mode(mode), self.octree.as_ref()) else {
                    return ToolOutcome::Ignored;
                };
                let result = deform(
                    mesh,
                    octree,
                    pick.position,
                    kind,
                    &params.brush,
                    self.config.spatial.neighbor_epsilon,
                );

                if !result.is_empty() {
                    self.octree = Some(VertexOctree::from_mesh(mesh));
                    self.registry.push_command(RenderCommand::UpdateMeshBuffers {
                        positions: mesh.position_buffer().to_vec(),
                        normals: mesh.normal_buffer().to_vec(),
                    });
                }
                self.notifications.push(Notification::DeformApplied {
                    mode: kind.mode(),
                    vertices_modified: result.modified_vertices.len(),
                });
                ToolOutcome::Deformed(result)
            }

            ToolMode::Margin => {
                self.margin.add_point(pick.position, &mut self.registry);
                let point_count = self.margin.len();
                let length = self.margin.length();
                self.notifications
                    .push(Notification::MarginUpdated { point_count, length });
                ToolOutcome::MarginUpdated { point_count, length }
            }

            ToolMode::Occlusal => {
                let near_contacts = classify_occlusion(mesh, pick.position, &self.config.occlusal);
                let total = mesh.vertex_count();
                self.registry.push_command(RenderCommand::SetVertexColors {
                    colors: mesh.colors().map(<[_]>::to_vec).unwrap_or_default(),
                    enabled: mesh.vertex_colors_enabled(),
                });
                self.notifications.push(Notification::OcclusalComplete {
                    near_contacts,
                    total,
                });
                ToolOutcome::Occlusal { near_contacts, total }
            }

            ToolMode::Section => {
                let Some((plane, outline_segments)) =
                    self.section
                        .create_section(pick.position, pick.normal, mesh, &mut self.registry)
                else {
                    return ToolOutcome::Ignored;
                };
                self.notifications.push(Notification::SectionCreated {
                    normal: plane.normal.to_array(),
                    constant: plane.constant,
                    outline_segments,
                });
                ToolOutcome::SectionCreated {
                    plane,
                    outline_segments,
                }
            }

            ToolMode::Measure => {
                let outcome = self
                    .measure
                    .record_point(pick.position, &mut self.registry, &self.config.measure);
                let notification = match &outcome {
                    MeasureOutcome::Armed { point } => Notification::MeasurementStarted {
                        position: point.to_array(),
                    },
                    MeasureOutcome::Complete(m) => Notification::MeasurementComplete {
                        distance: m.distance,
                        label: m.label.clone(),
                    },
                };
                self.notifications.push(notification);
                ToolOutcome::Measure(outcome)
            }

            ToolMode::Note => {
                let Some(index) =
                    self.notes
                        .add_note(pick.position, params.note_text.as_deref(), &mut self.registry)
                else {
                    return ToolOutcome::Ignored;
                };
                self.notifications.push(Notification::NoteAdded {
                    index,
                    text: self.notes.as_slice()[index].text.clone(),
                });
                ToolOutcome::NoteAdded(index)
            }
        }
    }

    /// Dispatch a pick to the active mode with the session brush.
    pub fn apply(&mut self, pick: &PickPoint, note_text: Option<String>) -> ToolOutcome {
        let params = ToolParams {
            brush: self.brush,
            note_text,
        };
        self.apply_tool(self.mode, pick, &params)
    }

    /// Move the active cross-section. Returns the applied offset and plane constant.
    pub fn set_section_offset(&mut self, value: f32) -> Option<(f32, f32)> {
        let mesh = self.mesh.as_ref()?;
        let (offset, constant) = self
            .section
            .set_offset(value, &self.config.section, mesh, &mut self.registry)?;
        self.notifications
            .push(Notification::SectionOffsetChanged { offset, constant });
        Some((offset, constant))
    }

    /// Discard the traced margin line.
    pub fn clear_margin(&mut self) {
        self.margin.clear(&mut self.registry);
    }

    /// Apply a collaborator request. Picks return the tool outcome.
    pub fn handle_request(&mut self, request: EngineRequest) -> Option<ToolOutcome> {
        match request {
            EngineRequest::SetMode(mode) => self.set_mode(mode),
            EngineRequest::SetBrush(settings) => self.set_brush(BrushParams::from(settings)),
            EngineRequest::Pick { pick, text } => return Some(self.apply(&PickPoint::from(pick), text)),
            EngineRequest::SetSectionOffset { offset } => {
                self.set_section_offset(offset);
            }
            EngineRequest::ClearMargin => self.clear_margin(),
        }
        None
    }

    /// Parse and apply a JSON-encoded [`EngineRequest`].
    pub fn handle_json(&mut self, json: &str) -> Result<Option<ToolOutcome>, IpcError> {
        let request: EngineRequest = dentsculpt_ipc::from_json(json)?;
        Ok(self.handle_request(request))
    }

    /// Render commands queued since the last drain, in order.
    pub fn drain_render_commands(&mut self) -> Vec<RenderCommand> {
        self.registry.drain_commands()
    }

    /// Notifications queued since the last drain, in order.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
