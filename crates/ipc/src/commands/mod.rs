//! Inbound command types: tool modes and requests from the UI and pick dispatcher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IpcError;

/// Tool mode supplied by the mode selector.
///
/// The engine dispatches purely on this value plus the incoming pick point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Camera only, picks do nothing
    #[default]
    View,
    /// Report the picked surface point
    Pick,
    /// Two-point distance measurement
    Measure,
    /// Push vertices along their normals
    Push,
    /// Relax vertices toward their neighbors
    Smooth,
    /// Expand vertices away from the pick point
    Scale,
    /// Trace a margin line
    Margin,
    /// Occlusal proximity coloring
    Occlusal,
    /// Cross-section clip plane
    Section,
    /// Text annotation
    Note,
}

impl ToolMode {
    /// All modes in selector order.
    pub const ALL: [ToolMode; 10] = [
        ToolMode::View,
        ToolMode::Pick,
        ToolMode::Measure,
        ToolMode::Push,
        ToolMode::Smooth,
        ToolMode::Scale,
        ToolMode::Margin,
        ToolMode::Occlusal,
        ToolMode::Section,
        ToolMode::Note,
    ];

    /// Lowercase identifier used by the mode selector.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolMode::View => "view",
            ToolMode::Pick => "pick",
            ToolMode::Measure => "measure",
            ToolMode::Push => "push",
            ToolMode::Smooth => "smooth",
            ToolMode::Scale => "scale",
            ToolMode::Margin => "margin",
            ToolMode::Occlusal => "occlusal",
            ToolMode::Section => "section",
            ToolMode::Note => "note",
        }
    }

    /// Whether the mode deforms the mesh.
    pub fn is_brush(self) -> bool {
        matches!(self, ToolMode::Push | ToolMode::Smooth | ToolMode::Scale)
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolMode {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| IpcError::UnknownToolMode(s.to_string()))
    }
}

/// A resolved surface hit forwarded by the pick dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickPayload {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub triangle: u32,
}

/// Brush settings chosen in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub radius: f32,
    pub strength: f32,
}

/// Requests from collaborators to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineRequest {
    /// Mode selector changed the active tool
    SetMode(ToolMode),
    /// Brush radius/strength changed
    SetBrush(BrushSettings),
    /// A pick resolved to a surface point; `text` carries note content
    Pick {
        pick: PickPayload,
        text: Option<String>,
    },
    /// Cross-section slider moved
    SetSectionOffset { offset: f32 },
    /// Discard the current margin line
    ClearMargin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_mode_parse() {
        for mode in ToolMode::ALL {
            assert_eq!(mode.as_str().parse::<ToolMode>().unwrap(), mode);
        }
        assert!(matches!(
            "sculpt".parse::<ToolMode>(),
            Err(IpcError::UnknownToolMode(_))
        ));
    }

    #[test]
    fn test_tool_mode_serde_lowercase() {
        let json = serde_json::to_string(&ToolMode::Occlusal).unwrap();
        assert_eq!(json, "\"occlusal\"");
        let mode: ToolMode = serde_json::from_str("\"section\"").unwrap();
        assert_eq!(mode, ToolMode::Section);
    }

    #[test]
    fn test_brush_modes() {
        let brushes: Vec<_> = ToolMode::ALL.into_iter().filter(|m| m.is_brush()).collect();
        assert_eq!(brushes, vec![ToolMode::Push, ToolMode::Smooth, ToolMode::Scale]);
    }

    #[test]
    fn test_pick_request_json() {
        let json = r#"{"type":"Pick","data":{"pick":{"position":[1.0,2.0,3.0],"normal":[0.0,0.0,1.0],"triangle":7},"text":null}}"#;
        let request: EngineRequest = serde_json::from_str(json).unwrap();
        match request {
            EngineRequest::Pick { pick, text } => {
                assert_eq!(pick.position, [1.0, 2.0, 3.0]);
                assert_eq!(pick.triangle, 7);
                assert!(text.is_none());
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }
}
