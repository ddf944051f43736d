//! IPC message protocol for dentsculpt
//!
//! Defines every message exchanged between the editing engine and its
//! collaborators: the mode selector and pick dispatcher (inbound), the
//! renderer and the notification sink (outbound).

pub mod commands;
pub mod error;
pub mod messages;
pub mod types;

pub use commands::*;
pub use error::IpcError;
pub use messages::*;
pub use types::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize any protocol message to JSON.
pub fn to_json<T: Serialize>(message: &T) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

/// Parse a protocol message from JSON.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, IpcError> {
    if json.trim().is_empty() {
        return Err(IpcError::InvalidFormat("empty message".to_string()));
    }
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command_round_trip() {
        let command = RenderCommand::AddGeometry {
            handle: GeometryHandle(3),
            geometry: GeometryDesc::Label {
                position: [1.5, 0.0, 0.0],
                text: "3.00 units".to_string(),
                role: LabelRole::Measurement,
            },
        };
        let json = to_json(&command).unwrap();
        assert!(json.contains("\"type\":\"AddGeometry\""));
        let parsed: RenderCommand = from_json(&json).unwrap();
        assert_eq!(parsed, command);
    }

    #[test]
    fn test_notification_tagging() {
        let json = to_json(&Notification::OcclusalComplete {
            near_contacts: 4,
            total: 10,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"OcclusalComplete","data":{"near_contacts":4,"total":10}}"#
        );
    }

    #[test]
    fn test_empty_message_rejected() {
        let result: Result<EngineRequest, _> = from_json("   ");
        assert!(matches!(result, Err(IpcError::InvalidFormat(_))));

        let result: Result<EngineRequest, _> = from_json("{\"type\":\"Nope\"}");
        assert!(matches!(result, Err(IpcError::Serialize(_))));
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(GeometryHandle(12).to_string(), "geom#12");
    }
}
