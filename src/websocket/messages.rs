//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! the dashboard page and the server.

use serde::{Deserialize, Serialize};

use crate::binder::BindError;
use crate::dispatch::{ChartRegion, ControlId, EventKind, Figure, RegionUpdate, Selection};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// An input control changed value
    InputChanged {
        /// Control that fired (e.g. "selected-year")
        control: ControlId,
        /// New control value
        value: String,
        /// Event kind, "change" when omitted
        #[serde(default)]
        event: EventKind,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
        /// Selection the session starts from
        selection: Selection,
    },
    /// Redraw a chart region
    Figure {
        target: ChartRegion,
        figure: Figure,
    },
    /// A selection or a region could not be resolved
    Error {
        /// Region that failed, absent for message-level errors
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<ChartRegion>,
        code: String,
        message: String,
    },
    /// Pong response to ping
    Pong,
}

impl ServerMessage {
    /// Message-level error not tied to a region
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            target: None,
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bind_error(target: Option<ChartRegion>, err: &BindError) -> Self {
        ServerMessage::Error {
            target,
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<RegionUpdate> for ServerMessage {
    fn from(update: RegionUpdate) -> Self {
        match update.result {
            Ok(figure) => ServerMessage::Figure {
                target: update.region,
                figure,
            },
            Err(err) => ServerMessage::bind_error(Some(update.region), &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Dimension;
    use crate::data::FlowType;

    #[test]
    fn test_client_message_deserialize_input_changed() {
        let json = r#"{"type": "input_changed", "control": "selected-year", "value": "2016"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::InputChanged {
                control,
                value,
                event,
            } => {
                assert_eq!(control, ControlId::SelectedYear);
                assert_eq!(value, "2016");
                assert_eq!(event, EventKind::Change);
            }
            _ => panic!("Expected InputChanged"),
        }
    }

    #[test]
    fn test_client_message_unknown_control() {
        let json = r#"{"type": "input_changed", "control": "selected-color", "value": "red"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
            selection: Selection::new("2017", FlowType::Export, "RU"),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["connection_id"], "abc-123");
        assert_eq!(json["selection"]["flow"], "EXPORT");
    }

    #[test]
    fn test_region_error_message() {
        let update = RegionUpdate {
            region: ChartRegion::Slopechart,
            result: Err(BindError::invalid(Dimension::Partner, "XX")),
        };
        let json = serde_json::to_value(ServerMessage::from(update)).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["target"], "slopechart");
        assert_eq!(json["code"], "INVALID_SELECTION");
    }

    #[test]
    fn test_message_error_omits_target() {
        let json = serde_json::to_value(ServerMessage::error("BAD_MESSAGE", "nope")).unwrap();
        assert!(json.get("target").is_none());
    }
}
