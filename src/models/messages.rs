use serde::{Deserialize, Serialize};

use crate::view::DisplayState;

/// Message sent from the browser board to the session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A piece is about to be dragged
    Pickup { square: String, piece: String },
    /// A piece was dropped on a square
    Drop {
        from: String,
        to: String,
        #[serde(default)]
        promotion: Option<String>,
    },
    /// The board finished animating the drop
    SnapEnd,
    SetDepth { depth: i64 },
    Reset,
    /// Ask the service again after a failed cycle
    Retry,
}

/// Message sent from the session to the browser board
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ServerMessage {
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<LastMove>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<DisplayState>,
}

/// Last move information
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LastMove {
    pub from: String,
    pub to: String,
}

impl ServerMessage {
    fn new(message_type: &str) -> Self {
        Self {
            message_type: message_type.to_string(),
            fen: None,
            error: None,
            allowed: None,
            last_move: None,
            game_status: None,
            view: None,
        }
    }

    pub fn position(fen: &str) -> Self {
        Self {
            fen: Some(fen.to_string()),
            ..Self::new("position")
        }
    }

    pub fn snapback(from: &str, to: &str) -> Self {
        Self {
            last_move: Some(LastMove {
                from: from.to_string(),
                to: to.to_string(),
            }),
            ..Self::new("snapback")
        }
    }

    pub fn pickup(allowed: bool) -> Self {
        Self {
            allowed: Some(allowed),
            ..Self::new("pickup")
        }
    }

    pub fn reset() -> Self {
        Self::new("reset")
    }

    pub fn view(display: &DisplayState) -> Self {
        Self {
            game_status: Some(display.status.clone()),
            view: Some(display.clone()),
            ..Self::new("view")
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new("error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_tagged() {
        let drop: ClientMessage =
            serde_json::from_str(r#"{"type": "drop", "from": "e2", "to": "e4"}"#).unwrap();
        assert_eq!(
            drop,
            ClientMessage::Drop {
                from: "e2".to_string(),
                to: "e4".to_string(),
                promotion: None
            }
        );

        let depth: ClientMessage =
            serde_json::from_str(r#"{"type": "set_depth", "depth": 9}"#).unwrap();
        assert_eq!(depth, ClientMessage::SetDepth { depth: 9 });

        let snap: ClientMessage = serde_json::from_str(r#"{"type": "snap_end"}"#).unwrap();
        assert_eq!(snap, ClientMessage::SnapEnd);

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "resign"}"#).is_err());
    }

    #[test]
    fn server_messages_omit_empty_fields() {
        let json = serde_json::to_value(ServerMessage::snapback("e2", "e5")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message_type": "snapback",
                "last_move": { "from": "e2", "to": "e5" }
            })
        );
    }

    #[test]
    fn view_carries_the_game_status() {
        let mut display = DisplayState::new(4);
        display.status = "check".to_string();
        let json = serde_json::to_value(ServerMessage::view(&display)).unwrap();
        assert_eq!(json["message_type"], "view");
        assert_eq!(json["game_status"], "check");
        assert_eq!(json["view"]["status"], "check");
        assert_eq!(json["view"]["depth"], 4);
    }
}
