//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enums
//! for type-safe serialization/deserialization. Field and tag names are
//! the server's wire names and must not change.

use serde::{Deserialize, Serialize};

use crate::types::{ClientId, RoomId};

/// Client → Server command
///
/// Tagged by `action` with SCREAMING_SNAKE_CASE names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Create a new room (the server joins the creator to it)
    RoomCreate,
    /// Join an existing room
    RoomJoin { room_id: RoomId },
    /// Start receiving room creation/removal events
    RoomsSubscribe,
    /// Stop receiving room creation/removal events
    RoomsUnsubscribe,
    /// Request the clients currently in a room
    RoomClientsList { room_id: RoomId },
    /// Request the current rooms
    RoomsList,
    /// Broadcast a payload to a target
    Broadcast {
        target: BroadcastTarget,
        data: BroadcastData,
    },
}

impl Command {
    /// Build a `BROADCAST` of a text message to a room
    pub fn message_to_room(room_id: RoomId, message: impl Into<String>) -> Self {
        Command::Broadcast {
            target: BroadcastTarget::Room { id: room_id },
            data: BroadcastData::Message {
                message: message.into(),
            },
        }
    }

    /// Wire name of the action, for logging
    pub fn action(&self) -> &'static str {
        match self {
            Command::RoomCreate => "ROOM_CREATE",
            Command::RoomJoin { .. } => "ROOM_JOIN",
            Command::RoomsSubscribe => "ROOMS_SUBSCRIBE",
            Command::RoomsUnsubscribe => "ROOMS_UNSUBSCRIBE",
            Command::RoomClientsList { .. } => "ROOM_CLIENTS_LIST",
            Command::RoomsList => "ROOMS_LIST",
            Command::Broadcast { .. } => "BROADCAST",
        }
    }
}

/// Target of a `BROADCAST` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BroadcastTarget {
    Room { id: RoomId },
}

/// Payload of a `BROADCAST` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BroadcastData {
    Message { message: String },
}

/// Server → Client envelope
///
/// Tagged by `type`. Unrecognized tags decode to `Unknown` instead of
/// failing, so the decoder can drop them without reporting a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Envelope {
    /// A message broadcast to a room
    Message {
        sender: ClientId,
        message: String,
        room: RoomId,
    },
    /// A server-pushed event
    Event { event: Event },
    #[serde(other)]
    Unknown,
}

/// Payload of an `EVENT` envelope, tagged by its own `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    /// Sent once to a freshly connected client with its own id
    ClientJoin { client_id: ClientId },
    /// A client joined a room
    RoomJoin { room_id: RoomId, client_id: ClientId },
    /// A client left a room
    RoomExit { room_id: RoomId, client_id: ClientId },
    /// A room was created
    RoomCreation { room_id: RoomId },
    /// A room was removed (its last client left)
    RoomRemoval { room_id: RoomId },
    /// Reply to `ROOMS_LIST` / `ROOMS_SUBSCRIBE`
    RoomsList { rooms: Vec<RoomId> },
    /// Reply to `ROOM_CLIENTS_LIST`
    RoomClientsList {
        clients: Vec<ClientId>,
        room_id: RoomId,
    },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_command_serialize() {
        let json = serde_json::to_string(&Command::RoomCreate).unwrap();
        assert_eq!(json, r#"{"action":"ROOM_CREATE"}"#);

        let json = serde_json::to_string(&Command::RoomsUnsubscribe).unwrap();
        assert_eq!(json, r#"{"action":"ROOMS_UNSUBSCRIBE"}"#);
    }

    #[test]
    fn test_broadcast_serialize() {
        let cmd = Command::message_to_room(RoomId::from("r1"), "hello");
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value,
            json!({
                "action": "BROADCAST",
                "target": { "type": "ROOM", "id": "r1" },
                "data": { "type": "MESSAGE", "message": "hello" }
            })
        );
        assert_eq!(cmd.action(), "BROADCAST");
    }

    #[test]
    fn test_message_envelope_deserialize() {
        let json = r#"{"type":"MESSAGE","sender":"c1","message":"hi","room":"r1"}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        match envelope {
            Envelope::Message {
                sender,
                message,
                room,
            } => {
                assert_eq!(sender, ClientId::from("c1"));
                assert_eq!(message, "hi");
                assert_eq!(room, RoomId::from("r1"));
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_event_ignores_extra_fields() {
        // The server attaches creator_id to room creation events
        let json = r#"{"type":"EVENT","event":{"type":"ROOM_CREATION","room_id":"r1","creator_id":"c1"}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(
            envelope,
            Envelope::Event {
                event: Event::RoomCreation {
                    room_id: RoomId::from("r1")
                }
            }
        );
    }

    #[test]
    fn test_unknown_tags_deserialize_to_unknown() {
        let envelope: Envelope = serde_json::from_str(r#"{"type":"PING","seq":1}"#).unwrap();
        assert_eq!(envelope, Envelope::Unknown);

        let envelope: Envelope =
            serde_json::from_str(r#"{"type":"EVENT","event":{"type":"ROOM_RENAME","room_id":"r1"}}"#)
                .unwrap();
        assert_eq!(
            envelope,
            Envelope::Event {
                event: Event::Unknown
            }
        );
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result = serde_json::from_str::<Envelope>(r#"{"type":"EVENT","event":{"type":"ROOM_JOIN","room_id":"r1"}}"#);
        assert!(result.is_err());
    }
}
