//! Notifications delivered to observers
//!
//! Each decoded inbound item, and each channel lifecycle change, becomes
//! exactly one `Notification`. Names and payload shapes are fixed.

use serde_json::{json, Value};

use crate::types::{ClientId, RoomId};

/// A typed notification published to observers
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The channel became ready
    Open,
    /// A message was broadcast to a room this client is in
    Message {
        message: String,
        sender: ClientId,
        room: RoomId,
    },
    /// The server assigned this client its id
    Join { client_id: ClientId },
    RoomJoin { room_id: RoomId, client_id: ClientId },
    RoomExit { room_id: RoomId, client_id: ClientId },
    RoomCreation(RoomId),
    RoomRemoval(RoomId),
    RoomsList(Vec<RoomId>),
    RoomClientsList {
        clients: Vec<ClientId>,
        room_id: RoomId,
    },
    /// The channel closed, with the peer's reason if one was given
    Close { reason: Option<String> },
    /// The channel failed at the transport level
    Error { reason: String },
}

/// Discriminant of a `Notification`, used to register for a single kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Open,
    Message,
    Join,
    RoomJoin,
    RoomExit,
    RoomCreation,
    RoomRemoval,
    RoomsList,
    RoomClientsList,
    Close,
    Error,
}

impl NotificationKind {
    /// Notification name as observers know it
    pub fn name(self) -> &'static str {
        match self {
            NotificationKind::Open => "open",
            NotificationKind::Message => "message",
            NotificationKind::Join => "join",
            NotificationKind::RoomJoin => "roomjoin",
            NotificationKind::RoomExit => "roomexit",
            NotificationKind::RoomCreation => "roomcreation",
            NotificationKind::RoomRemoval => "roomremoval",
            NotificationKind::RoomsList => "roomslist",
            NotificationKind::RoomClientsList => "roomclientslist",
            NotificationKind::Close => "close",
            NotificationKind::Error => "error",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Open => NotificationKind::Open,
            Notification::Message { .. } => NotificationKind::Message,
            Notification::Join { .. } => NotificationKind::Join,
            Notification::RoomJoin { .. } => NotificationKind::RoomJoin,
            Notification::RoomExit { .. } => NotificationKind::RoomExit,
            Notification::RoomCreation(_) => NotificationKind::RoomCreation,
            Notification::RoomRemoval(_) => NotificationKind::RoomRemoval,
            Notification::RoomsList(_) => NotificationKind::RoomsList,
            Notification::RoomClientsList { .. } => NotificationKind::RoomClientsList,
            Notification::Close { .. } => NotificationKind::Close,
            Notification::Error { .. } => NotificationKind::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Payload in its JSON shape
    ///
    /// Room creation, room removal and rooms list carry a bare value rather
    /// than an object. `open` carries nothing.
    pub fn detail(&self) -> Value {
        match self {
            Notification::Open => Value::Null,
            Notification::Message {
                message,
                sender,
                room,
            } => json!({ "message": message, "sender": sender, "room": room }),
            Notification::Join { client_id } => json!({ "client_id": client_id }),
            Notification::RoomJoin { room_id, client_id }
            | Notification::RoomExit { room_id, client_id } => {
                json!({ "room_id": room_id, "client_id": client_id })
            }
            Notification::RoomCreation(room_id) | Notification::RoomRemoval(room_id) => {
                json!(room_id)
            }
            Notification::RoomsList(rooms) => json!(rooms),
            Notification::RoomClientsList { clients, room_id } => {
                json!({ "clients": clients, "room_id": room_id })
            }
            Notification::Close { reason } => json!(reason),
            Notification::Error { reason } => json!(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Notification::Open.name(), "open");
        assert_eq!(
            Notification::RoomClientsList {
                clients: vec![],
                room_id: RoomId::from("r1"),
            }
            .name(),
            "roomclientslist"
        );
        assert_eq!(NotificationKind::RoomExit.to_string(), "roomexit");
    }

    #[test]
    fn test_object_payloads() {
        let n = Notification::Message {
            message: "hi".to_string(),
            sender: ClientId::from("c1"),
            room: RoomId::from("r1"),
        };
        assert_eq!(
            n.detail(),
            json!({ "message": "hi", "sender": "c1", "room": "r1" })
        );

        let n = Notification::RoomClientsList {
            clients: vec![ClientId::from("c1"), ClientId::from("c2")],
            room_id: RoomId::from("r1"),
        };
        assert_eq!(
            n.detail(),
            json!({ "clients": ["c1", "c2"], "room_id": "r1" })
        );
    }

    #[test]
    fn test_bare_payloads() {
        assert_eq!(Notification::RoomCreation(RoomId::from("r1")).detail(), json!("r1"));
        assert_eq!(Notification::RoomRemoval(RoomId::from("r2")).detail(), json!("r2"));
        assert_eq!(
            Notification::RoomsList(vec![RoomId::from("a"), RoomId::from("b")]).detail(),
            json!(["a", "b"])
        );
        assert_eq!(Notification::Open.detail(), Value::Null);
        assert_eq!(Notification::Close { reason: None }.detail(), Value::Null);
    }
}
