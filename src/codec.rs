//! Frame encoding and decoding
//!
//! Outbound: `Command` → JSON text frame.
//! Inbound: JSON text frame → `Envelope` → at most one `Notification`.

use serde_json::Value;
use tracing::debug;

use crate::error::AppError;
use crate::message::{Command, Envelope, Event};
use crate::notification::Notification;

/// Serialize a command into a text frame
pub fn encode(command: &Command) -> Result<String, AppError> {
    Ok(serde_json::to_string(command)?)
}

/// Parse a received text frame
///
/// Returns `Ok(None)` for anything that is JSON but not a recognized
/// envelope or event kind, including values with no string `type`.
/// Text that is not JSON, or a recognized kind with missing fields,
/// is an `AppError::Json`.
pub fn decode(text: &str) -> Result<Option<Notification>, AppError> {
    let value: Value = serde_json::from_str(text)?;
    match value.get("type").and_then(Value::as_str) {
        Some("MESSAGE") | Some("EVENT") => {}
        _ => {
            debug!("Dropping frame without a recognized envelope type");
            return Ok(None);
        }
    }
    let envelope: Envelope = serde_json::from_value(value)?;
    Ok(into_notification(envelope))
}

/// Map an envelope onto its notification
pub fn into_notification(envelope: Envelope) -> Option<Notification> {
    match envelope {
        Envelope::Message {
            sender,
            message,
            room,
        } => Some(Notification::Message {
            message,
            sender,
            room,
        }),
        Envelope::Event { event } => event_notification(event),
        Envelope::Unknown => {
            debug!("Dropping envelope of unrecognized type");
            None
        }
    }
}

fn event_notification(event: Event) -> Option<Notification> {
    let notification = match event {
        Event::ClientJoin { client_id } => Notification::Join { client_id },
        Event::RoomJoin { room_id, client_id } => Notification::RoomJoin { room_id, client_id },
        Event::RoomExit { room_id, client_id } => Notification::RoomExit { room_id, client_id },
        Event::RoomCreation { room_id } => Notification::RoomCreation(room_id),
        Event::RoomRemoval { room_id } => Notification::RoomRemoval(room_id),
        Event::RoomsList { rooms } => Notification::RoomsList(rooms),
        Event::RoomClientsList { clients, room_id } => {
            Notification::RoomClientsList { clients, room_id }
        }
        Event::Unknown => {
            debug!("Dropping event of unrecognized type");
            return None;
        }
    };
    Some(notification)
}
