//! Basic type definitions for the room client
//!
//! Provides newtype wrappers for type safety:
//! - `ClientId`: server-assigned client identifier
//! - `RoomId`: server-assigned room identifier
//!
//! Both are opaque to the client. They serialize as plain JSON strings,
//! which is what the server sends; an event carrying a non-string id
//! (a number, say) fails to decode and is reported as malformed.

use serde::{Deserialize, Serialize};

/// Client identifier (newtype pattern)
///
/// Assigned by the server. The local peer learns its own id only
/// through the `CLIENT_JOIN` event addressed to it. Only JSON strings
/// are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl ClientId {
    /// Wrap a raw identifier received from the server or the application
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Room identifier (newtype pattern)
///
/// Assigned by the server on room creation. No existence check is
/// performed client-side before it is used in a command. Only JSON
/// strings are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Wrap a raw identifier received from the server or the application
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_strings() {
        let room = RoomId::new("r-1");
        assert_eq!(serde_json::to_string(&room).unwrap(), "\"r-1\"");

        let client: ClientId = serde_json::from_str("\"c-9\"").unwrap();
        assert_eq!(client, ClientId::from("c-9"));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(RoomId::from("abc").to_string(), "abc");
        assert_eq!(ClientId::from("xyz").as_str(), "xyz");
    }
}
