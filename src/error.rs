//! Error types for the room client
//!
//! Defines adapter-level errors and channel send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::client::ConnectionState;

/// Adapter-level errors
///
/// Covers construction failures (bad endpoint), malformed inbound
/// frames, and commands issued while the channel cannot carry them.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (invalid endpoint URL, handshake failure)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error (malformed frame)
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Command issued while the connection is not open
    #[error("Not connected (connection is {state})")]
    NotConnected { state: ConnectionState },

    /// The outbound side of the channel has been dropped
    #[error("Channel closed")]
    ChannelClosed,
}

/// Message send errors
///
/// Occurs when attempting to send through a channel whose other half is gone.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}

impl From<SendError> for AppError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::ChannelClosed => AppError::ChannelClosed,
        }
    }
}
