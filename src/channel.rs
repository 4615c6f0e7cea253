//! Duplex text channel
//!
//! The client never talks to a socket directly. It owns a `Channel`, whose
//! other half (`ChannelPeer`) is driven by a transport task or by a test.

use tokio::sync::mpsc;

use crate::error::SendError;

/// Item written by the client toward the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// A text frame
    Text(String),
    /// Ask the transport to close the connection
    Close,
}

/// Item delivered by the transport to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The connection is ready to send
    Open,
    /// A received text frame
    Frame(String),
    /// The connection closed
    Closed { reason: Option<String> },
    /// The connection failed
    Failed(String),
}

/// Client side of the duplex channel
#[derive(Debug)]
pub struct Channel {
    pub(crate) outgoing: mpsc::UnboundedSender<Outgoing>,
    pub(crate) incoming: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl Channel {
    /// Create a connected channel and its transport-side peer
    pub fn pair() -> (Channel, ChannelPeer) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (
            Channel {
                outgoing: out_tx,
                incoming: in_rx,
            },
            ChannelPeer {
                incoming: in_tx,
                outgoing: out_rx,
            },
        )
    }
}

/// Transport side of the duplex channel
#[derive(Debug)]
pub struct ChannelPeer {
    pub(crate) incoming: mpsc::UnboundedSender<ChannelEvent>,
    pub(crate) outgoing: mpsc::UnboundedReceiver<Outgoing>,
}

impl ChannelPeer {
    /// Signal that the connection is ready
    pub fn open(&self) -> Result<(), SendError> {
        self.emit(ChannelEvent::Open)
    }

    /// Deliver a received text frame
    pub fn deliver(&self, text: impl Into<String>) -> Result<(), SendError> {
        self.emit(ChannelEvent::Frame(text.into()))
    }

    /// Signal that the connection closed
    pub fn close(&self, reason: Option<String>) -> Result<(), SendError> {
        self.emit(ChannelEvent::Closed { reason })
    }

    /// Signal a transport failure
    pub fn fail(&self, reason: impl Into<String>) -> Result<(), SendError> {
        self.emit(ChannelEvent::Failed(reason.into()))
    }

    pub fn emit(&self, event: ChannelEvent) -> Result<(), SendError> {
        self.incoming
            .send(event)
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Wait for the next item written by the client
    ///
    /// Returns `None` once the client side has been dropped.
    pub async fn recv_sent(&mut self) -> Option<Outgoing> {
        self.outgoing.recv().await
    }

    /// Take the next item written by the client if one is queued
    pub fn try_recv_sent(&mut self) -> Option<Outgoing> {
        self.outgoing.try_recv().ok()
    }

    /// Split into the event sender and the outgoing receiver
    pub fn into_parts(
        self,
    ) -> (
        mpsc::UnboundedSender<ChannelEvent>,
        mpsc::UnboundedReceiver<Outgoing>,
    ) {
        (self.incoming, self.outgoing)
    }
}
