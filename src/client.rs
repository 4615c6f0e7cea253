//! Room client facade
//!
//! Owns the channel for its whole lifetime, turns command calls into
//! outbound frames, and runs the dispatch task that decodes inbound
//! frames into notifications.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::channel::{Channel, ChannelEvent, Outgoing};
use crate::codec;
use crate::error::AppError;
use crate::message::Command;
use crate::notification::{Notification, NotificationKind};
use crate::publisher::{ObserverId, Publisher, Subscription};
use crate::transport;
use crate::types::{ClientId, RoomId};

/// Lifecycle of the underlying channel
///
/// `Connecting → Open → Closed`; `Error` can be entered from any state
/// when the transport fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Error,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
            ConnectionState::Error => "error",
        };
        f.write_str(name)
    }
}

/// State written by the dispatch task and read by the facade
struct Shared {
    state: watch::Sender<ConnectionState>,
    client_id: watch::Sender<Option<ClientId>>,
}

impl Shared {
    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        debug!("Connection state {} -> {}", previous, state);
    }
}

/// Client for a room-based publish/subscribe server
///
/// Commands are fire-and-forget: each call writes exactly one frame and
/// returns without waiting for the server. Replies and server pushes
/// arrive as notifications on subscriptions.
pub struct RoomClient {
    outgoing: mpsc::UnboundedSender<Outgoing>,
    shared: Arc<Shared>,
    publisher: Arc<Publisher>,
    dispatcher: JoinHandle<()>,
}

impl RoomClient {
    /// Connect to a server over WebSocket
    ///
    /// Returns immediately in the `Connecting` state; an `open`
    /// notification follows once the handshake completes.
    /// Must be called from within a Tokio runtime.
    pub fn connect(url: &str) -> Result<Self, AppError> {
        info!("Connecting to {}", url);
        Ok(Self::new(transport::websocket(url)?))
    }

    /// Build a client over an already established channel
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(channel: Channel) -> Self {
        let Channel { outgoing, incoming } = channel;
        let (state, _) = watch::channel(ConnectionState::Connecting);
        let (client_id, _) = watch::channel(None);
        let shared = Arc::new(Shared { state, client_id });
        let publisher = Arc::new(Publisher::new());

        let dispatcher = tokio::spawn(dispatch(
            incoming,
            Arc::clone(&shared),
            Arc::clone(&publisher),
        ));

        Self {
            outgoing,
            shared,
            publisher,
            dispatcher,
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.borrow()
    }

    /// Wait until the connection leaves `Connecting`
    ///
    /// Fails with `NotConnected` if it closed or failed instead of opening.
    pub async fn wait_open(&self) -> Result<(), AppError> {
        let mut state_rx = self.shared.state.subscribe();
        let state = state_rx
            .wait_for(|state| *state != ConnectionState::Connecting)
            .await
            .map(|state| *state)
            .unwrap_or(ConnectionState::Closed);
        match state {
            ConnectionState::Open => Ok(()),
            state => Err(AppError::NotConnected { state }),
        }
    }

    /// Id assigned by the server, once its `CLIENT_JOIN` has arrived
    pub fn client_id(&self) -> Option<ClientId> {
        self.shared.client_id.borrow().clone()
    }

    /// Ask the server to create a room
    pub fn create_room(&self) -> Result<(), AppError> {
        self.send(&Command::RoomCreate)
    }

    /// Join a room
    pub fn join_room(&self, room_id: &RoomId) -> Result<(), AppError> {
        self.send(&Command::RoomJoin {
            room_id: room_id.clone(),
        })
    }

    /// Start receiving room creation/removal events
    pub fn subscribe_rooms(&self) -> Result<(), AppError> {
        self.send(&Command::RoomsSubscribe)
    }

    /// Stop receiving room creation/removal events
    pub fn unsubscribe_rooms(&self) -> Result<(), AppError> {
        self.send(&Command::RoomsUnsubscribe)
    }

    /// Request the clients in a room (answered by `roomclientslist`)
    pub fn get_room_clients_list(&self, room_id: &RoomId) -> Result<(), AppError> {
        self.send(&Command::RoomClientsList {
            room_id: room_id.clone(),
        })
    }

    /// Request the current rooms (answered by `roomslist`)
    pub fn get_rooms_list(&self) -> Result<(), AppError> {
        self.send(&Command::RoomsList)
    }

    /// Broadcast a text message to a room
    pub fn send_message_to_room(&self, room_id: &RoomId, message: &str) -> Result<(), AppError> {
        self.send(&Command::message_to_room(room_id.clone(), message))
    }

    /// Encode and write one command
    ///
    /// Refused unless the connection is open.
    pub fn send(&self, command: &Command) -> Result<(), AppError> {
        let state = self.state();
        if state != ConnectionState::Open {
            warn!("Refusing {} while connection is {}", command.action(), state);
            return Err(AppError::NotConnected { state });
        }

        let frame = codec::encode(command)?;
        debug!("Sending {}", frame);
        self.outgoing
            .send(Outgoing::Text(frame))
            .map_err(|_| AppError::ChannelClosed)
    }

    /// Ask the transport to close the connection
    ///
    /// The `close` notification follows once the channel reports it.
    pub fn close(&self) -> Result<(), AppError> {
        info!("Closing connection");
        self.outgoing
            .send(Outgoing::Close)
            .map_err(|_| AppError::ChannelClosed)
    }

    /// Register for every notification
    pub fn subscribe(&self) -> Subscription {
        self.publisher.subscribe()
    }

    /// Register for one notification kind
    pub fn subscribe_to(&self, kind: NotificationKind) -> Subscription {
        self.publisher.subscribe_to(kind)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.publisher.unsubscribe(id)
    }

    /// Stream of malformed-frame reports
    pub fn reports(&self) -> mpsc::UnboundedReceiver<Arc<AppError>> {
        self.publisher.reports()
    }
}

impl Drop for RoomClient {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

/// Consume channel events in delivery order until the channel ends
async fn dispatch(
    mut incoming: mpsc::UnboundedReceiver<ChannelEvent>,
    shared: Arc<Shared>,
    publisher: Arc<Publisher>,
) {
    while let Some(event) = incoming.recv().await {
        match event {
            ChannelEvent::Open => {
                info!("Connection open");
                shared.set_state(ConnectionState::Open);
                publisher.publish(Notification::Open);
            }
            ChannelEvent::Frame(text) => handle_frame(&text, &shared, &publisher),
            ChannelEvent::Failed(reason) => {
                error!("Connection failed: {}", reason);
                shared.set_state(ConnectionState::Error);
                publisher.publish(Notification::Error { reason });
            }
            ChannelEvent::Closed { reason } => {
                finish(reason, &shared, &publisher);
                return;
            }
        }
    }
    finish(None, &shared, &publisher);
}

fn handle_frame(text: &str, shared: &Shared, publisher: &Publisher) {
    debug!("Frame received: {}", text);
    match codec::decode(text) {
        Ok(Some(notification)) => {
            if let Notification::Join { client_id } = &notification {
                info!("Server assigned client id {}", client_id);
                shared.client_id.send_replace(Some(client_id.clone()));
            }
            publisher.publish(notification);
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Malformed frame: {}", e);
            publisher.report(e);
        }
    }
}

fn finish(reason: Option<String>, shared: &Shared, publisher: &Publisher) {
    info!("Connection closed");
    shared.set_state(ConnectionState::Closed);
    publisher.publish(Notification::Close { reason });
}
