//! Room Client Library
//!
//! Client-side adapter for a room-based publish/subscribe server reached
//! over a single WebSocket connection.
//!
//! # Features
//! - Room creation and joining
//! - Room listing and room creation/removal subscriptions
//! - Per-room client listing
//! - Broadcasting text messages to a room
//! - Typed notifications for every server push
//!
//! # Architecture
//! - `RoomClient` owns the channel and exposes the commands
//! - A dispatch task decodes inbound frames in delivery order
//! - Observers receive `Notification`s through unbounded `mpsc` queues
//!
//! # Example
//! ```ignore
//! use room_client::{Notification, RoomClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), room_client::AppError> {
//!     let client = RoomClient::connect("ws://127.0.0.1:3030/ws")?;
//!     let mut notifications = client.subscribe();
//!
//!     client.wait_open().await?;
//!     client.get_rooms_list()?;
//!
//!     while let Some(notification) = notifications.recv().await {
//!         if let Notification::RoomsList(rooms) = notification {
//!             println!("{} rooms", rooms.len());
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod client;
pub mod codec;
pub mod error;
pub mod message;
pub mod notification;
pub mod publisher;
pub mod transport;
pub mod types;

/// Endpoint of a locally running server
pub const DEFAULT_URL: &str = "ws://127.0.0.1:3030/ws";

// Re-export main types for convenience
pub use channel::{Channel, ChannelEvent, ChannelPeer, Outgoing};
pub use client::{ConnectionState, RoomClient};
pub use error::{AppError, SendError};
pub use message::{BroadcastData, BroadcastTarget, Command, Envelope, Event};
pub use notification::{Notification, NotificationKind};
pub use publisher::{ObserverId, Publisher, Subscription};
pub use types::{ClientId, RoomId};
