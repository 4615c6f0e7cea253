//! WebSocket transport
//!
//! Backs a `Channel` with a `tokio-tungstenite` client connection:
//! performs the handshake, then pumps text frames in both directions
//! until either side closes.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelEvent, Outgoing};
use crate::error::AppError;

/// Open a WebSocket channel to `url`
///
/// The URL is validated immediately; the handshake runs in a spawned task
/// and its outcome arrives on the channel as `Open` or `Failed`.
/// Must be called from within a Tokio runtime.
pub fn websocket(url: &str) -> Result<Channel, AppError> {
    let request = url.into_client_request()?;
    let (channel, peer) = Channel::pair();
    let (events, outgoing) = peer.into_parts();

    tokio::spawn(run_connection(request, events, outgoing));

    Ok(channel)
}

/// Drive one connection from handshake to close
async fn run_connection(
    request: Request,
    events: mpsc::UnboundedSender<ChannelEvent>,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
) {
    let endpoint = request.uri().to_string();
    debug!("Connecting to {}", endpoint);

    let ws_stream = match tokio_tungstenite::connect_async(request).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            warn!("Failed to connect to {}: {}", endpoint, e);
            let _ = events.send(ChannelEvent::Failed(e.to_string()));
            return;
        }
    };
    info!("Connected to {}", endpoint);

    if events.send(ChannelEvent::Open).is_err() {
        debug!("Client dropped before open, abandoning {}", endpoint);
        return;
    }

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // WebSocket -> ChannelEvent. Yields the terminal event, if any.
    let reader = async {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    if events.send(ChannelEvent::Frame(text)).is_err() {
                        debug!("Client dropped, ending read loop");
                        return None;
                    }
                }
                Ok(Message::Close(frame)) => {
                    debug!("Server sent close frame");
                    let reason = frame
                        .map(|f| f.reason.to_string())
                        .filter(|reason| !reason.is_empty());
                    // tungstenite only flushes the queued close reply on a later read
                    while let Some(Ok(_)) = ws_receiver.next().await {}
                    return Some(ChannelEvent::Closed { reason });
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Pong is handled automatically by tungstenite
                }
                Ok(_) => {
                    debug!("Ignoring non-text frame");
                }
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    return Some(ChannelEvent::Failed(e.to_string()));
                }
            }
        }
        Some(ChannelEvent::Closed { reason: None })
    };

    // Outgoing -> WebSocket
    let writer = async {
        while let Some(item) = outgoing.recv().await {
            match item {
                Outgoing::Text(text) => {
                    if let Err(e) = ws_sender.send(Message::Text(text)).await {
                        return Err(e);
                    }
                }
                Outgoing::Close => break,
            }
        }
        debug!("Write loop ended, sending close frame");
        ws_sender.close().await
    };

    tokio::pin!(reader);
    tokio::pin!(writer);

    let terminal = tokio::select! {
        terminal = &mut reader => terminal,
        written = &mut writer => match written {
            // Wait for the server to acknowledge the close
            Ok(()) => (&mut reader).await,
            Err(e) => {
                warn!("WebSocket send failed: {}", e);
                Some(ChannelEvent::Failed(e.to_string()))
            }
        },
    };

    if let Some(event) = terminal {
        let _ = events.send(event);
    }
    info!("Disconnected from {}", endpoint);
}
