//! Room client - monitor
//!
//! Connects to a server, subscribes to room listings and logs every
//! notification until the connection closes or Ctrl-C is pressed.

use std::env;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use room_client::{Notification, RoomClient, DEFAULT_URL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // e.g., RUST_LOG=debug or RUST_LOG=room_client=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("room_client=info")),
        )
        .init();

    // Get endpoint from command line or use default
    let url = env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());

    let client = RoomClient::connect(&url)?;
    let mut notifications = client.subscribe();
    let mut reports = client.reports();

    client.wait_open().await?;
    client.subscribe_rooms()?;

    loop {
        tokio::select! {
            notification = notifications.recv() => {
                let Some(notification) = notification else { break };
                info!("{} {}", notification.name(), notification.detail());
                if let Notification::Close { .. } = notification {
                    break;
                }
            }
            Some(report) = reports.recv() => {
                warn!("Dropped frame: {}", report);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, closing");
                if let Err(e) = client.close() {
                    error!("Failed to close: {}", e);
                    break;
                }
            }
        }
    }

    Ok(())
}
