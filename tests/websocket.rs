//! End-to-end tests against a real WebSocket server.
//!
//! The server side is a bare `tokio-tungstenite` acceptor bound to an
//! OS-assigned port, scripted to behave like the room server for a
//! single exchange.

use futures_util::{SinkExt, StreamExt};
use room_client::{ClientId, ConnectionState, Notification, RoomClient, RoomId};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_websocket_session() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("should accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed");

        ws.send(Message::Text(
            r#"{"type":"EVENT","event":{"type":"CLIENT_JOIN","client_id":"c-1"}}"#.to_string(),
        ))
        .await
        .unwrap();

        let request = loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => break text,
                Some(Ok(_)) => continue,
                other => panic!("expected a request, got {:?}", other),
            }
        };
        assert_eq!(request, r#"{"action":"ROOMS_LIST"}"#);

        ws.send(Message::Text(
            r#"{"type":"EVENT","event":{"type":"ROOMS_LIST","rooms":["r-1","r-2"]}}"#.to_string(),
        ))
        .await
        .unwrap();

        // Keep reading so the close handshake completes
        while let Some(Ok(_)) = ws.next().await {}
    });

    let client = RoomClient::connect(&format!("ws://{addr}")).expect("valid url");
    let mut notifications = client.subscribe();

    assert_eq!(notifications.recv().await, Some(Notification::Open));
    assert_eq!(client.state(), ConnectionState::Open);
    assert_eq!(
        notifications.recv().await,
        Some(Notification::Join {
            client_id: ClientId::from("c-1")
        })
    );

    client.get_rooms_list().unwrap();
    assert_eq!(
        notifications.recv().await,
        Some(Notification::RoomsList(vec![
            RoomId::from("r-1"),
            RoomId::from("r-2")
        ]))
    );

    client.close().unwrap();
    assert_eq!(
        notifications.recv().await,
        Some(Notification::Close { reason: None })
    );
    assert_eq!(client.state(), ConnectionState::Closed);

    server.await.expect("server task should complete");
}

#[tokio::test]
async fn test_connect_to_closed_port_reports_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RoomClient::connect(&format!("ws://{addr}")).expect("valid url");
    let mut notifications = client.subscribe();

    match notifications.recv().await {
        Some(Notification::Error { .. }) => {}
        other => panic!("expected an error notification, got {:?}", other),
    }
    assert_eq!(
        notifications.recv().await,
        Some(Notification::Close { reason: None })
    );
    assert!(client.wait_open().await.is_err());
}

#[tokio::test]
async fn test_server_close_is_acknowledged() {
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("should accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed");

        ws.close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "bye".into(),
        }))
        .await
        .unwrap();

        // The client must answer with its own close frame
        loop {
            match ws.next().await {
                Some(Ok(Message::Close(_))) => return true,
                Some(Ok(_)) => continue,
                _ => return false,
            }
        }
    });

    let client = RoomClient::connect(&format!("ws://{addr}")).expect("valid url");
    let mut closes = client.subscribe_to(room_client::NotificationKind::Close);

    assert_eq!(
        closes.recv().await,
        Some(Notification::Close {
            reason: Some("bye".to_string())
        })
    );
    assert!(server.await.expect("server task should complete"));
}
