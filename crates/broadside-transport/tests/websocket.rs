//! Integration tests for the WebSocket transport.
//!
//! These tests spin up a real WebSocket server and client to verify that
//! data actually flows over the network: accept, both send directions,
//! clean close, and the independence of the read and write halves.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use broadside_transport::{Connection, Transport, WebSocketTransport};
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on a random port and returns the transport with its address.
    async fn bind() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport
            .local_addr()
            .expect("should have local addr")
            .to_string();
        (transport, addr)
    }

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .expect("client should connect");
        ws
    }

    /// Accepts one connection while a client dials in concurrently.
    async fn accept_one(
    ) -> (broadside_transport::WebSocketConnection, ClientWs) {
        let (mut transport, addr) = bind().await;
        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let client = connect_client(&addr).await;
        let conn = server_handle.await.expect("task should complete");
        (conn, client)
    }

    #[tokio::test]
    async fn test_accept_mints_opaque_identity() {
        let (conn, _client) = accept_one().await;

        let id = conn.id().as_str();
        assert!(id.starts_with("c-"));
        assert_eq!(id.len(), 2 + 32);
    }

    #[tokio::test]
    async fn test_send_and_receive_round_trip() {
        let (conn, mut client) = accept_one().await;

        // --- Server sends, client receives ---
        conn.send(b"hello from server")
            .await
            .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"hello from server");

        // --- Client sends, server receives ---
        client
            .send(Message::Text("hello from client".into()))
            .await
            .unwrap();

        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"hello from client");

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (conn, mut client) = accept_one().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_recv_skips_ping_frames() {
        let (conn, mut client) = accept_one().await;

        client
            .send(Message::Ping(b"beat".to_vec().into()))
            .await
            .unwrap();
        client.send(Message::Text("payload".into())).await.unwrap();

        // The ping is consumed silently; the next data frame comes out.
        let received = conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"payload");
    }

    #[tokio::test]
    async fn test_send_completes_while_recv_is_parked() {
        // The read and write halves live behind separate locks, so a
        // reader sitting in recv() with nothing inbound must not stall
        // an outbound push from another task.
        let (conn, mut client) = accept_one().await;

        let reader = conn.clone();
        let parked =
            tokio::spawn(async move { reader.recv().await });

        // Let the reader take the read half before we write.
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(
            Duration::from_secs(1),
            conn.send(b"pushed past the reader"),
        )
        .await
        .expect("send must not wait for the parked recv")
        .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"pushed past the reader");

        // Unpark the reader and confirm it still works.
        client.send(Message::Text("wake".into())).await.unwrap();
        let received = parked
            .await
            .expect("reader task should complete")
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"wake");
    }

    #[tokio::test]
    async fn test_clone_shares_one_connection() {
        let (conn, mut client) = accept_one().await;
        let other = conn.clone();

        assert_eq!(conn.id(), other.id());

        // A frame sent through either handle reaches the same peer.
        conn.send(b"one").await.unwrap();
        other.send(b"two").await.unwrap();

        let first = client.next().await.unwrap().unwrap();
        let second = client.next().await.unwrap().unwrap();
        assert_eq!(first.into_data().as_ref(), b"one");
        assert_eq!(second.into_data().as_ref(), b"two");
    }
}
