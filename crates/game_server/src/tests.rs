// End-to-end tests over real WebSocket connections
#[cfg(test)]
mod tests {
    use crate::messaging::ServerMessage;
    use crate::*;
    use futures::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpStream;
    use tokio::task::JoinHandle;
    use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn spawn_server(
        config: ServerConfig,
        shutdown_state: Option<ShutdownState>,
    ) -> (Arc<GameServer>, SocketAddr, JoinHandle<Result<(), ServerError>>) {
        let config = ServerConfig {
            bind_address: "127.0.0.1:0".parse().expect("Invalid test address"),
            ..config
        };
        let server = Arc::new(create_server_with_config(config));
        let listener = server.bind().await.expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = {
            let server = server.clone();
            tokio::spawn(async move { server.serve(listener, shutdown_state).await })
        };
        (server, addr, handle)
    }

    async fn connect(addr: SocketAddr) -> Client {
        let (mut client, _) = connect_async(format!("ws://{addr}"))
            .await
            .expect("Failed to connect");
        // Every connection is greeted with the lobby
        expect_event(&mut client, "lobby-update").await;
        client
    }

    async fn send(client: &mut Client, frame: Value) {
        client
            .send(Message::Text(frame.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Reads frames until one on `event` arrives, skipping everything else.
    async fn expect_event(client: &mut Client, event: &str) -> ServerMessage {
        let wait = async {
            loop {
                let frame = client
                    .next()
                    .await
                    .expect("Connection closed")
                    .expect("WebSocket error");
                if let Message::Text(text) = frame {
                    let message: ServerMessage =
                        serde_json::from_str(&text).expect("Unparseable server frame");
                    if message.channel() == event {
                        return message;
                    }
                }
            }
        };
        tokio::time::timeout(TIMEOUT, wait)
            .await
            .unwrap_or_else(|_| panic!("Timed out waiting for {event}"))
    }

    /// Sends a player-update and waits until the server has applied it.
    async fn update(client: &mut Client, data: Value) -> ServerMessage {
        send(client, json!({"event": "player-update", "data": data})).await;
        expect_event(client, "player-state").await
    }

    async fn place_triangle(client: &mut Client, pins: [(f64, f64); 3]) {
        for (slot, (lat, lng)) in ["first", "second", "third"].into_iter().zip(pins) {
            update(client, json!({ slot: {"lat": lat, "lng": lng} })).await;
        }
    }

    /// ada owns "arena", bob joined, both are ready and the match started.
    async fn started_match(addr: SocketAddr) -> (Client, Client) {
        let mut ada = connect(addr).await;
        let mut bob = connect(addr).await;
        update(&mut ada, json!({"name": "ada"})).await;
        update(&mut bob, json!({"name": "bob"})).await;

        send(&mut ada, json!({"event": "create-room", "data": "arena"})).await;
        expect_event(&mut ada, "members-update").await;
        send(&mut bob, json!({"event": "join-room", "data": "arena"})).await;
        match expect_event(&mut bob, "members-update").await {
            ServerMessage::MembersUpdate { room, members } => {
                assert_eq!(room, "arena");
                let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
                assert_eq!(names, ["ada", "bob"]);
            }
            other => panic!("unexpected {other:?}"),
        }

        update(&mut ada, json!({"ready": true})).await;
        update(&mut bob, json!({"ready": true})).await;
        send(&mut ada, json!({"event": "start-game"})).await;
        for client in [&mut ada, &mut bob] {
            expect_event(client, "game-starting").await;
            // Drain the started roster so later reads see fresh updates
            expect_event(client, "members-update").await;
        }
        (ada, bob)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_full_match_over_websocket() {
        let (server, addr, _handle) = spawn_server(ServerConfig::default(), None).await;
        let (mut ada, mut bob) = started_match(addr).await;

        place_triangle(&mut ada, [(0.0, 0.0), (0.0, 10.0), (10.0, 0.0)]).await;
        place_triangle(&mut bob, [(1.0, 1.0), (3.0, 1.0), (1.0, 3.0)]).await;

        assert_eq!(
            expect_event(&mut bob, "victory").await,
            ServerMessage::Victory("ada".into())
        );
        assert_eq!(
            expect_event(&mut ada, "victory").await,
            ServerMessage::Victory("ada".into())
        );

        // The room is reset right after the announcement
        match expect_event(&mut ada, "members-update").await {
            ServerMessage::MembersUpdate { members, .. } => {
                assert_eq!(members.len(), 2);
                for member in members {
                    assert!(!member.ready && !member.started);
                    assert!(!member.pins.first && !member.pins.second && !member.pins.third);
                }
            }
            other => panic!("unexpected {other:?}"),
        }
        match expect_event(&mut ada, "lobby-update").await {
            ServerMessage::LobbyUpdate(rooms) => assert!(!rooms[0].started),
            other => panic!("unexpected {other:?}"),
        }

        let stats = server.stats().await;
        assert_eq!(stats.rooms, 1);
        assert_eq!(stats.started_rooms, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_frames_do_not_close_connection() {
        let (_server, addr, _handle) = spawn_server(ServerConfig::default(), None).await;
        let mut client = connect(addr).await;

        client
            .send(Message::Text("{oops".into()))
            .await
            .expect("Failed to send frame");
        match expect_event(&mut client, "error").await {
            ServerMessage::Error { code, .. } => assert_eq!(code, "invalid-message"),
            other => panic!("unexpected {other:?}"),
        }

        send(&mut client, json!({"event": "start-game"})).await;
        match expect_event(&mut client, "error").await {
            ServerMessage::Error { code, .. } => assert_eq!(code, "not-in-room"),
            other => panic!("unexpected {other:?}"),
        }

        send(&mut client, json!({"event": "list-rooms-request"})).await;
        expect_event(&mut client, "lobby-update").await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ping_is_answered() {
        let (_server, addr, _handle) = spawn_server(ServerConfig::default(), None).await;
        let mut client = connect(addr).await;

        client
            .send(Message::Ping(b"are you there".to_vec().into()))
            .await
            .expect("Failed to send ping");

        let pong = tokio::time::timeout(TIMEOUT, async {
            loop {
                match client.next().await {
                    Some(Ok(Message::Pong(payload))) => return payload,
                    Some(Ok(_)) => continue,
                    other => panic!("unexpected {other:?}"),
                }
            }
        })
        .await
        .expect("No pong received");
        assert_eq!(&pong[..], b"are you there");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_disconnect_frees_seat() {
        let (server, addr, _handle) = spawn_server(ServerConfig::default(), None).await;
        let (mut ada, mut bob) = started_match(addr).await;

        bob.close(None).await.expect("Failed to close");
        match expect_event(&mut ada, "members-update").await {
            ServerMessage::MembersUpdate { members, .. } => {
                assert_eq!(members.len(), 1);
                assert_eq!(members[0].name, "ada");
                assert!(!members[0].started);
            }
            other => panic!("unexpected {other:?}"),
        }

        // Someone else can take the seat
        let mut cleo = connect(addr).await;
        send(&mut cleo, json!({"event": "join-room", "data": "arena"})).await;
        expect_event(&mut cleo, "members-update").await;

        let players = server
            .coordinator()
            .inspect(|registry| registry.members("arena").len())
            .await;
        assert_eq!(players, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_connection_limit() {
        let config = ServerConfig {
            max_connections: 1,
            ..ServerConfig::default()
        };
        let (_server, addr, _handle) = spawn_server(config, None).await;
        let _first = connect(addr).await;

        let second = tokio::time::timeout(TIMEOUT, connect_async(format!("ws://{addr}")))
            .await
            .expect("Connect attempt hung");
        assert!(second.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_stops_accept_loop() {
        let (server, addr, handle) = spawn_server(ServerConfig::default(), None).await;
        // Once a client is served the accept loop is listening for the signal
        let _client = connect(addr).await;

        server.shutdown().await.expect("Failed to signal shutdown");
        let result = tokio::time::timeout(TIMEOUT, handle)
            .await
            .expect("Server did not stop")
            .expect("Server task panicked");
        assert!(result.is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_state_closes_connections() {
        let state = ShutdownState::new();
        let (_server, addr, handle) =
            spawn_server(ServerConfig::default(), Some(state.clone())).await;
        let mut client = connect(addr).await;

        state.initiate_shutdown();

        let closed = tokio::time::timeout(TIMEOUT, async {
            loop {
                match client.next().await {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                    Some(Ok(_)) => continue,
                }
            }
        })
        .await;
        assert!(closed.is_ok(), "Connection was not closed");

        tokio::time::timeout(TIMEOUT, handle)
            .await
            .expect("Server did not stop")
            .expect("Server task panicked")
            .expect("Server returned an error");
    }
}
