//! Connection handling logic for WebSocket clients.
//!
//! This module contains the connection handling logic that manages the
//! lifecycle of individual client connections, including WebSocket
//! handshaking, message processing, and cleanup.

use crate::{
    config::SecurityConfig,
    connection::ConnectionManager,
    coordinator::Coordinator,
    error::ServerError,
    messaging::route_client_message,
    shutdown::ShutdownState,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, trace};

/// Handles a single client connection from establishment to cleanup.
///
/// # Connection Flow
///
/// 1. Perform WebSocket handshake
/// 2. Register the connection with the connection manager, which hands
///    back its outbound queue, and with the coordinator (which sends the
///    lobby)
/// 3. Run the incoming and outgoing tasks until either ends or shutdown
///    is initiated
/// 4. Tell the coordinator the connection is gone and drop it from the
///    connection manager
///
/// # Arguments
///
/// * `stream` - The TCP stream for the client connection
/// * `addr` - The remote address of the client
/// * `connection_manager` - Manager for tracking connections
/// * `coordinator` - Owner of all room and player state
/// * `security` - Limits for inbound frames
/// * `shutdown_state` - Closes the socket when shutdown is initiated
///
/// # Returns
///
/// `Ok(())` if the connection was handled successfully, or a `ServerError`
/// if the handshake failed.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    connection_manager: Arc<ConnectionManager>,
    coordinator: Arc<Coordinator>,
    security: SecurityConfig,
    shutdown_state: Option<ShutdownState>,
) -> Result<(), ServerError> {
    // Perform WebSocket handshake
    let ws_stream = accept_async(stream)
        .await
        .map_err(|e| ServerError::Network(format!("WebSocket handshake failed: {e}")))?;

    let (ws_sender, mut ws_receiver) = ws_stream.split();
    let ws_sender = Arc::new(tokio::sync::Mutex::new(ws_sender));

    let (connection_id, mut outbound) = connection_manager.add_connection(addr).await;
    coordinator.connect(connection_id).await;

    let ws_sender_incoming = ws_sender.clone();
    let ws_sender_outgoing = ws_sender.clone();

    // Incoming message task - routes frames to the coordinator
    let incoming_task = {
        let coordinator = coordinator.clone();

        async move {
            while let Some(msg) = ws_receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if let Err(e) =
                            route_client_message(&text, connection_id, &coordinator, &security).await
                        {
                            trace!("❌ Message routing error: {}", e);
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        coordinator
                            .reject_frame(
                                connection_id,
                                "invalid-message",
                                "Binary frames are not supported".to_string(),
                            )
                            .await;
                    }
                    Ok(Message::Close(_)) => {
                        debug!("🔌 Client {} requested close", connection_id);
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        let mut ws_sender = ws_sender_incoming.lock().await;
                        let _ = ws_sender.send(Message::Pong(data)).await;
                    }
                    Err(e) => {
                        debug!("WebSocket error for connection {}: {}", connection_id, e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    };

    // Outgoing message task
    let outgoing_task = {
        let ws_sender = ws_sender_outgoing;
        async move {
            while let Some(message) = outbound.recv().await {
                let message_text = String::from_utf8_lossy(&message).into_owned();
                let mut ws_sender = ws_sender.lock().await;
                if let Err(e) = ws_sender.send(Message::Text(message_text.into())).await {
                    error!("Failed to send message to connection {}: {}", connection_id, e);
                    break;
                }
            }
        }
    };

    let shutdown_signal = async {
        match &shutdown_state {
            Some(state) => state.wait().await,
            None => std::future::pending::<()>().await,
        }
    };

    // Run both tasks concurrently until one completes
    tokio::select! {
        _ = incoming_task => {},
        _ = outgoing_task => {},
        _ = shutdown_signal => {
            let mut ws_sender = ws_sender.lock().await;
            let _ = ws_sender.send(Message::Close(None)).await;
        },
    }

    coordinator.disconnect(connection_id).await;
    connection_manager.remove_connection(connection_id).await;
    Ok(())
}
