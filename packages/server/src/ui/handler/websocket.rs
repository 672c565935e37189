//! WebSocket connection handlers.
//!
//! Each connection is served by one task that reads frames and a spawned task
//! that writes every frame queued on the connection's channel. Replies to the
//! requesting connection go through the same channel as pushes from other
//! connections, so a client sees them in the order they were produced.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    infrastructure::{
        dto::websocket::{ClientMessage, ServerMessage},
        registry::ConnectionHandle,
    },
    ui::state::{AppState, ConnectionState},
    usecase::{
        AcceptRequestUseCase, DeleteContactUseCase, DisconnectUseCase, JoinRoomUseCase,
        RegisterAliasUseCase, RejectRequestUseCase, RelayPayloadUseCase, SendRequestUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive frames
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut connection = ConnectionState::new(ConnectionHandle::new(tx));
    let connection_id = connection.handle.id;
    tracing::info!("Connection {} opened", connection_id);

    // Spawn a task to write queued frames to this connection
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        dispatch(&state, &mut connection, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("Connection {} requested close", connection_id);
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ping/pong is handled automatically by the WebSocket protocol
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on {}: {}", connection_id, e);
                        break;
                    }
                }
            }
            _ = &mut send_task => {
                tracing::debug!("Writer of {} stopped", connection_id);
                break;
            }
        }
    }
    send_task.abort();

    DisconnectUseCase::new(state.connections.clone(), state.rooms.clone())
        .execute(connection)
        .await;
}

/// Handle one text frame from `connection`.
///
/// Frames that are not valid JSON, or that do not match a known message, are
/// dropped without a reply.
pub(crate) async fn dispatch(state: &AppState, connection: &mut ConnectionState, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(
                "Dropping malformed frame from {}: {}",
                connection.handle.id,
                e
            );
            return;
        }
    };

    let replies = match message {
        ClientMessage::Register { alias } => {
            let usecase =
                RegisterAliasUseCase::new(state.repository.clone(), state.connections.clone());
            // registered and bootstrap are queued by the usecase itself
            if let Err(e) = usecase.execute(connection, alias).await {
                tracing::debug!("Ignoring register from {}: {}", connection.handle.id, e);
            }
            Vec::new()
        }
        ClientMessage::Join { room } => {
            let usecase = JoinRoomUseCase::new(state.rooms.clone());
            if let Err(e) = usecase.execute(connection, room).await {
                tracing::debug!("Ignoring join from {}: {}", connection.handle.id, e);
            }
            Vec::new()
        }
        ClientMessage::RequestSend { to, request_id } => {
            let usecase =
                SendRequestUseCase::new(state.repository.clone(), state.connections.clone());
            vec![
                usecase
                    .execute(connection.alias.as_ref(), &to, request_id)
                    .await,
            ]
        }
        ClientMessage::RequestAccept { request_id } => {
            let usecase =
                AcceptRequestUseCase::new(state.repository.clone(), state.connections.clone());
            vec![
                usecase
                    .execute(connection.alias.as_ref(), &request_id)
                    .await,
            ]
        }
        ClientMessage::RequestReject { request_id } => {
            let usecase =
                RejectRequestUseCase::new(state.repository.clone(), state.connections.clone());
            vec![
                usecase
                    .execute(connection.alias.as_ref(), &request_id)
                    .await,
            ]
        }
        ClientMessage::ContactDelete { with } => {
            let usecase =
                DeleteContactUseCase::new(state.repository.clone(), state.connections.clone());
            vec![usecase.execute(connection.alias.as_ref(), &with).await]
        }
        ClientMessage::Message {} | ClientMessage::Typing {} | ClientMessage::Left {} => {
            RelayPayloadUseCase::new(state.rooms.clone())
                .execute(connection, text)
                .await;
            Vec::new()
        }
    };

    reply(connection, &replies);
}

fn reply(connection: &ConnectionState, replies: &[ServerMessage]) {
    for message in replies {
        if !connection.handle.send(&message.to_json()) {
            tracing::warn!("Failed to reply to connection {}", connection.handle.id);
        }
    }
}
