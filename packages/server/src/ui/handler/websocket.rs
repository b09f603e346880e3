//! WebSocket connection handlers.

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
    domain::{
        CallDuration, ConnectionId, DisplayName, MessageText, RoomName, SignalKind, SignalPayload,
    },
    infrastructure::dto::websocket::{ClientEvent, SignalPayloadDto},
    ui::state::AppState,
    usecase::{JoinRoomError, RoomEventError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    if let Err(e) = state
        .connect_participant_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        tracing::warn!("Rejecting connection: {}", e);
        return;
    }
    tracing::info!("Client '{}' connected", connection_id);

    let (sender, mut receiver) = socket.split();

    // Spawn a task to forward notifications to this client
    let mut send_task = pusher_loop(rx, sender);

    // Spawn a task to process events from this client in arrival order
    let state_clone = state.clone();
    let id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => dispatch(&state_clone, &id_clone, text.as_str()).await,
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Ok(notified) => tracing::info!(
            "Client '{}' disconnected ({} peer(s) notified)",
            connection_id,
            notified.len()
        ),
        Err(e) => tracing::debug!("Disconnect of '{}' ignored: {}", connection_id, e),
    }
}

/// Parse a room name from a payload, logging and dropping invalid ones.
fn room_name(connection_id: &ConnectionId, raw: String) -> Option<RoomName> {
    match RoomName::new(raw) {
        Ok(name) => Some(name),
        Err(e) => {
            tracing::debug!("Ignoring event from '{}': {}", connection_id, e);
            None
        }
    }
}

fn display_name(raw: Option<String>) -> Option<DisplayName> {
    raw.and_then(|name| DisplayName::new(name).ok())
}

fn log_rejection(connection_id: &ConnectionId, event: &str, result: Result<(), RoomEventError>) {
    if let Err(e) = result {
        tracing::debug!("'{}' from '{}' ignored: {}", event, connection_id, e);
    }
}

/// Route one inbound frame to its usecase.
async fn dispatch(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let event = match ClientEvent::parse(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match event {
        ClientEvent::Join(payload) => {
            let Some(room) = room_name(connection_id, payload.room_name) else {
                return;
            };
            match state
                .join_room_usecase
                .execute(connection_id, room, payload.force_new)
                .await
            {
                Ok(_) | Err(JoinRoomError::RoomFull(_)) => {}
                Err(e) => tracing::debug!("'join' from '{}' ignored: {}", connection_id, e),
            }
        }
        ClientEvent::BindIdentity(payload) => {
            let Some(room) = room_name(connection_id, payload.room_name) else {
                return;
            };
            let Some(name) = display_name(Some(payload.username)) else {
                tracing::debug!("Ignoring empty username from '{}'", connection_id);
                return;
            };
            let result = state
                .bind_identity_usecase
                .execute(connection_id, &room, name)
                .await;
            log_rejection(connection_id, "store_peer_ip", result);
        }
        ClientEvent::Ready(payload) => {
            let Some(room) = room_name(connection_id, payload.room_name) else {
                return;
            };
            let result = state.relay_signal_usecase.ready(connection_id, &room).await;
            log_rejection(connection_id, "ready", result.map(|_| ()));
        }
        ClientEvent::Offer(payload) => {
            relay(state, connection_id, SignalKind::Offer, payload).await
        }
        ClientEvent::Answer(payload) => {
            relay(state, connection_id, SignalKind::Answer, payload).await
        }
        ClientEvent::IceCandidate(payload) => {
            relay(state, connection_id, SignalKind::IceCandidate, payload).await
        }
        ClientEvent::MessageSend(payload) => {
            let Some(room) = room_name(connection_id, payload.room_name) else {
                return;
            };
            let Ok(message) = MessageText::new(payload.message) else {
                tracing::debug!("Ignoring invalid chat message from '{}'", connection_id);
                return;
            };
            let result = state
                .send_message_usecase
                .execute(connection_id, &room, message)
                .await;
            log_rejection(connection_id, "message_send", result.map(|_| ()));
        }
        ClientEvent::Leave(payload) => {
            let room = match payload.room_name {
                Some(raw) => match room_name(connection_id, raw) {
                    Some(room) => Some(room),
                    None => return,
                },
                None => None,
            };
            let result = state
                .leave_room_usecase
                .execute(connection_id, room.as_ref())
                .await;
            log_rejection(connection_id, "leave", result.map(|_| ()));
        }
        ClientEvent::Skip(payload) => {
            let Some(room) = room_name(connection_id, payload.room_name) else {
                return;
            };
            let result = state
                .skip_peer_usecase
                .execute(
                    connection_id,
                    &room,
                    display_name(payload.username),
                    CallDuration::from_secs_f64(payload.call_duration),
                )
                .await;
            log_rejection(connection_id, "skip", result.map(|_| ()));
        }
        ClientEvent::EndCall(payload) => {
            let Some(room) = room_name(connection_id, payload.room_name) else {
                return;
            };
            let result = state
                .end_call_usecase
                .execute(
                    connection_id,
                    &room,
                    display_name(payload.username),
                    CallDuration::from_secs_f64(payload.call_duration),
                )
                .await;
            log_rejection(connection_id, "end_call", result.map(|_| ()));
        }
        ClientEvent::LeaveOn => {
            state.requeue_cleanup_usecase.execute(true).await;
        }
        ClientEvent::RemoveWaitingUsers => {
            state.requeue_cleanup_usecase.execute(false).await;
        }
    }
}

async fn relay(
    state: &AppState,
    connection_id: &ConnectionId,
    kind: SignalKind,
    payload: SignalPayloadDto,
) {
    let Some(room) = room_name(connection_id, payload.room_name) else {
        return;
    };
    let result = state
        .relay_signal_usecase
        .signal(connection_id, &room, kind, SignalPayload::new(payload.payload))
        .await;
    log_rejection(connection_id, "signal", result.map(|_| ()));
}
