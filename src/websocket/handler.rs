use crate::{
    game::{PuzzleEvent, PuzzleSession, SessionBuilder},
    websocket::messages::{ClientMessage, ServerMessage},
    ActiveSession, AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::{sync::Arc, time::Instant};
use tokio::sync::{broadcast, mpsc};

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub level: String,
}

/// WebSocket upgrade handler. The level is picked with `?level=<name>`.
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    Query(query): Query<SessionQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(text) = state.levels.get(&query.level).map(str::to_string) else {
        tracing::warn!("Rejected session for unknown level `{}`", query.level);
        return (StatusCode::NOT_FOUND, format!("Unknown level: {}", query.level)).into_response();
    };

    tracing::info!("WebSocket session requested for level `{}`", query.level);
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.level, text))
}

/// Handle one puzzle session over a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, level_name: String, text: String) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    // Subscribe before loading so GridReady is not missed
    let builder = SessionBuilder::new(state.config.game.session_settings());
    let events = builder.subscribe();
    let session = match builder.load(&text) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to load level `{}`: {}", level_name, e);
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Ok(json) = serde_json::to_string(&error_msg) {
                let _ = sender.send(Message::Text(json.into())).await;
            }
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };

    let session_id = session.id();
    state.sessions.insert(
        session_id,
        ActiveSession {
            level: level_name.clone(),
            started_at: Instant::now(),
        },
    );
    let _ = tx
        .send(ServerMessage::SessionStarted {
            session_id: session_id.to_string(),
            level: level_name,
        })
        .await;

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Forward puzzle events to the client
    let forward_tx = tx.clone();
    let forward_task = tokio::spawn(forward_events(events, forward_tx));

    // Handle incoming messages from the client
    let mut recv_task = tokio::spawn(async move {
        let mut session = session;
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) = handle_client_message(client_msg, &mut session, &tx).await {
                            tracing::error!("Error handling message: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client closed session {}", session.id());
                    break;
                }
                _ => {}
            }
        }
        session.end();
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }
    forward_task.abort();

    match state.sessions.remove(&session_id) {
        Some((_, active)) => tracing::info!(
            "WebSocket session {} on `{}` closed after {:?}",
            session_id,
            active.level,
            active.started_at.elapsed()
        ),
        None => tracing::info!("WebSocket session {} closed", session_id),
    }
}

/// Relay broadcast puzzle events into the client's outgoing queue
async fn forward_events(
    mut events: broadcast::Receiver<PuzzleEvent>,
    tx: mpsc::Sender<ServerMessage>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if tx.send(ServerMessage::from(event)).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Client fell behind, {} puzzle events dropped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Handle individual client messages
async fn handle_client_message(
    msg: ClientMessage,
    session: &mut PuzzleSession,
    tx: &mpsc::Sender<ServerMessage>,
) -> anyhow::Result<()> {
    match msg {
        ClientMessage::SubmitWord { word } => {
            tracing::info!("Session {} submitting word: {}", session.id(), word);
            let reply = match session.try_match(&word) {
                Some(placed) => ServerMessage::matched(placed),
                None => ServerMessage::NoMatch { word },
            };
            tx.send(reply).await?;
        }
    }

    Ok(())
}
