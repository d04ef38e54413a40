//! WebSocket endpoint for real-time refresh events.
//!
//! Clients connect to `/ws` and receive one JSON text frame per
//! [`StoreEvent`](crate::events::StoreEvent). The channel is one-way:
//! inbound frames are ignored apart from close handling. A client that
//! lags far enough to miss events simply refreshes on the next one.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::state::AppState;

/// `GET /ws` - upgrade to a WebSocket event stream.
pub async fn ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forward bus events to one connected client until either side hangs up.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut events = state.events().subscribe();
    let (mut sender, mut receiver) = socket.split();

    tracing::debug!("websocket client connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "websocket client lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Inbound frames (pings, client chatter) are ignored.
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("websocket client disconnected");
}
