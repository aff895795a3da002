use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    products::{
        debounce::{next_settled, QUIESCENCE},
        repo,
    },
    state::AppState,
};

/// Search-as-you-type over a WebSocket. The client streams raw terms, one
/// text frame per keystroke; the server answers only once a burst has been
/// quiet for the debounce window, so superseded terms never hit the catalog.
#[instrument(skip(ws, state))]
pub async fn live_search(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state, user_id))
}

async fn handle_session(socket: WebSocket, state: AppState, user_id: Uuid) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(16);

    // Pump incoming text frames into the debounce channel. Dropping the
    // sender when the socket closes is what cancels a pending query.
    let reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(term) => {
                    if tx.send(term).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    while let Some(term) = next_settled(&mut rx, QUIESCENCE).await {
        let term = term.trim().to_string();
        let results = if term.is_empty() {
            Vec::new()
        } else {
            match repo::search_by_prefix(&state.db, &term).await {
                Ok(products) => products,
                Err(e) => {
                    warn!(error = %e, %user_id, term, "live search query failed");
                    Vec::new()
                }
            }
        };

        debug!(%user_id, term, hits = results.len(), "live search settled");
        let payload = match serde_json::to_string(&results) {
            Ok(p) => p,
            Err(_) => "[]".to_string(),
        };
        if sink.send(Message::Text(payload)).await.is_err() {
            break;
        }
    }

    reader.abort();
}
