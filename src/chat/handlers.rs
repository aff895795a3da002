use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, instrument};

use crate::{
    auth::{jwt::AuthUser, repo::User},
    chat::{
        dto::{ChatRequest, ChatResponse},
        prompt::build_prompt,
    },
    error::AppError,
    state::AppState,
};

/// Reply shown whenever the completion service fails for any reason. Chat
/// failures never surface as errors to the client.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't come up with an answer right now. Please try again later.";

pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(send_message))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }

    // Everything from here on fails closed into the fallback reply.
    let user = match User::find_by_id(&state.db, user_id).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            error!(%user_id, "chat for unknown user");
            return Ok(Json(ChatResponse {
                reply: FALLBACK_REPLY.into(),
            }));
        }
        Err(e) => {
            error!(error = %e, %user_id, "load profile for chat failed");
            return Ok(Json(ChatResponse {
                reply: FALLBACK_REPLY.into(),
            }));
        }
    };

    let prompt = build_prompt(&user, &payload.message);
    let reply = match state.chat.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            error!(error = %e, %user_id, "completion service failed");
            FALLBACK_REPLY.into()
        }
    };

    Ok(Json(ChatResponse { reply }))
}
