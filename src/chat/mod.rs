mod dto;
pub mod gemini;
pub mod handlers;
mod prompt;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
