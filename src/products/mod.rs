pub mod debounce;
mod dto;
pub mod handlers;
mod live;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
