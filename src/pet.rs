use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    meals::repo::achievement_days,
    nutrition::{pet_level, streak_length},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct PetResponse {
    pub streak_days: u32,
    pub level: u8,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/pet", get(get_pet))
}

#[instrument(skip(state))]
pub async fn get_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PetResponse>, AppError> {
    let days = achievement_days(&state.db, user_id).await?;
    let streak_days = streak_length(&days);
    Ok(Json(PetResponse {
        streak_days,
        level: pet_level(streak_days),
    }))
}
