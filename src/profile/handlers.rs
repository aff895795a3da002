use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{jwt::AuthUser, repo::User},
    error::AppError,
    profile::{
        dto::{ProfileResponse, UpdateProfileRequest},
        repo,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", put(update_profile))
}

fn to_response(user: User) -> ProfileResponse {
    ProfileResponse {
        name: user.name,
        surname: user.surname,
        age: user.age,
        height_cm: user.height_cm,
        weight_kg: user.weight_kg,
    }
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(to_response(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    if matches!(payload.age, Some(age) if age < 0) {
        return Err(AppError::bad_request("Invalid age"));
    }
    if matches!(payload.name.as_deref(), Some(name) if name.trim().is_empty()) {
        return Err(AppError::bad_request("Name must not be empty"));
    }

    let user = repo::update_profile(&state.db, user_id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!(%user_id, "profile updated");
    Ok(Json(to_response(user)))
}
