use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    products::{dto::SearchQuery, live, repo},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/search", get(search))
        .route("/products/live", get(live::live_search))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<repo::Product>>, AppError> {
    let term = q.term.trim();
    if term.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let results = repo::search_by_prefix(&state.db, term).await?;
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn run_search(term: &str) -> Vec<repo::Product> {
        let state = AppState::fake();
        let query = Query(SearchQuery { term: term.into() });
        search(State(state), AuthUser(Uuid::new_v4()), query)
            .await
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn empty_term_yields_empty_set() {
        assert!(run_search("").await.is_empty());
    }

    #[tokio::test]
    async fn whitespace_only_term_yields_empty_set() {
        assert!(run_search("   \t").await.is_empty());
    }
}
