use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use time::{macros::format_description, Date};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    meals::{
        dto::{
            AddEntryRequest, DayView, EntryCreatedResponse, EntryDeletedResponse, EntryView,
            SlotView, WaterRequest, WaterResponse,
        },
        repo::{self, FoodEntry, MealSlot},
    },
    nutrition::daily_totals,
    products,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/days/:date", get(get_day))
        .route("/days/:date/entries", post(add_entry))
        .route("/days/:date/entries/:id", delete(delete_entry))
        .route("/days/:date/water", put(set_water))
}

fn parse_day(raw: &str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format)
        .map_err(|_| AppError::bad_request(format!("invalid date: {raw}")))
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DayView>, AppError> {
    let day = parse_day(&date)?;
    let entries = repo::list_day(&state.db, user_id, day).await?;
    let water_glasses = repo::water_glasses(&state.db, user_id, day).await?;

    // Evaluate against the unclamped sums; this also repairs membership a
    // failed post-mutation sync may have left stale.
    let raw_totals = daily_totals(entries.iter().map(FoodEntry::macros));
    let achieved = repo::apply_achievement(&state.db, user_id, day, &raw_totals).await?;
    let totals = raw_totals.display();
    let slots = MealSlot::ALL
        .into_iter()
        .map(|slot| {
            let slot_entries: Vec<&FoodEntry> =
                entries.iter().filter(|e| e.slot == slot).collect();
            SlotView {
                slot,
                totals: daily_totals(slot_entries.iter().map(|e| e.macros())),
                entries: slot_entries.into_iter().cloned().map(EntryView::from).collect(),
            }
        })
        .collect();

    Ok(Json(DayView {
        date: day,
        slots,
        totals,
        achieved,
        water_glasses,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<EntryCreatedResponse>), AppError> {
    let day = parse_day(&date)?;

    let product = products::repo::find_by_id(&state.db, payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let entry = repo::insert_entry(&state.db, user_id, day, payload.slot, &product).await?;
    let (totals, achieved) = repo::sync_achievement(&state.db, user_id, day).await?;

    Ok((
        StatusCode::CREATED,
        Json(EntryCreatedResponse {
            entry: entry.into(),
            totals: totals.display(),
            achieved,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((date, entry_id)): Path<(String, Uuid)>,
) -> Result<Json<EntryDeletedResponse>, AppError> {
    let day = parse_day(&date)?;

    let deleted = repo::delete_entry(&state.db, user_id, day, entry_id).await?;
    if !deleted {
        return Err(AppError::not_found("Entry not found"));
    }

    let (totals, achieved) = repo::sync_achievement(&state.db, user_id, day).await?;
    Ok(Json(EntryDeletedResponse {
        totals: totals.display(),
        achieved,
    }))
}

#[instrument(skip(state, payload))]
pub async fn set_water(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<WaterRequest>,
) -> Result<Json<WaterResponse>, AppError> {
    let day = parse_day(&date)?;
    if payload.glasses < 0 {
        return Err(AppError::bad_request("glasses must not be negative"));
    }
    let glasses = repo::set_water_glasses(&state.db, user_id, day, payload.glasses).await?;
    Ok(Json(WaterResponse { glasses }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calendar_dates() {
        let day = parse_day("2024-06-01").unwrap();
        assert_eq!(day.to_string(), "2024-06-01");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_day("06/01/2024").is_err());
        assert!(parse_day("2024-13-01").is_err());
        assert!(parse_day("yesterday").is_err());
    }

    #[test]
    fn slot_names_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&MealSlot::Breakfast).unwrap(),
            "\"breakfast\""
        );
        let slot: MealSlot = serde_json::from_str("\"snacks\"").unwrap();
        assert_eq!(slot, MealSlot::Snacks);
    }
}
