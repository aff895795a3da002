use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::meals::repo::{FoodEntry, MealSlot};
use crate::nutrition::DailyTotals;

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub slot: MealSlot,
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub glasses: i32,
}

#[derive(Debug, Serialize)]
pub struct WaterResponse {
    pub glasses: i32,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub created_at: OffsetDateTime,
}

impl From<FoodEntry> for EntryView {
    fn from(e: FoodEntry) -> Self {
        Self {
            id: e.id,
            name: e.name,
            calories: e.calories,
            protein_g: e.protein_g,
            carbs_g: e.carbs_g,
            fat_g: e.fat_g,
            created_at: e.created_at,
        }
    }
}

/// One meal slot of a day: its entries plus their unclamped sums.
#[derive(Debug, Serialize)]
pub struct SlotView {
    pub slot: MealSlot,
    pub entries: Vec<EntryView>,
    pub totals: DailyTotals,
}

/// Everything the home screen shows for one calendar day. `totals` carries
/// the display clamps; the per-slot sums do not.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: Date,
    pub slots: Vec<SlotView>,
    pub totals: DailyTotals,
    pub achieved: bool,
    pub water_glasses: i32,
}

#[derive(Debug, Serialize)]
pub struct EntryCreatedResponse {
    pub entry: EntryView,
    pub totals: DailyTotals,
    pub achieved: bool,
}

#[derive(Debug, Serialize)]
pub struct EntryDeletedResponse {
    pub totals: DailyTotals,
    pub achieved: bool,
}
