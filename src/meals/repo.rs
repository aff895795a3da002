use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::nutrition::{
    self, daily_totals, evaluate_achievement, AchievementChange, DailyTotals, Macros,
};
use crate::products::repo::Product;

/// Fixed set of periods a day's entries are bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "meal_slot", rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day: Date,
    pub slot: MealSlot,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub created_at: OffsetDateTime,
}

impl FoodEntry {
    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
        }
    }
}

const ENTRY_COLUMNS: &str =
    "id, user_id, day, slot, name, calories, protein_g, carbs_g, fat_g, created_at";

pub async fn list_day(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<Vec<FoodEntry>> {
    let rows = sqlx::query_as::<_, FoodEntry>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM food_entries
        WHERE user_id = $1 AND day = $2
        ORDER BY created_at ASC
        "#
    ))
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Log a catalog product into a meal slot. Macros the catalog does not carry
/// contribute zero rather than failing.
pub async fn insert_entry(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
    product: &Product,
) -> anyhow::Result<FoodEntry> {
    let entry = sqlx::query_as::<_, FoodEntry>(&format!(
        r#"
        INSERT INTO food_entries (user_id, day, slot, name, calories, protein_g, carbs_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {ENTRY_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(day)
    .bind(slot)
    .bind(&product.product_name)
    .bind(product.unit_calories)
    .bind(product.protein_g.unwrap_or(0.0))
    .bind(product.carbs_g.unwrap_or(0.0))
    .bind(product.fat_g.unwrap_or(0.0))
    .fetch_one(db)
    .await?;
    Ok(entry)
}

pub async fn delete_entry(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
    entry_id: Uuid,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"DELETE FROM food_entries WHERE id = $1 AND user_id = $2 AND day = $3"#,
    )
    .bind(entry_id)
    .bind(user_id)
    .bind(day)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn is_achieved(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<bool> {
    let row: Option<(Date,)> = sqlx::query_as(
        r#"SELECT day FROM achievement_days WHERE user_id = $1 AND day = $2"#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_optional(db)
    .await?;
    Ok(row.is_some())
}

pub async fn achievement_days(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Date>> {
    let rows: Vec<(Date,)> = sqlx::query_as(
        r#"SELECT day FROM achievement_days WHERE user_id = $1 ORDER BY day DESC"#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(d,)| d).collect())
}

/// Recompute the day's totals and bring achievement membership in line with
/// them. Runs after every meal-log mutation; day reads go through
/// [`apply_achievement`] as well, so membership left stale by a failed sync
/// heals on the next read. Returns the recomputed totals and whether the day
/// now counts.
pub async fn sync_achievement(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
) -> anyhow::Result<(DailyTotals, bool)> {
    let entries = list_day(db, user_id, day).await?;
    let totals = daily_totals(entries.iter().map(FoodEntry::macros));
    let achieved = apply_achievement(db, user_id, day, &totals).await?;
    Ok((totals, achieved))
}

/// Bring achievement membership in line with the given unclamped totals.
/// Returns whether the day counts afterwards.
pub async fn apply_achievement(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
    totals: &DailyTotals,
) -> anyhow::Result<bool> {
    let already = is_achieved(db, user_id, day).await?;

    match evaluate_achievement(totals, already) {
        Some(AchievementChange::Add) => {
            sqlx::query(
                r#"
                INSERT INTO achievement_days (user_id, day)
                VALUES ($1, $2)
                ON CONFLICT (user_id, day) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(day)
            .execute(db)
            .await?;
            info!(%user_id, %day, calories = totals.calories, "achievement day added");
            Ok(true)
        }
        Some(AchievementChange::Remove) => {
            sqlx::query(r#"DELETE FROM achievement_days WHERE user_id = $1 AND day = $2"#)
                .bind(user_id)
                .bind(day)
                .execute(db)
                .await?;
            info!(%user_id, %day, calories = totals.calories, "achievement day removed");
            Ok(false)
        }
        None => Ok(already),
    }
}

pub async fn water_glasses(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as(
        r#"SELECT glasses FROM water_intake WHERE user_id = $1 AND day = $2"#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_optional(db)
    .await?;
    Ok(row.map(|(g,)| g).unwrap_or(0))
}

pub async fn set_water_glasses(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
    glasses: i32,
) -> anyhow::Result<i32> {
    let glasses = glasses.clamp(0, nutrition::WATER_GLASSES_MAX);
    sqlx::query(
        r#"
        INSERT INTO water_intake (user_id, day, glasses)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, day) DO UPDATE SET glasses = EXCLUDED.glasses
        "#,
    )
    .bind(user_id)
    .bind(day)
    .bind(glasses)
    .execute(db)
    .await?;
    Ok(glasses)
}
