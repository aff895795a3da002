use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoreProduct {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
}

/// One priced line of an order, denormalized into the order document so the
/// order keeps reading the same even if the store price later changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: serde_json::Value,
    pub total_cents: i64,
    pub status: String,
    pub created_at: OffsetDateTime,
}

pub async fn list_store_products(db: &PgPool) -> anyhow::Result<Vec<StoreProduct>> {
    let rows = sqlx::query_as::<_, StoreProduct>(
        r#"SELECT id, name, price_cents FROM store_products ORDER BY name ASC"#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_store_product(db: &PgPool, id: Uuid) -> anyhow::Result<Option<StoreProduct>> {
    let row = sqlx::query_as::<_, StoreProduct>(
        r#"SELECT id, name, price_cents FROM store_products WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn create_order(
    db: &PgPool,
    user_id: Uuid,
    lines: &[OrderLine],
    total_cents: i64,
) -> anyhow::Result<Order> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (user_id, items, total_cents, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING id, user_id, items, total_cents, status, created_at
        "#,
    )
    .bind(user_id)
    .bind(serde_json::to_value(lines)?)
    .bind(total_cents)
    .fetch_one(db)
    .await?;
    Ok(order)
}

pub async fn list_orders(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, user_id, items, total_cents, status, created_at
        FROM orders
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
