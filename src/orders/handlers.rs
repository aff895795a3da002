use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use anyhow::Context;
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    orders::{
        dto::{CreateOrderRequest, OrderResponse},
        repo::{self, OrderLine, StoreProduct},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/store/products", get(list_store_products))
        .route("/orders", post(create_order).get(list_orders))
}

#[instrument(skip(state))]
pub async fn list_store_products(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<StoreProduct>>, AppError> {
    let products = repo::list_store_products(&state.db).await?;
    Ok(Json(products))
}

#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    if payload.items.is_empty() {
        return Err(AppError::bad_request("Order must contain at least one item"));
    }

    // Prices come from the catalog, never from the client.
    let mut lines = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        if item.quantity <= 0 {
            return Err(AppError::bad_request("Quantity must be positive"));
        }
        let product = repo::find_store_product(&state.db, item.product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;
        let total_cents = line_total(product.price_cents, item.quantity)
            .ok_or_else(|| AppError::bad_request("Quantity too large"))?;
        lines.push(OrderLine {
            product_id: product.id,
            name: product.name,
            quantity: item.quantity,
            price_cents: product.price_cents,
            total_cents,
        });
    }
    let total_cents =
        order_total(&lines).ok_or_else(|| AppError::bad_request("Order total too large"))?;

    let order = repo::create_order(&state.db, user_id, &lines, total_cents).await?;
    info!(%user_id, order_id = %order.id, total_cents, "order created");

    let response = OrderResponse::try_from(order).context("decode stored order")?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = repo::list_orders(&state.db, user_id).await?;
    let responses = orders
        .into_iter()
        .map(OrderResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .context("decode stored orders")?;
    Ok(Json(responses))
}

/// Price one line. `quantity` comes straight off the wire, so the
/// multiplication is checked rather than trusted to stay in range.
fn line_total(price_cents: i64, quantity: i64) -> Option<i64> {
    price_cents.checked_mul(quantity)
}

fn order_total(lines: &[OrderLine]) -> Option<i64> {
    lines
        .iter()
        .try_fold(0i64, |acc, l| acc.checked_add(l.total_cents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn line(quantity: i64, price_cents: i64) -> OrderLine {
        OrderLine {
            product_id: Uuid::new_v4(),
            name: "granola".into(),
            quantity,
            price_cents,
            total_cents: price_cents * quantity,
        }
    }

    #[test]
    fn total_sums_line_totals() {
        let lines = [line(2, 350), line(1, 1200)];
        assert_eq!(order_total(&lines), Some(1900));
    }

    #[test]
    fn empty_order_totals_zero() {
        assert_eq!(order_total(&[]), Some(0));
    }

    #[test]
    fn huge_quantity_is_rejected_not_wrapped() {
        assert_eq!(line_total(3, i64::MAX / 2), None);
        assert_eq!(line_total(i64::MAX, 2), None);
        assert_eq!(line_total(499, 3), Some(1497));
    }

    #[test]
    fn total_overflow_across_lines_is_rejected() {
        let lines = [line(1, i64::MAX / 2 + 1), line(1, i64::MAX / 2 + 1)];
        assert_eq!(order_total(&lines), None);
    }

    #[test]
    fn order_lines_roundtrip_through_json() {
        let lines = vec![line(3, 499)];
        let value = serde_json::to_value(&lines).unwrap();
        let back: Vec<OrderLine> = serde_json::from_value(value).unwrap();
        assert_eq!(back, lines);
    }
}
