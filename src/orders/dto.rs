use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::orders::repo::{Order, OrderLine};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub items: Vec<OrderLine>,
    pub total_cents: i64,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<Order> for OrderResponse {
    type Error = serde_json::Error;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        Ok(Self {
            id: order.id,
            items: serde_json::from_value(order.items)?,
            total_cents: order.total_cents,
            status: order.status,
            created_at: order.created_at,
        })
    }
}
