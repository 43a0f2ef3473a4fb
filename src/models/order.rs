//! Order domain types and request/response shapes
//!
//! `Order`/`OrderItem` are the in-memory form the workflow and store trade
//! in; the SeaORM entities stay an implementation detail of the store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{order_items, orders};

/// Order payment status. The only transition is pending → success,
/// triggered by the mark-paid operation; deletion is tracked separately
/// through `deleted_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Success,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Success => write!(f, "success"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "success" => Ok(OrderStatus::Success),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Empty until the store allocates an id on first save
    pub id: String,
    pub user_id: i64,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub order_items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// 0 until the store assigns a row id
    pub id: i64,
    pub order_id: String,
    pub product_id: i64,
    pub quantity: i32,
    /// Unit price snapshot captured at order creation
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<(orders::Model, Vec<order_items::Model>)> for Order {
    fn from((order, items): (orders::Model, Vec<order_items::Model>)) -> Self {
        Order {
            id: order.id,
            user_id: order.user_id,
            total_amount: order.total_amount,
            // Rows only ever hold "pending" or "success"
            status: order.status.parse().unwrap_or(OrderStatus::Pending),
            created_at: order.created_at.with_timezone(&Utc),
            updated_at: order.updated_at.with_timezone(&Utc),
            deleted_at: order.deleted_at.map(|t| t.with_timezone(&Utc)),
            order_items: items.into_iter().map(OrderItem::from).collect(),
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(item: order_items::Model) -> Self {
        OrderItem {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
            created_at: item.created_at.with_timezone(&Utc),
            updated_at: item.updated_at.with_timezone(&Utc),
            deleted_at: item.deleted_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderInput {
    #[validate(range(min = 1, message = "user_id is required"))]
    pub user_id: i64,
    #[validate(length(min = 1, message = "order_items cannot be empty"), nested)]
    pub order_items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderItem {
    #[validate(range(min = 1, message = "product_id is required"))]
    pub product_id: i64,
    #[validate(range(min = 1, message = "quantity must be greater than zero"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersQuery {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkPaidResponse {
    pub success: bool,
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
