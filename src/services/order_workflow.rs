//! Order workflow
//!
//! Business rules the store alone cannot enforce: input validation, price
//! resolution, total computation, the mark-paid transition and
//! soft-deletion checks. Dependencies are injected as capability traits so
//! the workflow runs unchanged against in-memory fakes in tests.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info};
use validator::Validate;

use crate::error::OrderError;
use crate::models::order::{CreateOrderInput, Order, OrderItem, OrderStatus};
use crate::services::order_store::OrderStore;
use crate::services::product_price::PriceLookup;

#[derive(Clone)]
pub struct OrderWorkflow {
    store: Arc<dyn OrderStore>,
    prices: Arc<dyn PriceLookup>,
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn OrderStore>, prices: Arc<dyn PriceLookup>) -> Self {
        Self { store, prices }
    }

    /// Validate, price and persist a new order. Returns the fully priced,
    /// persisted order with its allocated id.
    pub async fn create(&self, input: CreateOrderInput) -> Result<Order, OrderError> {
        if input.order_items.is_empty() {
            return Err(OrderError::Validation(
                "order_items cannot be empty".to_string(),
            ));
        }
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let now = Utc::now();
        let mut order = Order {
            id: String::new(),
            user_id: input.user_id,
            total_amount: Decimal::ZERO,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            order_items: Vec::with_capacity(input.order_items.len()),
        };

        for item in &input.order_items {
            let price = self.prices.get_price(item.product_id).await.map_err(|e| {
                error!(product_id = item.product_id, error = %e, "Price lookup failed");
                OrderError::Upstream(format!(
                    "price lookup failed for product {}: {}",
                    item.product_id, e
                ))
            })?;

            order.total_amount += price * Decimal::from(item.quantity);
            order.order_items.push(OrderItem {
                id: 0,
                order_id: String::new(),
                product_id: item.product_id,
                quantity: item.quantity,
                price,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            });
        }

        self.store.save_order(&mut order).await?;

        info!(
            order_id = %order.id,
            user_id = order.user_id,
            total_amount = %order.total_amount,
            "Order created"
        );
        Ok(order)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Order, OrderError> {
        if id.is_empty() {
            return Err(OrderError::InvalidArgument("order id is empty".to_string()));
        }
        self.store.find_by_id(id).await
    }

    pub async fn find_all(&self, user_id: i64) -> Result<Vec<Order>, OrderError> {
        if user_id <= 0 {
            return Err(OrderError::InvalidArgument("invalid user id".to_string()));
        }
        self.store.find_all(user_id).await
    }

    /// Same contract as `find_all`; separate read entry kept for the RPC
    /// callers.
    pub async fn list_by_user_id(&self, user_id: i64) -> Result<Vec<Order>, OrderError> {
        self.find_all(user_id).await
    }

    /// Transition an order to `success`. The only supported status
    /// transition; repeating it is harmless.
    pub async fn mark_paid(&self, id: &str) -> Result<(), OrderError> {
        let mut order = self.find_by_id(id).await?;
        order.status = OrderStatus::Success;
        self.update(&mut order).await?;

        info!(order_id = %id, "Order marked as paid");
        Ok(())
    }

    /// Re-save an existing order, reusing the store's upsert-by-line-item
    /// behavior. Persistence primitive underlying `mark_paid`.
    pub async fn update(&self, order: &mut Order) -> Result<(), OrderError> {
        if order.id.is_empty() {
            return Err(OrderError::InvalidArgument("order id is empty".to_string()));
        }
        self.store.save_order(order).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), OrderError> {
        if id.is_empty() {
            return Err(OrderError::InvalidArgument("order id is empty".to_string()));
        }

        let order = self.store.find_by_id_unscoped(id).await?;
        if order.deleted_at.is_some() {
            return Err(OrderError::AlreadyDeleted(format!(
                "order {} already deleted",
                id
            )));
        }

        self.store.delete(id).await?;
        info!(order_id = %id, "Order deleted");
        Ok(())
    }
}
