//! Shared test fakes
//!
//! In-memory implementations of the order store and price lookup
//! contracts so workflow and handler tests run without a database. The
//! fake store follows the same id-allocation (daily count + re-check) and
//! upsert-by-(order_id, product_id) rules as the SeaORM store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use commerce_backend::error::OrderError;
use commerce_backend::models::order::Order;
use commerce_backend::services::order_store::{format_order_id, OrderStore};
use commerce_backend::services::order_workflow::OrderWorkflow;
use commerce_backend::services::product_price::PriceLookup;

#[derive(Default)]
struct Inner {
    orders: Vec<Order>,
    next_item_id: i64,
}

#[derive(Default)]
pub struct InMemoryOrderStore {
    inner: Mutex<Inner>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders held, soft-deleted included.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_all(&self, user_id: i64) -> Result<Vec<Order>, OrderError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && o.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Order, OrderError> {
        let inner = self.inner.lock().unwrap();
        inner
            .orders
            .iter()
            .find(|o| o.id == id && o.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| OrderError::NotFound(format!("order {} not found", id)))
    }

    async fn find_by_id_unscoped(&self, id: &str) -> Result<Order, OrderError> {
        let inner = self.inner.lock().unwrap();
        inner
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| OrderError::NotFound(format!("order {} not found", id)))
    }

    async fn save_order(&self, order: &mut Order) -> Result<(), OrderError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();

        if order.id.is_empty() {
            let today = now.date_naive();
            let count = inner
                .orders
                .iter()
                .filter(|o| o.created_at.date_naive() == today)
                .count() as u64;
            let id = format_order_id(today, count + 1);

            if inner.orders.iter().any(|o| o.id == id) {
                return Err(OrderError::Conflict("duplicate order detected".to_string()));
            }

            order.id = id;
            order.created_at = now;
            order.updated_at = now;
            inner.orders.push(Order {
                order_items: Vec::new(),
                ..order.clone()
            });
        } else {
            let stored = inner
                .orders
                .iter_mut()
                .find(|o| o.id == order.id && o.deleted_at.is_none())
                .ok_or_else(|| OrderError::NotFound(format!("order {} not found", order.id)))?;
            stored.total_amount = order.total_amount;
            stored.status = order.status;
            stored.updated_at = now;
            order.updated_at = now;
        }

        let idx = inner
            .orders
            .iter()
            .position(|o| o.id == order.id)
            .expect("order row exists");

        for item in order.order_items.iter_mut() {
            if item.id != 0 {
                if let Some(stored) = inner.orders[idx]
                    .order_items
                    .iter_mut()
                    .find(|s| s.id == item.id)
                {
                    stored.quantity = item.quantity;
                    stored.updated_at = now;
                    item.updated_at = now;
                }
                continue;
            }

            if let Some(stored) = inner.orders[idx]
                .order_items
                .iter_mut()
                .find(|s| s.product_id == item.product_id)
            {
                stored.quantity += item.quantity;
                stored.updated_at = now;
                item.id = stored.id;
                item.order_id = order.id.clone();
                item.quantity = stored.quantity;
                item.price = stored.price;
                item.created_at = stored.created_at;
                item.updated_at = now;
            } else {
                inner.next_item_id += 1;
                item.id = inner.next_item_id;
                item.order_id = order.id.clone();
                item.created_at = now;
                item.updated_at = now;
                inner.orders[idx].order_items.push(item.clone());
            }
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), OrderError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        for order in inner.orders.iter_mut().filter(|o| o.id == id) {
            order.deleted_at = Some(now);
            order.updated_at = now;
        }
        Ok(())
    }
}

pub struct MapPriceLookup {
    prices: HashMap<i64, Decimal>,
}

impl MapPriceLookup {
    pub fn new(prices: &[(i64, Decimal)]) -> Self {
        Self {
            prices: prices.iter().cloned().collect(),
        }
    }
}

#[async_trait]
impl PriceLookup for MapPriceLookup {
    async fn get_price(&self, product_id: i64) -> Result<Decimal, OrderError> {
        self.prices
            .get(&product_id)
            .copied()
            .ok_or_else(|| OrderError::NotFound(format!("product {} not found", product_id)))
    }
}

/// Workflow wired to fresh fakes; returns the store too so tests can
/// inspect persisted state directly.
pub fn test_workflow(prices: &[(i64, Decimal)]) -> (OrderWorkflow, Arc<InMemoryOrderStore>) {
    let store = Arc::new(InMemoryOrderStore::new());
    let workflow = OrderWorkflow::new(store.clone(), Arc::new(MapPriceLookup::new(prices)));
    (workflow, store)
}
