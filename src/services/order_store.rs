//! Durable order persistence
//!
//! Owns the atomic save/update/soft-delete operations and the order-id
//! allocation scheme. The workflow talks to the [`OrderStore`] trait so
//! tests can substitute an in-memory fake; [`SeaOrmOrderStore`] is the
//! Postgres-backed implementation.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use crate::entities::{order_items, orders, prelude::*};
use crate::error::OrderError;
use crate::models::order::Order;

/// Bounded retry count for id-collision conflicts during creation.
/// The count-then-format scheme can race under concurrent writers; a
/// colliding transaction is retried with a fresh count, and the orders
/// primary key is the final backstop.
const MAX_ID_ATTEMPTS: usize = 3;

/// Format an order id as `ORD-YYYYMMDD-NNN` for the given calendar day
/// and daily sequence number (1-based).
pub fn format_order_id(day: NaiveDate, seq: u64) -> String {
    format!("ORD-{}-{:03}", day.format("%Y%m%d"), seq)
}

/// Whether a failed save attempt should be retried with a fresh daily
/// count. Only id-collision conflicts on the creation path are retried,
/// and only while the attempt budget lasts; every other error surfaces
/// to the caller unchanged.
fn should_retry_create(creating: bool, err: &OrderError, attempt: usize) -> bool {
    creating && attempt < MAX_ID_ATTEMPTS && matches!(err, OrderError::Conflict(_))
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All non-deleted orders for a user, items eagerly loaded.
    /// Empty vec, not an error, when the user has none.
    async fn find_all(&self, user_id: i64) -> Result<Vec<Order>, OrderError>;

    /// The non-deleted order with the given id, including items.
    async fn find_by_id(&self, id: &str) -> Result<Order, OrderError>;

    /// Like `find_by_id` but including soft-deleted rows. Used by the
    /// workflow's delete path to tell "already deleted" from "never
    /// existed".
    async fn find_by_id_unscoped(&self, id: &str) -> Result<Order, OrderError>;

    /// Persist the order and its items as one transaction. An order with
    /// an empty id gets a freshly allocated daily-sequence id; an order
    /// that already has an id is updated in place. Assigned ids, merged
    /// quantities and server timestamps are written back into `order`.
    async fn save_order(&self, order: &mut Order) -> Result<(), OrderError>;

    /// Set `deleted_at` unconditionally. The workflow checks for prior
    /// deletion before calling this.
    async fn delete(&self, id: &str) -> Result<(), OrderError>;
}

#[derive(Clone)]
pub struct SeaOrmOrderStore {
    db: DatabaseConnection,
}

impl SeaOrmOrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Body of `save_order`, executed inside an open transaction. Any
    /// error returns early; the caller rolls the transaction back.
    async fn save_in_txn(
        &self,
        txn: &DatabaseTransaction,
        order: &mut Order,
        creating: bool,
    ) -> Result<(), OrderError> {
        let now = Utc::now();

        if creating {
            let today = now.date_naive();
            let day_start = today.and_time(NaiveTime::MIN).and_utc().fixed_offset();
            let day_end = (today.and_time(NaiveTime::MIN).and_utc() + Duration::days(1))
                .fixed_offset();

            let count = Orders::find()
                .filter(orders::Column::CreatedAt.gte(day_start))
                .filter(orders::Column::CreatedAt.lt(day_end))
                .count(txn)
                .await?;

            let id = format_order_id(today, count + 1);

            // Best-effort guard against a race between the count and the
            // insert; the primary key constraint catches what this misses.
            if Orders::find_by_id(id.as_str()).one(txn).await?.is_some() {
                return Err(OrderError::Conflict("duplicate order detected".to_string()));
            }

            let row = orders::ActiveModel {
                id: Set(id),
                user_id: Set(order.user_id),
                total_amount: Set(order.total_amount),
                status: Set(order.status.to_string()),
                created_at: Set(now.fixed_offset()),
                updated_at: Set(now.fixed_offset()),
                deleted_at: Set(None),
            };
            let inserted = row.insert(txn).await.map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    OrderError::Conflict("duplicate order detected".to_string())
                }
                _ => OrderError::from(e),
            })?;

            order.id = inserted.id;
            order.created_at = now;
            order.updated_at = now;
        } else {
            let existing = Orders::find_by_id(order.id.as_str())
                .filter(orders::Column::DeletedAt.is_null())
                .one(txn)
                .await?
                .ok_or_else(|| OrderError::NotFound(format!("order {} not found", order.id)))?;

            let mut row: orders::ActiveModel = existing.into();
            row.total_amount = Set(order.total_amount);
            row.status = Set(order.status.to_string());
            row.updated_at = Set(now.fixed_offset());
            row.update(txn).await?;

            order.updated_at = now;
        }

        for item in order.order_items.iter_mut() {
            if item.id != 0 {
                // Re-saved item that already has a row: update in place.
                let row = order_items::ActiveModel {
                    id: Set(item.id),
                    quantity: Set(item.quantity),
                    updated_at: Set(now.fixed_offset()),
                    ..Default::default()
                };
                row.update(txn).await?;
                item.updated_at = now;
                continue;
            }

            let existing = OrderItems::find()
                .filter(order_items::Column::OrderId.eq(order.id.as_str()))
                .filter(order_items::Column::ProductId.eq(item.product_id))
                .one(txn)
                .await?;

            match existing {
                Some(found) => {
                    // Upsert-by-key: same product on the same order merges
                    // into the existing row. The stored price snapshot wins.
                    let merged = found.quantity + item.quantity;
                    let price = found.price;
                    let id = found.id;
                    let created_at = found.created_at;

                    let mut row: order_items::ActiveModel = found.into();
                    row.quantity = Set(merged);
                    row.updated_at = Set(now.fixed_offset());
                    row.update(txn).await?;

                    item.id = id;
                    item.order_id = order.id.clone();
                    item.quantity = merged;
                    item.price = price;
                    item.created_at = created_at.with_timezone(&Utc);
                    item.updated_at = now;
                }
                None => {
                    let row = order_items::ActiveModel {
                        order_id: Set(order.id.clone()),
                        product_id: Set(item.product_id),
                        quantity: Set(item.quantity),
                        price: Set(item.price),
                        created_at: Set(now.fixed_offset()),
                        updated_at: Set(now.fixed_offset()),
                        deleted_at: Set(None),
                        ..Default::default()
                    };
                    let inserted = row.insert(txn).await?;

                    item.id = inserted.id;
                    item.order_id = order.id.clone();
                    item.created_at = now;
                    item.updated_at = now;
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrderStore for SeaOrmOrderStore {
    async fn find_all(&self, user_id: i64) -> Result<Vec<Order>, OrderError> {
        let rows = Orders::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::DeletedAt.is_null())
            .find_with_related(OrderItems)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Order, OrderError> {
        let row = Orders::find_by_id(id)
            .filter(orders::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("order {} not found", id)))?;

        let items = row.find_related(OrderItems).all(&self.db).await?;
        Ok(Order::from((row, items)))
    }

    async fn find_by_id_unscoped(&self, id: &str) -> Result<Order, OrderError> {
        let row = Orders::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("order {} not found", id)))?;

        let items = row.find_related(OrderItems).all(&self.db).await?;
        Ok(Order::from((row, items)))
    }

    async fn save_order(&self, order: &mut Order) -> Result<(), OrderError> {
        let creating = order.id.is_empty();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let txn = self.db.begin().await?;

            match self.save_in_txn(&txn, order, creating).await {
                Ok(()) => {
                    txn.commit().await?;
                    info!(order_id = %order.id, user_id = order.user_id, "Order saved");
                    return Ok(());
                }
                Err(err) => {
                    // An uncommitted transaction also rolls back on drop;
                    // rolling back explicitly surfaces rollback failures.
                    txn.rollback().await.map_err(OrderError::from)?;

                    if should_retry_create(creating, &err, attempt) {
                        debug!(attempt, "Order id collision, retrying with a fresh count");
                        order.id.clear();
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<(), OrderError> {
        let now = Utc::now().fixed_offset();

        Orders::update_many()
            .col_expr(orders::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        info!(order_id = %id, "Order soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_order_id_pads_sequence() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(format_order_id(day, 1), "ORD-20250101-001");
        assert_eq!(format_order_id(day, 42), "ORD-20250101-042");
        assert_eq!(format_order_id(day, 999), "ORD-20250101-999");
    }

    #[test]
    fn test_format_order_id_uses_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_order_id(day, 7), "ORD-20251231-007");
        let next = day.succ_opt().unwrap();
        assert_eq!(format_order_id(next, 1), "ORD-20260101-001");
    }

    #[test]
    fn test_id_collision_retries_until_attempts_exhausted() {
        let conflict = OrderError::Conflict("duplicate order detected".to_string());

        // First two collisions trigger a fresh-count retry; the collision
        // on the final attempt surfaces to the caller.
        assert!(should_retry_create(true, &conflict, 1));
        assert!(should_retry_create(true, &conflict, 2));
        assert!(!should_retry_create(true, &conflict, MAX_ID_ATTEMPTS));
        assert!(!should_retry_create(true, &conflict, MAX_ID_ATTEMPTS + 1));
    }

    #[test]
    fn test_only_creation_conflicts_are_retried() {
        let conflict = OrderError::Conflict("duplicate order detected".to_string());
        let not_found = OrderError::NotFound("order ORD-20250101-001 not found".to_string());
        let internal = OrderError::Internal("connection reset".to_string());

        // Re-saves of an existing order never reallocate the id.
        assert!(!should_retry_create(false, &conflict, 1));
        // Non-conflict failures surface immediately.
        assert!(!should_retry_create(true, &not_found, 1));
        assert!(!should_retry_create(true, &internal, 1));
    }
}
