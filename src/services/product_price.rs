//! Product price lookup
//!
//! Read-only collaborator of the order workflow. The price returned here
//! is frozen into the order's line items at creation time.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{prelude::*, products};
use crate::error::OrderError;

#[async_trait]
pub trait PriceLookup: Send + Sync {
    /// Current unit price of a product; `NotFound` when the product is
    /// absent or soft-deleted.
    async fn get_price(&self, product_id: i64) -> Result<Decimal, OrderError>;
}

#[derive(Clone)]
pub struct SeaOrmPriceLookup {
    db: DatabaseConnection,
}

impl SeaOrmPriceLookup {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PriceLookup for SeaOrmPriceLookup {
    async fn get_price(&self, product_id: i64) -> Result<Decimal, OrderError> {
        let product = Products::find_by_id(product_id)
            .filter(products::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("product {} not found", product_id)))?;

        Ok(product.price)
    }
}
