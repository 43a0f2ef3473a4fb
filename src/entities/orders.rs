//! SeaORM Entity for orders
//!
//! An order is identified by a human-readable id (`ORD-YYYYMMDD-NNN`)
//! allocated by the order store at creation. Rows are soft-deleted by
//! setting `deleted_at`; standard lookups filter those out.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Order id in `ORD-YYYYMMDD-NNN` format, immutable after creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user
    pub user_id: i64,
    /// Sum of price * quantity over the order's items, fixed at creation
    pub total_amount: Decimal,
    /// "pending" or "success"
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    /// Soft-delete marker
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
