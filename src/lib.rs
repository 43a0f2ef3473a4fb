// src/lib.rs

use sea_orm::DatabaseConnection;
use services::order_workflow::OrderWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub orders: OrderWorkflow,
}

pub mod entities {
    pub mod prelude;

    pub mod categories;
    pub mod order_items;
    pub mod orders;
    pub mod products;
}

pub mod services {
    pub mod order_store;
    pub mod order_workflow;
    pub mod product_price;
}

pub mod error;
pub mod handlers;
pub mod models;
