//! Product request/response shapes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: i64,
    /// Joined from the categories table; None when the category is gone
    pub category_name: Option<String>,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    #[validate(range(min = 1, message = "category_id is required"))]
    pub category_id: i64,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    #[validate(range(min = 1, message = "category_id is required"))]
    pub category_id: i64,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsQuery {
    pub limit: Option<u64>,
    pub page: Option<u64>,
}
