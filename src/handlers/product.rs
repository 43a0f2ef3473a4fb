//! Product HTTP handlers, pass-through CRUD against the products table

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order as SortOrder, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use validator::Validate;

use crate::entities::{categories, prelude::*, products};
use crate::models::order::{ErrorResponse, StatusMessage};
use crate::models::product::{
    CreateProductInput, ProductResponse, ProductsQuery, UpdateProductInput,
};
use crate::AppState;

fn db_error(e: sea_orm::DbErr) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!(error = %e, "Product query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Database error: {}", e),
        }),
    )
}

fn validation_error(e: validator::ValidationErrors) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn not_found(id: i64) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("product {} not found", id),
        }),
    )
}

fn to_response(product: products::Model, category_name: Option<String>) -> ProductResponse {
    ProductResponse {
        id: product.id,
        name: product.name,
        description: product.description,
        price: product.price,
        stock: product.stock,
        category_id: product.category_id,
        category_name,
        image_url: product.image_url,
    }
}

/// GET /v1/products?limit=&page=
pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<ProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let mut query = Products::find()
        .filter(products::Column::DeletedAt.is_null())
        .order_by(products::Column::Id, SortOrder::Asc);

    if let Some(limit) = params.limit {
        let page = params.page.unwrap_or(1).max(1);
        query = query.limit(limit).offset((page - 1) * limit);
    }

    let rows = query.all(&state.db).await.map_err(db_error)?;

    let category_ids: Vec<i64> = rows.iter().map(|p| p.category_id).collect();
    let names: HashMap<i64, String> = Categories::find()
        .filter(categories::Column::Id.is_in(category_ids))
        .all(&state.db)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let response = rows
        .into_iter()
        .map(|p| {
            let name = names.get(&p.category_id).cloned();
            to_response(p, name)
        })
        .collect();

    Ok(Json(response))
}

/// GET /v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ErrorResponse>)> {
    let row = Products::find_by_id(id)
        .filter(products::Column::DeletedAt.is_null())
        .find_also_related(Categories)
        .one(&state.db)
        .await
        .map_err(db_error)?;

    match row {
        Some((product, category)) => Ok(Json(to_response(product, category.map(|c| c.name)))),
        None => Err(not_found(id)),
    }
}

/// POST /v1/products/create
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<ProductResponse>), (StatusCode, Json<ErrorResponse>)> {
    body.validate().map_err(validation_error)?;

    let now = Utc::now().fixed_offset();
    let row = products::ActiveModel {
        name: Set(body.name),
        description: Set(body.description),
        price: Set(body.price),
        stock: Set(body.stock),
        category_id: Set(body.category_id),
        image_url: Set(body.image_url),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let product = row.insert(&state.db).await.map_err(db_error)?;

    let category = Categories::find_by_id(product.category_id)
        .one(&state.db)
        .await
        .map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(to_response(product, category.map(|c| c.name))),
    ))
}

/// PUT /v1/products/update/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductInput>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ErrorResponse>)> {
    body.validate().map_err(validation_error)?;

    let existing = Products::find_by_id(id)
        .filter(products::Column::DeletedAt.is_null())
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(id))?;

    let mut row: products::ActiveModel = existing.into();
    row.name = Set(body.name);
    row.description = Set(body.description);
    row.price = Set(body.price);
    row.stock = Set(body.stock);
    row.category_id = Set(body.category_id);
    row.image_url = Set(body.image_url);
    row.updated_at = Set(Utc::now().fixed_offset());
    let product = row.update(&state.db).await.map_err(db_error)?;

    let category = Categories::find_by_id(product.category_id)
        .one(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(to_response(product, category.map(|c| c.name))))
}

/// DELETE /v1/products/delete/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, (StatusCode, Json<ErrorResponse>)> {
    let now = Utc::now().fixed_offset();

    Products::update_many()
        .col_expr(products::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(products::Column::UpdatedAt, Expr::value(now))
        .filter(products::Column::Id.eq(id))
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(StatusMessage {
        message: "Product deleted successfully".to_string(),
    }))
}
