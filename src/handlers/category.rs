//! Category HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order as SortOrder, QueryFilter, QueryOrder, Set,
};
use validator::Validate;

use crate::entities::{categories, prelude::*};
use crate::models::category::{CategoryInput, CategoryResponse};
use crate::models::order::{ErrorResponse, StatusMessage};
use crate::AppState;

fn db_error(e: sea_orm::DbErr) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!(error = %e, "Category query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Database error: {}", e),
        }),
    )
}

/// GET /v1/categories
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let rows = Categories::find()
        .filter(categories::Column::DeletedAt.is_null())
        .order_by(categories::Column::Name, SortOrder::Asc)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let response = rows
        .into_iter()
        .map(|c| CategoryResponse {
            id: c.id,
            name: c.name,
        })
        .collect();

    Ok(Json(response))
}

/// GET /v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let row = Categories::find_by_id(id)
        .filter(categories::Column::DeletedAt.is_null())
        .one(&state.db)
        .await
        .map_err(db_error)?;

    match row {
        Some(c) => Ok(Json(CategoryResponse {
            id: c.id,
            name: c.name,
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("category {} not found", id),
            }),
        )),
    }
}

/// POST /v1/categories/create
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryResponse>), (StatusCode, Json<ErrorResponse>)> {
    body.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let now = Utc::now().fixed_offset();
    let row = categories::ActiveModel {
        name: Set(body.name),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let category = row.insert(&state.db).await.map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            id: category.id,
            name: category.name,
        }),
    ))
}

/// PUT /v1/categories/update/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CategoryInput>,
) -> Result<Json<CategoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    body.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let existing = Categories::find_by_id(id)
        .filter(categories::Column::DeletedAt.is_null())
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("category {} not found", id),
                }),
            )
        })?;

    let mut row: categories::ActiveModel = existing.into();
    row.name = Set(body.name);
    row.updated_at = Set(Utc::now().fixed_offset());
    let category = row.update(&state.db).await.map_err(db_error)?;

    Ok(Json(CategoryResponse {
        id: category.id,
        name: category.name,
    }))
}

/// DELETE /v1/categories/delete/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, (StatusCode, Json<ErrorResponse>)> {
    let now = Utc::now().fixed_offset();

    Categories::update_many()
        .col_expr(categories::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(categories::Column::UpdatedAt, Expr::value(now))
        .filter(categories::Column::Id.eq(id))
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(StatusMessage {
        message: "Category deleted successfully".to_string(),
    }))
}
