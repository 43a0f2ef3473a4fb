//! Order HTTP handlers
//!
//! Thin adapters: translate wire requests into workflow calls and workflow
//! errors into HTTP statuses. All order state changes go through the
//! workflow, never straight to the database.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::OrderError;
use crate::models::order::{
    CreateOrderInput, ErrorResponse, MarkPaidResponse, Order, OrdersQuery, StatusMessage,
};
use crate::AppState;

pub fn error_response(err: OrderError) -> (StatusCode, Json<ErrorResponse>) {
    (
        err.status_code(),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// GET /v1/orders?user_id=
pub async fn get_orders(
    State(state): State<AppState>,
    Query(params): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>, (StatusCode, Json<ErrorResponse>)> {
    let orders = state
        .orders
        .find_all(params.user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(orders))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, (StatusCode, Json<ErrorResponse>)> {
    let order = state.orders.find_by_id(&id).await.map_err(error_response)?;
    Ok(Json(order))
}

/// POST /v1/orders/create
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<Order>), (StatusCode, Json<ErrorResponse>)> {
    let order = state.orders.create(body).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /v1/orders/{id}/pay
pub async fn mark_order_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarkPaidResponse>, (StatusCode, Json<ErrorResponse>)> {
    state.orders.mark_paid(&id).await.map_err(error_response)?;

    Ok(Json(MarkPaidResponse {
        success: true,
        order_id: id,
    }))
}

/// DELETE /v1/orders/delete/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusMessage>, (StatusCode, Json<ErrorResponse>)> {
    state.orders.delete(&id).await.map_err(error_response)?;

    Ok(Json(StatusMessage {
        message: "Order deleted successfully".to_string(),
    }))
}
