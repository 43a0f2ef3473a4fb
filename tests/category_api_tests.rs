mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    routing::{post, put},
    Router,
};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::json;

use commerce_backend::handlers::category;
use commerce_backend::services::order_workflow::OrderWorkflow;
use commerce_backend::AppState;

use crate::common::{InMemoryOrderStore, MapPriceLookup};

/// Category write routes. Input validation runs before any query, so the
/// rejection paths are exercisable without a database.
fn test_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::default(),
        orders: OrderWorkflow::new(
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(MapPriceLookup::new(&[])),
        ),
    };

    let app = Router::new()
        .route("/v1/categories/create", post(category::create_category))
        .route("/v1/categories/update/{id}", put(category::update_category))
        .with_state(state);

    TestServer::new(app).expect("test server")
}

#[tokio::test]
async fn test_update_category_rejects_empty_name() {
    let server = test_server();

    let response = server
        .put("/v1/categories/update/1")
        .json(&json!({ "name": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_category_rejects_empty_name() {
    let server = test_server();

    let response = server
        .post("/v1/categories/create")
        .json(&json!({ "name": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
