use std::env;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commerce_backend::handlers::{category, order, product};
use commerce_backend::services::order_store::SeaOrmOrderStore;
use commerce_backend::services::order_workflow::OrderWorkflow;
use commerce_backend::services::product_price::SeaOrmPriceLookup;
use commerce_backend::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,commerce_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let orders = OrderWorkflow::new(
        Arc::new(SeaOrmOrderStore::new(db.clone())),
        Arc::new(SeaOrmPriceLookup::new(db.clone())),
    );
    let state = AppState { db, orders };

    // Build router
    let app = Router::new()
        .route("/v1/orders", get(order::get_orders))
        .route("/v1/orders/{id}", get(order::get_order))
        .route("/v1/orders/create", post(order::create_order))
        .route("/v1/orders/{id}/pay", post(order::mark_order_paid))
        .route("/v1/orders/delete/{id}", delete(order::delete_order))
        .route("/v1/products", get(product::get_products))
        .route("/v1/products/{id}", get(product::get_product))
        .route("/v1/products/create", post(product::create_product))
        .route("/v1/products/update/{id}", put(product::update_product))
        .route("/v1/products/delete/{id}", delete(product::delete_product))
        .route("/v1/categories", get(category::get_categories))
        .route("/v1/categories/{id}", get(category::get_category))
        .route("/v1/categories/create", post(category::create_category))
        .route("/v1/categories/update/{id}", put(category::update_category))
        .route("/v1/categories/delete/{id}", delete(category::delete_category))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener.local_addr().expect("listener has no local addr")
    );

    axum::serve(listener, app).await.expect("Server error");
}
