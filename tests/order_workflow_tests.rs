mod common;

use chrono::Utc;
use rust_decimal_macros::dec;

use commerce_backend::error::OrderError;
use commerce_backend::models::order::{
    CreateOrderInput, CreateOrderItem, OrderItem, OrderStatus,
};

use crate::common::test_workflow;

fn order_input(user_id: i64, items: &[(i64, i32)]) -> CreateOrderInput {
    CreateOrderInput {
        user_id,
        order_items: items
            .iter()
            .map(|&(product_id, quantity)| CreateOrderItem {
                product_id,
                quantity,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_create_order_prices_and_persists() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);

    let order = workflow
        .create(order_input(42, &[(7, 2)]))
        .await
        .expect("create should succeed");

    assert_eq!(order.user_id, 42);
    assert_eq!(order.total_amount, dec!(30.0));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.order_items.len(), 1);
    assert_eq!(order.order_items[0].product_id, 7);
    assert_eq!(order.order_items[0].quantity, 2);
    assert_eq!(order.order_items[0].price, dec!(15.0));

    let today = Utc::now().format("%Y%m%d").to_string();
    assert_eq!(order.id, format!("ORD-{}-001", today));

    let fetched = workflow.find_by_id(&order.id).await.unwrap();
    assert_eq!(fetched.total_amount, dec!(30.0));
    assert_eq!(fetched.order_items.len(), 1);
}

#[tokio::test]
async fn test_create_order_sums_multiple_items() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0)), (8, dec!(2.5))]);

    let order = workflow
        .create(order_input(1, &[(7, 2), (8, 3)]))
        .await
        .unwrap();

    assert_eq!(order.total_amount, dec!(37.5));
    assert_eq!(order.order_items.len(), 2);
}

#[tokio::test]
async fn test_create_order_empty_items_fails_validation() {
    let (workflow, store) = test_workflow(&[(7, dec!(15.0))]);

    let err = workflow.create(order_input(42, &[])).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_create_order_zero_quantity_fails_validation() {
    let (workflow, store) = test_workflow(&[(7, dec!(15.0))]);

    let err = workflow.create(order_input(42, &[(7, 0)])).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_create_order_unknown_product_fails_upstream() {
    let (workflow, store) = test_workflow(&[(7, dec!(15.0))]);

    let err = workflow
        .create(order_input(42, &[(999, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Upstream(_)));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_same_day_orders_get_sequential_ids() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);

    let first = workflow.create(order_input(1, &[(7, 1)])).await.unwrap();
    let second = workflow.create(order_input(2, &[(7, 1)])).await.unwrap();

    let today = Utc::now().format("%Y%m%d").to_string();
    assert_eq!(first.id, format!("ORD-{}-001", today));
    assert_eq!(second.id, format!("ORD-{}-002", today));
}

#[tokio::test]
async fn test_mark_paid_missing_order_is_not_found() {
    let (workflow, store) = test_workflow(&[]);

    let err = workflow.mark_paid("ORD-20250101-001").await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_mark_paid_sets_success_and_is_idempotent() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);
    let order = workflow.create(order_input(42, &[(7, 2)])).await.unwrap();

    workflow.mark_paid(&order.id).await.unwrap();
    let fetched = workflow.find_by_id(&order.id).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Success);

    // Second call is harmless and the item quantities do not change.
    workflow.mark_paid(&order.id).await.unwrap();
    let fetched = workflow.find_by_id(&order.id).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Success);
    assert_eq!(fetched.order_items.len(), 1);
    assert_eq!(fetched.order_items[0].quantity, 2);
    assert_eq!(fetched.total_amount, dec!(30.0));
}

#[tokio::test]
async fn test_delete_hides_order_and_rejects_second_delete() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);
    let order = workflow.create(order_input(42, &[(7, 2)])).await.unwrap();

    workflow.delete(&order.id).await.unwrap();

    let err = workflow.find_by_id(&order.id).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
    assert!(workflow.find_all(42).await.unwrap().is_empty());

    let err = workflow.delete(&order.id).await.unwrap_err();
    assert!(matches!(err, OrderError::AlreadyDeleted(_)));
}

#[tokio::test]
async fn test_update_of_deleted_order_is_not_found() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);
    let mut order = workflow.create(order_input(42, &[(7, 2)])).await.unwrap();

    workflow.delete(&order.id).await.unwrap();

    // The hidden row must stay untouched rather than being silently updated.
    order.status = OrderStatus::Success;
    let err = workflow.update(&mut order).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_is_permitted_for_paid_orders() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);
    let order = workflow.create(order_input(42, &[(7, 2)])).await.unwrap();

    workflow.mark_paid(&order.id).await.unwrap();
    workflow.delete(&order.id).await.unwrap();

    let err = workflow.find_by_id(&order.id).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn test_resave_merges_line_item_quantity() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);
    let mut order = workflow.create(order_input(42, &[(7, 2)])).await.unwrap();

    // Re-save with a fresh line for the same product: the store merges it
    // into the existing row instead of duplicating.
    let now = Utc::now();
    order.order_items.push(OrderItem {
        id: 0,
        order_id: String::new(),
        product_id: 7,
        quantity: 3,
        price: dec!(15.0),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    });
    workflow.update(&mut order).await.unwrap();

    let fetched = workflow.find_by_id(&order.id).await.unwrap();
    assert_eq!(fetched.order_items.len(), 1);
    assert_eq!(fetched.order_items[0].quantity, 5);
}

#[tokio::test]
async fn test_find_all_rejects_unset_user_id() {
    let (workflow, _store) = test_workflow(&[]);

    let err = workflow.find_all(0).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidArgument(_)));
    let err = workflow.list_by_user_id(0).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_find_by_id_rejects_empty_id() {
    let (workflow, _store) = test_workflow(&[]);

    let err = workflow.find_by_id("").await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_find_all_returns_empty_for_user_without_orders() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);
    workflow.create(order_input(1, &[(7, 1)])).await.unwrap();

    let orders = workflow.find_all(2).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_list_by_user_id_matches_find_all() {
    let (workflow, _store) = test_workflow(&[(7, dec!(15.0))]);
    workflow.create(order_input(42, &[(7, 1)])).await.unwrap();

    let via_find_all = workflow.find_all(42).await.unwrap();
    let via_list = workflow.list_by_user_id(42).await.unwrap();
    assert_eq!(via_find_all, via_list);
    assert_eq!(via_list.len(), 1);
}
