//! Integration tests for the storefront HTTP routes.
//!
//! Requests are driven through the router in-process; no socket is bound.

use axum::http::StatusCode;
use coffeecraft_integration_tests::{TEST_CHECKOUT_DELAY, TestApp};
use serde_json::json;

// =============================================================================
// Product Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_list_all_products() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 6);
    assert_eq!(products[0]["name"], "Classic Espresso");
    assert_eq!(products[0]["price"], "$3.99");
}

#[tokio::test]
async fn test_filter_products_by_category() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/products?category=pastry").await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 6]);

    let (_, all) = app.get("/api/products?category=all").await;
    assert_eq!(all.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_unknown_category_is_bad_request() {
    let app = TestApp::new();
    let (status, _) = app.get("/api/products?category=tea").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_detail() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/products/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "coldbrew");

    let (status, _) = app.get("/api/products/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart Tests
// =============================================================================

#[tokio::test]
async fn test_empty_cart() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 0);
    assert_eq!(body["subtotal"], "$0.00");
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_items_and_totals() {
    let app = TestApp::new();
    app.post("/api/cart/add", json!({"product_id": 1})).await;
    app.post("/api/cart/add", json!({"product_id": 1})).await;
    let (status, body) = app.post("/api/cart/add", json!({"product_id": 2})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 3);
    assert_eq!(body["subtotal"], "$13.47");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_id"], 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["line_price"], "$7.98");
    assert_eq!(items[1]["product_id"], 2);

    let (_, count) = app.get("/api/cart/count").await;
    assert_eq!(count["count"], 3);
}

#[tokio::test]
async fn test_add_unknown_product_is_ignored() {
    let app = TestApp::new();
    let (status, body) = app.post("/api/cart/add", json!({"product_id": 77})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 0);
    assert_eq!(app.store.write_count(), 0);
}

#[tokio::test]
async fn test_update_and_remove() {
    let app = TestApp::new();
    app.post("/api/cart/add", json!({"product_id": 4})).await;
    app.post("/api/cart/add", json!({"product_id": 5})).await;

    let (_, body) = app
        .post("/api/cart/update", json!({"product_id": 4, "delta": 2}))
        .await;
    assert_eq!(body["items"][0]["quantity"], 3);

    let (_, body) = app
        .post("/api/cart/update", json!({"product_id": 4, "delta": -3}))
        .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["product_id"], 5);

    let (_, body) = app.post("/api/cart/remove", json!({"product_id": 5})).await;
    assert_eq!(body["item_count"], 0);
}

#[tokio::test]
async fn test_clear_requires_confirmation() {
    let app = TestApp::new();
    app.post("/api/cart/add", json!({"product_id": 1})).await;

    let (status, _) = app.post("/api/cart/clear", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["item_count"], 1);

    let (status, cart) = app.post("/api/cart/clear", json!({"confirm": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 0);
}

// =============================================================================
// Checkout Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_checkout_empty_cart_conflicts() {
    let app = TestApp::new();
    let (status, body) = app.post("/api/cart/checkout", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!("Please add products to your cart before checking out")
    );

    let (_, notes) = app.get("/api/notifications").await;
    assert_eq!(notes[0]["event"]["type"], "checkout_failed");
    assert_eq!(notes[0]["severity"], "warning");
}

#[tokio::test(start_paused = true)]
async fn test_checkout_then_deferred_clear() {
    let app = TestApp::new();
    app.post("/api/cart/add", json!({"product_id": 6})).await;
    app.post("/api/cart/add", json!({"product_id": 6})).await;

    let (status, body) = app.post("/api/cart/checkout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "$12.98");
    assert_eq!(body["item_count"], 2);
    assert_eq!(body["clears_in_ms"], 2000);
    assert_eq!(body["message"], "Thanks for your purchase! Total: $12.98");

    // Still there until the delay elapses
    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["item_count"], 2);

    tokio::time::sleep(TEST_CHECKOUT_DELAY + std::time::Duration::from_millis(10)).await;

    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["item_count"], 0);
    assert_eq!(app.store.get("cart").as_deref(), Some("[]"));

    let (_, notes) = app.get("/api/notifications").await;
    let kinds: Vec<&str> = notes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["event"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "item_added",
            "item_added",
            "checkout_succeeded",
            "cart_cleared",
            "cart_closed"
        ]
    );
}

#[tokio::test]
async fn test_notifications_since() {
    let app = TestApp::new();
    app.post("/api/cart/add", json!({"product_id": 1})).await;
    app.post("/api/cart/remove", json!({"product_id": 1})).await;

    let (_, notes) = app.get("/api/notifications?since=1").await;
    let notes = notes.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["message"], "Product removed");
}
