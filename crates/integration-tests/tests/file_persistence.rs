//! Integration tests for the cart over the file-backed store.

use std::sync::Arc;

use coffeecraft_core::ProductId;
use coffeecraft_storefront::cart::Cart;
use coffeecraft_storefront::catalog::Catalog;
use coffeecraft_storefront::storage::{FileStore, KeyValueStore};

fn load(store: &Arc<FileStore>) -> Cart {
    Cart::load(Arc::new(Catalog::builtin()), store.clone(), "cart")
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));

    {
        let mut cart = load(&store);
        cart.add_item(ProductId::new(3));
        cart.add_item(ProductId::new(1));
        cart.add_item(ProductId::new(3));
    }

    let cart = load(&store);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.entries()[0].product_id, ProductId::new(3));
    assert_eq!(cart.entries()[0].quantity, 2);
    assert_eq!(cart.total().display(), "$12.97");
}

#[test]
fn test_corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cart.json"), "][").unwrap();
    let store = Arc::new(FileStore::new(dir.path()));

    let mut cart = load(&store);
    assert!(cart.is_empty());

    // The next mutation overwrites the corrupt value
    cart.add_item(ProductId::new(2));
    let raw = store.load("cart").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["id"], 2);
    assert_eq!(value[0]["quantity"], 1);
}

#[test]
fn test_legacy_payload_with_extra_fields_loads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cart.json"),
        r#"[{"id":4,"nombre":"Cappuccino","precio":4.99,"quantity":3},{"id":9,"quantity":1}]"#,
    )
    .unwrap();
    let store = Arc::new(FileStore::new(dir.path()));

    let cart = load(&store);
    assert_eq!(cart.entries().len(), 1);
    assert_eq!(cart.quantity_of(ProductId::new(4)), 3);
}
