//! Integration tests for cart invariants over longer operation sequences.

use std::collections::HashMap;
use std::sync::Arc;

use coffeecraft_core::ProductId;
use coffeecraft_storefront::cart::Cart;
use coffeecraft_storefront::catalog::Catalog;
use coffeecraft_storefront::storage::MemoryStore;
use rust_decimal::Decimal;

fn fresh_cart() -> (Cart, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cart = Cart::load(Arc::new(Catalog::builtin()), store.clone(), "cart");
    (cart, store)
}

fn expected_total(cart: &Cart) -> Decimal {
    cart.entries()
        .iter()
        .map(|e| {
            let price = cart.catalog().get(e.product_id).unwrap().price.amount;
            price * Decimal::from(e.quantity)
        })
        .sum()
}

fn assert_invariants(cart: &Cart) {
    let mut seen = std::collections::HashSet::new();
    for entry in cart.entries() {
        assert!(seen.insert(entry.product_id), "duplicate line");
        assert!(entry.quantity > 0, "non-positive quantity");
        assert!(cart.catalog().contains(entry.product_id));
    }
    let sum: u64 = cart.entries().iter().map(|e| u64::from(e.quantity)).sum();
    assert_eq!(cart.item_count(), sum);
    assert_eq!(cart.total().amount, expected_total(cart));
}

#[test]
fn test_adds_count_per_product() {
    let (mut cart, _) = fresh_cart();
    // Includes unknown ids 0 and 7
    let sequence = [1, 2, 3, 1, 6, 0, 2, 1, 7, 5, 5, 4, 6, 1];

    let mut counts: HashMap<i32, u32> = HashMap::new();
    let mut order: Vec<i32> = Vec::new();
    for n in sequence {
        cart.add_item(ProductId::new(n));
        if (1..=6).contains(&n) {
            if !counts.contains_key(&n) {
                order.push(n);
            }
            *counts.entry(n).or_default() += 1;
        }
        assert_invariants(&cart);
    }

    let actual: Vec<(i32, u32)> = cart
        .entries()
        .iter()
        .map(|e| (e.product_id.as_i32(), e.quantity))
        .collect();
    let expected: Vec<(i32, u32)> = order.iter().map(|n| (*n, counts[n])).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_mixed_operations_hold_invariants() {
    let (mut cart, _) = fresh_cart();

    for round in 0..20_i32 {
        let id = ProductId::new(round % 7);
        match round % 4 {
            0 | 1 => cart.add_item(id),
            2 => cart.update_quantity(id, if round % 3 == 0 { -2 } else { 3 }),
            _ => cart.remove_item(ProductId::new((round + 1) % 7)),
        }
        assert_invariants(&cart);
    }
}

#[test]
fn test_add_then_decrement_empties_cart() {
    let (mut cart, store) = fresh_cart();
    cart.add_item(ProductId::new(1));
    cart.update_quantity(ProductId::new(1), -1);

    assert!(cart.is_empty());
    assert_eq!(store.get("cart").as_deref(), Some("[]"));
}

#[test]
fn test_reload_preserves_order_and_quantities() {
    let (mut cart, store) = fresh_cart();
    for n in [6, 3, 6, 1, 3, 6] {
        cart.add_item(ProductId::new(n));
    }
    cart.update_quantity(ProductId::new(1), 4);

    let reloaded = Cart::load(Arc::new(Catalog::builtin()), store, "cart");
    assert_eq!(reloaded.entries(), cart.entries());
    assert_eq!(reloaded.total(), cart.total());
}

#[test]
fn test_reload_against_smaller_catalog_drops_missing_products() {
    let (mut cart, store) = fresh_cart();
    cart.add_item(ProductId::new(2));
    cart.add_item(ProductId::new(5));

    let trimmed: Vec<_> = Catalog::builtin()
        .products()
        .iter()
        .filter(|p| p.id != ProductId::new(2))
        .cloned()
        .collect();
    let reloaded = Cart::load(Arc::new(Catalog::new(trimmed).unwrap()), store, "cart");

    assert_eq!(reloaded.entries().len(), 1);
    assert_eq!(reloaded.quantity_of(ProductId::new(5)), 1);
}
