//! The cart state engine.
//!
//! A [`Cart`] is an ordered list of [`CartEntry`] values tied to a catalog, a
//! key-value store and a set of observers. Every mutation runs to completion,
//! writes the full cart back to storage, then emits a [`CartEvent`].
//!
//! Invariants held after every operation:
//!
//! - at most one entry per product id, in the order products were first added
//! - every quantity is at least 1
//! - every entry references a product in the catalog

mod persist;

use std::sync::Arc;

use coffeecraft_core::{Price, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{Catalog, Product};
use crate::checkout::{CheckoutError, Receipt};
use crate::events::{CartEvent, CartObserver};
use crate::storage::KeyValueStore;

/// One line of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A cart entry joined with its catalog product.
#[derive(Debug, Clone, Copy)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
}

impl CartLine<'_> {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopping cart.
pub struct Cart {
    catalog: Arc<Catalog>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    entries: Vec<CartEntry>,
    observers: Vec<Arc<dyn CartObserver>>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("key", &self.key)
            .field("entries", &self.entries)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Load the cart stored under `key`.
    ///
    /// A missing value, a read error or an unparseable value all yield an
    /// empty cart. Stored lines for products not in `catalog` are dropped.
    #[instrument(skip(catalog, store))]
    pub fn load(catalog: Arc<Catalog>, store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        let entries = match store.load(key) {
            Ok(Some(raw)) => persist::decode(&raw, &catalog).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored cart is unreadable, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                Vec::new()
            }
        };

        tracing::info!(lines = entries.len(), "Cart loaded");

        Self {
            catalog,
            store,
            key: key.to_string(),
            entries,
            observers: Vec::new(),
        }
    }

    /// Register an observer for all subsequent events.
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) {
        self.observers.push(observer);
    }

    /// The catalog this cart resolves products against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Entries joined with their products, in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = CartLine<'_>> {
        self.entries.iter().filter_map(|entry| {
            self.catalog.get(entry.product_id).map(|product| CartLine {
                product,
                quantity: entry.quantity,
            })
        })
    }

    /// Quantity held for `product_id`, or zero.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.position(product_id)
            .and_then(|i| self.entries.get(i))
            .map_or(0, |e| e.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities (not the number of distinct lines).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of quantity times the current catalog price over all lines.
    ///
    /// Saturates at [`rust_decimal::Decimal::MAX`] instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Price {
        let zero = Price::zero(self.catalog.currency());
        self.lines()
            .fold(zero, |acc, line| acc.plus(&line.line_total()))
    }

    /// Add one unit of `product_id`.
    ///
    /// Unknown products are ignored. An existing line is incremented, otherwise
    /// a new line with quantity 1 is appended.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn add_item(&mut self, product_id: ProductId) {
        if !self.catalog.contains(product_id) {
            tracing::debug!("Ignoring add for unknown product");
            return;
        }

        match self.entries.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(1),
            None => self.entries.push(CartEntry {
                product_id,
                quantity: 1,
            }),
        }

        self.persist();
        self.emit(&CartEvent::ItemAdded { product_id });
    }

    /// Remove the line for `product_id`. Does nothing if there is none.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: ProductId) {
        let Some(index) = self.position(product_id) else {
            return;
        };
        self.entries.remove(index);

        self.persist();
        self.emit(&CartEvent::ItemRemoved { product_id });
    }

    /// Change the quantity of an existing line by `delta`.
    ///
    /// If the result is zero or below, the line is removed as if by
    /// [`Cart::remove_item`]. Missing lines are ignored.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i32) {
        let Some(index) = self.position(product_id) else {
            return;
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };

        let updated = i64::from(entry.quantity) + i64::from(delta);
        if updated <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        if quantity == entry.quantity {
            return;
        }
        entry.quantity = quantity;

        self.persist();
        self.emit(&CartEvent::QuantityChanged {
            product_id,
            quantity,
        });
    }

    /// Empty the cart.
    ///
    /// Callers are expected to confirm with the user first. Clearing an
    /// empty cart neither writes nor emits.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();

        self.persist();
        self.emit(&CartEvent::CartCleared);
    }

    /// Validate and price the cart for checkout.
    ///
    /// On success emits [`CartEvent::CheckoutSucceeded`] and returns the
    /// receipt; the cart itself is left intact until
    /// [`Cart::finish_checkout`] runs (see [`crate::checkout`]).
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] and emits
    /// [`CartEvent::CheckoutFailed`] if there is nothing to buy.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<Receipt, CheckoutError> {
        if self.entries.is_empty() {
            self.emit(&CartEvent::CheckoutFailed);
            return Err(CheckoutError::EmptyCart);
        }

        let receipt = Receipt {
            total: self.total(),
            item_count: self.item_count(),
            lines: self.entries.clone(),
        };

        tracing::info!(
            total = %receipt.total,
            items = receipt.item_count,
            "Checkout accepted"
        );
        self.emit(&CartEvent::CheckoutSucceeded {
            total: receipt.total,
        });
        Ok(receipt)
    }

    /// Complete a checkout: clear the cart and signal that it closed.
    pub fn finish_checkout(&mut self) {
        self.clear();
        self.emit(&CartEvent::CartClosed);
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id == product_id)
    }

    fn persist(&self) {
        let encoded = match persist::encode(&self.entries, &self.catalog) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.store.save(&self.key, &encoded) {
            tracing::warn!(error = %e, key = %self.key, "Failed to persist cart");
        }
    }

    fn emit(&self, event: &CartEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
