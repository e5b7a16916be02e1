//! Serialized form of the cart.
//!
//! The stored value is a JSON array of lines. Only `id` and `quantity` are
//! read back; `name` and `price` are written alongside for anyone inspecting
//! the store by hand and are ignored on load, as are any other fields.

use coffeecraft_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CartEntry;
use crate::catalog::Catalog;

#[derive(Debug, Serialize)]
struct StoredLine<'a> {
    id: ProductId,
    quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct LoadedLine {
    id: ProductId,
    quantity: i64,
}

/// Serialize entries, denormalizing product name and price from the catalog.
pub(super) fn encode(entries: &[CartEntry], catalog: &Catalog) -> Result<String, serde_json::Error> {
    let lines: Vec<StoredLine<'_>> = entries
        .iter()
        .map(|entry| {
            let product = catalog.get(entry.product_id);
            StoredLine {
                id: entry.product_id,
                quantity: entry.quantity,
                name: product.map(|p| p.name.as_str()),
                price: product.map(|p| p.price.amount),
            }
        })
        .collect();
    serde_json::to_string(&lines)
}

/// Parse stored entries, keeping only lines that satisfy the cart invariants.
///
/// Lines for products missing from the catalog and lines with a non-positive
/// quantity are dropped. Repeated ids are merged into the first occurrence.
pub(super) fn decode(raw: &str, catalog: &Catalog) -> Result<Vec<CartEntry>, serde_json::Error> {
    let lines: Vec<LoadedLine> = serde_json::from_str(raw)?;
    let total = lines.len();

    let mut entries: Vec<CartEntry> = Vec::with_capacity(total);
    for line in lines {
        if !catalog.contains(line.id) {
            continue;
        }
        let Ok(quantity) = u32::try_from(line.quantity) else {
            continue;
        };
        if quantity == 0 {
            continue;
        }
        match entries.iter_mut().find(|e| e.product_id == line.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => entries.push(CartEntry {
                product_id: line.id,
                quantity,
            }),
        }
    }

    if entries.len() != total {
        tracing::debug!(
            stored = total,
            kept = entries.len(),
            "Dropped or merged stored cart lines"
        );
    }
    Ok(entries)
}
