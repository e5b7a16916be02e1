//! Static product catalog.
//!
//! The catalog is loaded once at startup (either the built-in menu or a JSON
//! file) and never mutated afterwards. The cart engine looks prices up here on
//! every total computation, so the catalog is the single source of truth for
//! what a product costs.

use std::collections::HashSet;
use std::path::Path;

use coffeecraft_core::{Category, CategoryFilter, CurrencyCode, Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {id} is priced in {found}, expected {expected}")]
    MixedCurrency {
        id: ProductId,
        expected: &'static str,
        found: &'static str,
    },
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: Category,
}

/// The read-only list of products offered by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id, a price is negative, or
    /// the products are not all priced in the same currency.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        let expected = products
            .first()
            .map_or_else(CurrencyCode::default, |p| p.price.currency_code);
        for product in &products {
            if product.price.currency_code != expected {
                return Err(CatalogError::MixedCurrency {
                    id: product.id,
                    expected: expected.code(),
                    found: product.price.currency_code.code(),
                });
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.amount.is_sign_negative() && !product.price.amount.is_zero() {
                return Err(CatalogError::NegativePrice(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// The built-in coffee-shop menu.
    #[must_use]
    pub fn builtin() -> Self {
        let item = |id: i32, name: &str, description: &str, cents: i64, image: &str, category| {
            Product {
                id: ProductId::new(id),
                name: name.to_string(),
                description: description.to_string(),
                price: Price::from_cents(cents, CurrencyCode::USD),
                image: image.to_string(),
                category,
            }
        };

        Self {
            products: vec![
                item(
                    1,
                    "Classic Espresso",
                    "Intense espresso pulled from single-origin 100% arabica beans",
                    399,
                    "img/classic-espresso.jpg",
                    Category::Espresso,
                ),
                item(
                    2,
                    "Nitro Cold Brew",
                    "Nitrogen-infused cold brew, smooth and creamy",
                    549,
                    "img/nitro-cold-brew.jpg",
                    Category::ColdBrew,
                ),
                item(
                    3,
                    "Almond Croissant",
                    "Flaky croissant filled with house-made almond cream",
                    449,
                    "img/almond-croissant.jpg",
                    Category::Pastry,
                ),
                item(
                    4,
                    "Cappuccino",
                    "Espresso with steamed milk and velvety foam",
                    499,
                    "img/cappuccino.jpg",
                    Category::Espresso,
                ),
                item(
                    5,
                    "Vanilla Cold Brew",
                    "Cold brew with a touch of natural vanilla",
                    599,
                    "img/vanilla-cold-brew.jpg",
                    Category::ColdBrew,
                ),
                item(
                    6,
                    "Chocolate Tart",
                    "Dark chocolate tart with a hint of coffee",
                    649,
                    "img/chocolate-tart.jpg",
                    Category::Pastry,
                ),
            ],
        }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Returns true if a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products passing `filter`, in catalog order.
    pub fn filter(&self, filter: CategoryFilter) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |p| filter.matches(p.category))
    }

    /// Currency used for totals.
    ///
    /// Taken from the first product; an empty catalog falls back to the default currency.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.products
            .first()
            .map_or_else(CurrencyCode::default, |p| p.price.currency_code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
