//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use coffeecraft_core::{Category, CategoryFilter, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub amount: Decimal,
    pub image: String,
    pub category: Category,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            amount: product.price.amount,
            image: product.image.clone(),
            category: product.category,
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// List products, optionally filtered by category.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let filter = match query.category.as_deref() {
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => CategoryFilter::All,
    };

    let products = state
        .catalog()
        .filter(filter)
        .map(ProductView::from)
        .collect();
    Ok(Json(products))
}

/// Show a single product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .map(|p| Json(ProductView::from(p)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
