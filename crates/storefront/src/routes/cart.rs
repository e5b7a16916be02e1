//! Cart route handlers.
//!
//! Every mutating handler returns the updated cart so the caller can
//! re-render without a second request. Unknown product ids are accepted and
//! ignored, matching the engine's no-op semantics.

use axum::{Json, extract::State};
use coffeecraft_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{Cart, CartLine};
use crate::error::{AppError, Result};
use crate::events::CartEvent;
use crate::state::AppState;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: String,
    pub total: Decimal,
}

impl From<CartLine<'_>> for CartItemView {
    fn from(line: CartLine<'_>) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity,
            price: line.product.price.display(),
            line_price: line.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        Self {
            items: cart.lines().map(CartItemView::from).collect(),
            item_count: cart.item_count(),
            subtotal: total.display(),
            total: total.amount,
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Checkout confirmation data.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub total: String,
    pub amount: Decimal,
    pub item_count: u64,
    pub message: String,
    pub clears_in_ms: u64,
}

/// Add / remove request body.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: i32,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub delta: i32,
}

/// Clear request body.
#[derive(Debug, Default, Deserialize)]
pub struct ClearCartForm {
    #[serde(default)]
    pub confirm: bool,
}

/// Display cart contents.
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().lock().await;
    Json(CartView::from(&*cart))
}

/// Get cart count badge.
pub async fn count(State(state): State<AppState>) -> Json<CartCountView> {
    let count = state.cart().lock().await.item_count();
    Json(CartCountView { count })
}

/// Add one unit of a product to the cart.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Json(form): Json<ProductForm>) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.add_item(ProductId::new(form.product_id));
    Json(CartView::from(&*cart))
}

/// Remove a product's line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.remove_item(ProductId::new(form.product_id));
    Json(CartView::from(&*cart))
}

/// Change a line's quantity by a signed delta.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(form): Json<UpdateCartForm>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.update_quantity(ProductId::new(form.product_id), form.delta);
    Json(CartView::from(&*cart))
}

/// Empty the cart. The caller must pass `confirm: true`.
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    Json(form): Json<ClearCartForm>,
) -> Result<Json<CartView>> {
    if !form.confirm {
        return Err(AppError::BadRequest(
            "clearing the cart requires confirmation".to_string(),
        ));
    }

    let mut cart = state.cart().lock().await;
    cart.clear();
    Ok(Json(CartView::from(&*cart)))
}

/// Check out the cart.
///
/// Responds immediately with the total; the cart is emptied after the
/// configured delay.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let delay = state.config().checkout_delay;
    let (receipt, pending) = crate::checkout::checkout(state.cart(), delay).await?;
    // Detached: the clear fires even if the shopper keeps adding items.
    drop(pending);

    Ok(Json(CheckoutView {
        total: receipt.total.display(),
        amount: receipt.total.amount,
        item_count: receipt.item_count,
        message: CartEvent::CheckoutSucceeded {
            total: receipt.total,
        }
        .message(),
        clears_in_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
    }))
}
