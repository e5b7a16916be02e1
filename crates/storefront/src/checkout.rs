//! Checkout and the deferred cart clear that follows it.
//!
//! A successful checkout reports its total immediately; the cart is emptied a
//! fixed delay later by a task on the tokio runtime. Nothing stops a shopper
//! from adding items during that window, and those items are discarded when
//! the clear fires. Library callers that want to avoid this can hold on to the
//! returned [`PendingClear`] and cancel it.

use std::sync::Arc;
use std::time::Duration;

use coffeecraft_core::Price;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::cart::{Cart, CartEntry};

/// A cart shared between request handlers and the deferred clear task.
pub type SharedCart = Arc<Mutex<Cart>>;

/// Reasons a checkout cannot proceed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cannot checkout an empty cart")]
    EmptyCart,
}

/// Summary of an accepted checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub total: Price,
    pub item_count: u64,
    pub lines: Vec<CartEntry>,
}

/// Handle to a scheduled post-checkout clear.
///
/// Dropping the handle does not cancel the clear.
#[derive(Debug)]
pub struct PendingClear {
    handle: JoinHandle<()>,
}

impl PendingClear {
    /// Schedule `cart` to be cleared after `delay`.
    #[must_use]
    pub fn schedule(cart: SharedCart, delay: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            cart.lock().await.finish_checkout();
            tracing::debug!("Post-checkout clear completed");
        });
        Self { handle }
    }

    /// Prevent the clear from running, if it has not already.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Returns true once the task has either run or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task. Returns true if the clear ran, false if it was cancelled.
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(()) => true,
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                tracing::error!(error = %e, "Post-checkout clear task failed");
                false
            }
        }
    }
}

/// Check out `cart` and schedule its clear after `delay`.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no lines; nothing is
/// scheduled in that case.
pub async fn checkout(
    cart: &SharedCart,
    delay: Duration,
) -> Result<(Receipt, PendingClear), CheckoutError> {
    let receipt = cart.lock().await.checkout()?;
    let pending = PendingClear::schedule(Arc::clone(cart), delay);
    Ok((receipt, pending))
}
