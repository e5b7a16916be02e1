//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::checkout::SharedCart;
use crate::config::StorefrontConfig;
use crate::events::{NotificationLog, TracingObserver};
use crate::storage::KeyValueStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the single cart
/// instance; handlers receive it through axum's `State` extractor rather than
/// reaching for a global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    cart: SharedCart,
    notifications: Arc<NotificationLog>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads the cart from `store` under `config.cart_key` and subscribes the
    /// tracing observer and the notification log to it.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Self {
        let catalog = Arc::new(catalog);
        let notifications = Arc::new(NotificationLog::new(config.notification_log_size));

        let mut cart = Cart::load(Arc::clone(&catalog), store, &config.cart_key);
        cart.subscribe(Arc::new(TracingObserver));
        cart.subscribe(notifications.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Arc::new(Mutex::new(cart)),
                notifications,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the shared cart.
    #[must_use]
    pub fn cart(&self) -> &SharedCart {
        &self.inner.cart
    }

    /// Get the recent-notification log.
    #[must_use]
    pub fn notifications(&self) -> &NotificationLog {
        &self.inner.notifications
    }
}
