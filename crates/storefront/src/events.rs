//! Cart state-change events and the observers that consume them.
//!
//! The engine never renders anything. After each operation it emits a
//! [`CartEvent`] to every subscribed [`CartObserver`]; a presentation layer
//! subscribes and re-renders on its own terms.

use std::collections::VecDeque;
use std::sync::Mutex;

use coffeecraft_core::{Price, ProductId};
use serde::Serialize;

/// Something the cart engine did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    ItemAdded { product_id: ProductId },
    ItemRemoved { product_id: ProductId },
    QuantityChanged { product_id: ProductId, quantity: u32 },
    CartCleared,
    CheckoutSucceeded { total: Price },
    CheckoutFailed,
    CartClosed,
}

/// How a presentation layer should style the notification for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
}

impl CartEvent {
    /// Notification styling for this event.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::ItemAdded { .. } | Self::CheckoutSucceeded { .. } => Severity::Success,
            Self::CheckoutFailed => Severity::Warning,
            Self::ItemRemoved { .. }
            | Self::QuantityChanged { .. }
            | Self::CartCleared
            | Self::CartClosed => Severity::Info,
        }
    }

    /// Short user-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::ItemAdded { .. } => "Product added to cart".to_string(),
            Self::ItemRemoved { .. } => "Product removed".to_string(),
            Self::QuantityChanged { quantity, .. } => format!("Quantity updated to {quantity}"),
            Self::CartCleared => "Cart emptied".to_string(),
            Self::CheckoutSucceeded { total } => {
                format!("Thanks for your purchase! Total: {}", total.display())
            }
            Self::CheckoutFailed => {
                "Please add products to your cart before checking out".to_string()
            }
            Self::CartClosed => "Cart closed".to_string(),
        }
    }
}

/// Receives cart events.
pub trait CartObserver: Send + Sync {
    fn on_event(&self, event: &CartEvent);
}

/// Observer that writes every event to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CartObserver for TracingObserver {
    fn on_event(&self, event: &CartEvent) {
        match event {
            CartEvent::CheckoutFailed => tracing::info!(?event, "Checkout rejected: cart is empty"),
            _ => tracing::debug!(?event, "Cart event"),
        }
    }
}

/// A notification as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Monotonic sequence number, starting at 1.
    pub sequence: u64,
    pub severity: Severity,
    pub message: String,
    pub event: CartEvent,
}

/// Bounded log of the most recent notifications.
#[derive(Debug)]
pub struct NotificationLog {
    capacity: usize,
    inner: Mutex<LogInner>,
}

#[derive(Debug, Default)]
struct LogInner {
    next_sequence: u64,
    entries: VecDeque<Notification>,
}

impl NotificationLog {
    /// Create a log keeping at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(LogInner {
                next_sequence: 1,
                entries: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Notifications currently retained, oldest first.
    #[must_use]
    pub fn recent(&self) -> Vec<Notification> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Notifications with a sequence number greater than `sequence`.
    #[must_use]
    pub fn since(&self, sequence: u64) -> Vec<Notification> {
        self.lock()
            .entries
            .iter()
            .filter(|n| n.sequence > sequence)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CartObserver for NotificationLog {
    fn on_event(&self, event: &CartEvent) {
        let mut inner = self.lock();
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;

        if inner.entries.len() == self.capacity {
            inner.entries.pop_front();
        }
        inner.entries.push_back(Notification {
            sequence,
            severity: event.severity(),
            message: event.message(),
            event: event.clone(),
        });
    }
}
