//! Cart change notifications.

use std::sync::{Mutex, PoisonError};

use shopcart_core::{ProductId, Quantity};

/// A change the store has just persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// Units of a product were added (to a new or an existing line).
    ItemAdded {
        id: ProductId,
        title: String,
        quantity: Quantity,
    },
    /// A line was removed, directly or by setting its quantity to zero.
    ItemRemoved { id: ProductId, title: String },
    /// A line's quantity was set.
    QuantityChanged { id: ProductId, quantity: Quantity },
    /// The persisted cart record was deleted.
    Cleared,
    /// The total unit count after the change.
    CountChanged { count: u64 },
}

impl CartEvent {
    /// The message shown to the shopper for this event, if any.
    ///
    /// ```
    /// use shopcart_core::{ProductId, Quantity};
    /// use shopcart_store::CartEvent;
    ///
    /// let event = CartEvent::ItemAdded {
    ///     id: ProductId::new("1"),
    ///     title: "HAVIT HV-G92 Gamepad".to_string(),
    ///     quantity: Quantity::ONE,
    /// };
    /// assert_eq!(
    ///     event.notification().as_deref(),
    ///     Some("HAVIT HV-G92 Gamepad added to cart!")
    /// );
    /// ```
    #[must_use]
    pub fn notification(&self) -> Option<String> {
        match self {
            Self::ItemAdded { title, .. } => Some(format!("{title} added to cart!")),
            Self::ItemRemoved { title, .. } => Some(format!("{title} removed from cart!")),
            Self::QuantityChanged { .. } | Self::Cleared | Self::CountChanged { .. } => None,
        }
    }
}

/// Receives cart events.
///
/// Listeners run synchronously after the change is persisted and cannot
/// alter it.
pub trait CartListener: Send + Sync {
    fn on_event(&self, event: &CartEvent);
}

/// A listener that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<CartEvent>>,
}

impl RecordingListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the recorded events.
    pub fn take(&self) -> Vec<CartEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }

    /// Remove the recorded events, returning their shopper messages.
    pub fn take_notifications(&self) -> Vec<String> {
        self.take()
            .iter()
            .filter_map(CartEvent::notification)
            .collect()
    }
}

impl CartListener for RecordingListener {
    fn on_event(&self, event: &CartEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
