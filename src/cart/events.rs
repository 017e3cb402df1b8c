//! Cart change notifications

use slotmap::new_key_type;

use crate::{cart::LineItem, money::Quantity, products::ProductId};

new_key_type! {
    /// Handle returned by [`CartStore::subscribe`](crate::cart::CartStore::subscribe).
    pub struct SubscriberKey;
}

/// What changed in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A product was added, or its quantity merged. Carries the line's new quantity.
    Added {
        /// Product that was added
        product_id: ProductId,
        /// Quantity of the line after the merge
        quantity: Quantity,
    },

    /// A line's quantity was replaced.
    QuantityUpdated {
        /// Product whose line changed
        product_id: ProductId,
        /// New quantity
        quantity: Quantity,
    },

    /// A line was removed.
    Removed {
        /// Product that was removed
        product_id: ProductId,
    },

    /// Every line was removed.
    Cleared,
}

/// Notification delivered to subscribers after a mutation.
#[derive(Debug)]
pub struct CartEvent<'a> {
    /// The mutation that happened
    pub change: CartChange,

    /// The cart contents after the mutation
    pub items: &'a [LineItem],

    /// Whether the new contents reached storage
    pub persisted: bool,
}

pub(crate) type Subscriber = Box<dyn FnMut(&CartEvent<'_>)>;
