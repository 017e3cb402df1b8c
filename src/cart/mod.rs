//! Cart
//!
//! The cart is an ordered list of line items, unique by product. Every
//! change is mirrored to storage and then announced to subscribers before
//! the mutating call returns.

use std::{fmt, slice};

use rust_decimal::Decimal;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    money::{Quantity, QuantityError, checked_sum},
    orders::OrderProduct,
    persistence::CartPersistence,
    pricing::{OrderTotals, PricingConfig, PricingError, compute_totals},
    products::{Product, ProductError, ProductId},
    storage::KeyValueStore,
};

mod events;
mod line_item;

pub use events::{CartChange, CartEvent, SubscriberKey};
pub use line_item::LineItem;

use events::Subscriber;

/// Errors raised by cart mutations. A rejected mutation leaves the cart untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity is invalid.
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    /// The product snapshot is invalid.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// No line exists for the product.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// Merging into the existing line would overflow its quantity.
    #[error("Product {0} quantity would overflow")]
    QuantityOverflow(ProductId),
}

/// Cart store, mirrored to a [`KeyValueStore`].
pub struct CartStore<S> {
    items: Vec<LineItem>,
    persistence: CartPersistence<S>,
    subscribers: SlotMap<SubscriberKey, Subscriber>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty cart. Nothing is written until the first mutation.
    pub fn new(persistence: CartPersistence<S>) -> Self {
        Self {
            items: Vec::new(),
            persistence,
            subscribers: SlotMap::with_key(),
        }
    }

    /// Create a cart hydrated from whatever `persistence` holds.
    pub fn open(persistence: CartPersistence<S>) -> Self {
        let items = persistence.load();

        Self {
            items,
            persistence,
            subscribers: SlotMap::with_key(),
        }
    }

    /// Add `quantity` units of `product`, merging into an existing line for
    /// the same product. A merged line keeps its existing product snapshot.
    ///
    /// # Errors
    ///
    /// - [`CartError::Quantity`]: `quantity` is not a positive integer.
    /// - [`CartError::Product`]: the product has a negative price or no name.
    /// - [`CartError::QuantityOverflow`]: the merged quantity does not fit.
    pub fn add_item(&mut self, product: Product, quantity: i64) -> Result<(), CartError> {
        let quantity = Quantity::new(quantity)?;
        product.validate()?;

        let product_id = product.id;

        let quantity = if let Some(line) = self.line_mut(product_id) {
            let merged = line
                .quantity()
                .checked_add(quantity)
                .map_err(|_err| CartError::QuantityOverflow(product_id))?;

            line.set_quantity(merged);

            merged
        } else {
            self.items.push(LineItem::new(product, quantity));

            quantity
        };

        self.commit(CartChange::Added {
            product_id,
            quantity,
        });

        Ok(())
    }

    /// Replace the quantity of a line. A quantity below one removes the line.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`]: no line exists for `product_id`.
    /// - [`CartError::Quantity`]: `quantity` does not fit in a line item.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            self.remove_item(product_id);

            return Ok(());
        }

        let quantity = Quantity::new(quantity)?;

        let line = self
            .line_mut(product_id)
            .ok_or(CartError::NotFound(product_id))?;

        line.set_quantity(quantity);

        self.commit(CartChange::QuantityUpdated {
            product_id,
            quantity,
        });

        Ok(())
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let Some(idx) = self
            .items
            .iter()
            .position(|line| line.product_id() == product_id)
        else {
            return false;
        };

        self.items.remove(idx);
        self.commit(CartChange::Removed { product_id });

        true
    }

    /// Remove every line. Always persists and notifies, even when already empty.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit(CartChange::Cleared);
    }

    /// Snapshot of the cart contents, in insertion order.
    pub fn items(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Snapshot of a single line.
    pub fn item(&self, product_id: ProductId) -> Option<LineItem> {
        self.line(product_id).cloned()
    }

    /// Iterate over the lines without copying them.
    pub fn iter(&self) -> slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    pub fn total_item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum()
    }

    /// Sum of all line totals, or `None` if it does not fit in a [`Decimal`].
    pub fn total_price(&self) -> Option<Decimal> {
        checked_sum(self.items.iter().map(LineItem::total))
    }

    /// Price the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if a total does not fit in a [`Decimal`].
    pub fn compute_totals(&self, config: &PricingConfig) -> Result<OrderTotals, PricingError> {
        compute_totals(&self.items, config)
    }

    /// Order payload lines for the current contents.
    pub fn to_order_products(&self) -> Vec<OrderProduct> {
        self.items.iter().map(LineItem::to_order_product).collect()
    }

    /// Register a callback invoked after every change.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&CartEvent<'_>) + 'static,
    ) -> SubscriberKey {
        self.subscribers.insert(Box::new(callback))
    }

    /// Stop notifying a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&mut self, key: SubscriberKey) -> bool {
        self.subscribers.remove(key).is_some()
    }

    /// Underlying key-value store.
    pub fn storage(&self) -> &S {
        self.persistence.store()
    }

    fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|line| line.product_id() == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }

    /// Mirror the new contents to storage, then notify every subscriber.
    fn commit(&mut self, change: CartChange) {
        let persisted = if self.items.is_empty() {
            self.persistence.clear()
        } else {
            self.persistence.save(&self.items)
        };

        debug!(
            ?change,
            lines = self.items.len(),
            persisted,
            subscribers = self.subscribers.len(),
            "cart changed"
        );

        let event = CartEvent {
            change,
            items: &self.items,
            persisted,
        };

        for subscriber in self.subscribers.values_mut() {
            subscriber(&event);
        }
    }
}

impl<'a, S> IntoIterator for &'a CartStore<S> {
    type Item = &'a LineItem;
    type IntoIter = slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("persistence", &self.persistence)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
