//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartChange, CartError, CartEvent, CartStore, LineItem, SubscriberKey},
    catalog::{Catalog, CatalogError},
    money::{AmountError, Quantity, QuantityError, format_amount, minor_units},
    orders::{FinancialData, OrderError, OrderProduct, OrderRequest},
    persistence::{CART_STORAGE_KEY, CartPersistence},
    pricing::{OrderTotals, PricingConfig, PricingError, compute_totals},
    products::{Product, ProductError, ProductId},
    receipt::{Receipt, ReceiptError},
    settings::{Settings, SettingsError},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError, UnavailableStore},
};
