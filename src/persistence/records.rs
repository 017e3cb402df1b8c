//! Stored cart records
//!
//! The on-storage shape of a cart line:
//! `{"product": {...}, "quantity": 2, "total": "59.98"}`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::LineItem,
    money::{Quantity, QuantityError},
    products::{Product, ProductError},
};

/// Reasons a stored line is discarded on load.
#[derive(Debug, Error)]
pub(crate) enum RecordError {
    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Stored line record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LineItemRecord {
    pub product: Product,

    pub quantity: i64,

    /// Written for readers of the raw snapshot; never read back as truth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

impl From<&LineItem> for LineItemRecord {
    fn from(line: &LineItem) -> Self {
        Self {
            product: line.product().clone(),
            quantity: i64::from(line.quantity().get()),
            total: Some(line.total()),
        }
    }
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = RecordError;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(record.quantity)?;
        record.product.validate()?;

        Ok(LineItem::new(record.product, quantity))
    }
}
