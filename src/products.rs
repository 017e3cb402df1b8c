//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest unit price a product may carry.
///
/// Bounds `price × quantity` well inside the range of [`Decimal`].
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Errors raised when a product record is malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The product has a negative price.
    #[error("Product {0} has a negative price: {1}")]
    NegativePrice(ProductId, Decimal),

    /// The product's price exceeds [`MAX_UNIT_PRICE`].
    #[error("Product {0} has an unsupported price: {1}")]
    PriceTooLarge(ProductId, Decimal),

    /// The product has no display name.
    #[error("Product {0} has no name")]
    MissingName(ProductId),
}

/// Product identifier, as issued by the catalog backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw catalog identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product snapshot.
///
/// A cart line owns a copy of the product as it was when added; the catalog
/// stays the owner of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Product category
    #[serde(default)]
    pub category: String,

    /// Product code (SKU)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Product {
    /// Create a product snapshot without a code.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            price,
            category: category.into(),
            code: None,
        }
    }

    /// Check the product is fit to be priced.
    ///
    /// # Errors
    ///
    /// - [`ProductError::MissingName`]: the name is blank.
    /// - [`ProductError::NegativePrice`]: the price is below zero.
    /// - [`ProductError::PriceTooLarge`]: the price exceeds [`MAX_UNIT_PRICE`].
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::MissingName(self.id));
        }

        if self.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.id, self.price));
        }

        if self.price > MAX_UNIT_PRICE {
            return Err(ProductError::PriceTooLarge(self.id, self.price));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn max_unit_price_is_one_trillion() {
        assert_eq!(MAX_UNIT_PRICE, Decimal::from(1_000_000_000_000_u64));
    }

    #[test]
    fn validate_accepts_free_products() -> TestResult {
        Product::new(1, "Sticker", Decimal::ZERO, "Extras").validate()?;

        Ok(())
    }

    #[test]
    fn validate_rejects_negative_price() {
        let product = Product::new(7, "Refund", Decimal::new(-1, 0), "Misc");

        assert_eq!(
            product.validate(),
            Err(ProductError::NegativePrice(ProductId::new(7), Decimal::new(-1, 0)))
        );
    }

    #[test]
    fn validate_rejects_blank_name() {
        let product = Product::new(3, "  ", Decimal::ONE, "Misc");

        assert_eq!(product.validate(), Err(ProductError::MissingName(ProductId::new(3))));
    }

    #[test]
    fn validate_rejects_absurd_price() {
        let price = MAX_UNIT_PRICE + Decimal::ONE;
        let product = Product::new(4, "Yacht", price, "Boats");

        assert_eq!(
            product.validate(),
            Err(ProductError::PriceTooLarge(ProductId::new(4), price))
        );
    }

    #[test]
    fn deserializes_catalog_dto_ignoring_extra_fields() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 12,
                "name": "Desk Lamp",
                "code": "LAMP-12",
                "category": "Home",
                "price": "24.50",
                "description": "Warm light",
                "images": "lamp.jpg",
                "created_at": "2025-01-01T00:00:00Z"
            }"#,
        )?;

        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.price, Decimal::new(2_450, 2));
        assert_eq!(product.code.as_deref(), Some("LAMP-12"));

        Ok(())
    }
}
