//! Pricing
//!
//! Derives order totals from a cart snapshot and a pricing configuration.
//! Arithmetic keeps full decimal precision; amounts are only rounded when
//! formatted for display.

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, USD};
use thiserror::Error;

use crate::{
    cart::LineItem,
    money::{AmountError, checked_sum, format_amount, minor_units, percent_of},
    products::MAX_UNIT_PRICE,
};

/// Tax rate used until settings are available, in percent points.
pub const DEFAULT_TAX_RATE_PERCENT: Decimal = Decimal::TEN;

/// Flat shipping cost used until settings are available.
pub const DEFAULT_FLAT_SHIPPING_COST: Decimal = Decimal::ZERO;

/// Free-shipping threshold used until settings are available.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Currency symbol used until settings are available.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Highest accepted tax rate, in percent points.
pub const MAX_TAX_RATE_PERCENT: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Highest accepted flat shipping cost.
pub const MAX_FLAT_SHIPPING_COST: Decimal = MAX_UNIT_PRICE;

/// Errors raised when building a pricing configuration or pricing a cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A configuration value was negative (field name, value).
    #[error("Setting {0} must not be negative, got {1}")]
    NegativeValue(&'static str, Decimal),

    /// A configuration value exceeded its limit (field name, value, limit).
    #[error("Setting {0} must not exceed {2}, got {1}")]
    TooLarge(&'static str, Decimal, Decimal),

    /// A total does not fit in a decimal amount (total name).
    #[error("Order {0} is too large to calculate")]
    Overflow(&'static str),
}

/// Pricing configuration, supplied by the settings source.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    tax_rate_percent: Decimal,
    flat_shipping_cost: Decimal,
    free_shipping_threshold: Decimal,
    currency_symbol: String,
    currency: &'static Currency,
}

impl PricingConfig {
    /// Create a configuration with the default currency.
    ///
    /// # Errors
    ///
    /// - [`PricingError::NegativeValue`]: any value is negative.
    /// - [`PricingError::TooLarge`]: the tax rate exceeds [`MAX_TAX_RATE_PERCENT`] or
    ///   the shipping cost exceeds [`MAX_FLAT_SHIPPING_COST`].
    pub fn new(
        tax_rate_percent: Decimal,
        flat_shipping_cost: Decimal,
        free_shipping_threshold: Decimal,
    ) -> Result<Self, PricingError> {
        ensure_in_range("tax_rate", tax_rate_percent, MAX_TAX_RATE_PERCENT)?;
        ensure_in_range("shipping_cost", flat_shipping_cost, MAX_FLAT_SHIPPING_COST)?;
        ensure_in_range("free_shipping_threshold", free_shipping_threshold, Decimal::MAX)?;

        Ok(Self {
            tax_rate_percent,
            flat_shipping_cost,
            free_shipping_threshold,
            ..Self::default()
        })
    }

    /// Set the currency and the symbol used when formatting amounts.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency, symbol: impl Into<String>) -> Self {
        self.currency = currency;
        self.currency_symbol = symbol.into();
        self
    }

    /// Tax rate in percent points.
    pub fn tax_rate_percent(&self) -> Decimal {
        self.tax_rate_percent
    }

    /// Shipping charged below the free-shipping threshold.
    pub fn flat_shipping_cost(&self) -> Decimal {
        self.flat_shipping_cost
    }

    /// Subtotal at or above which shipping is waived.
    pub fn free_shipping_threshold(&self) -> Decimal {
        self.free_shipping_threshold
    }

    /// Symbol prefixed to formatted amounts.
    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Currency used for minor-unit conversion.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Format an amount with this configuration's currency symbol.
    pub fn format(&self, amount: Decimal) -> String {
        format_amount(&self.currency_symbol, amount)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_percent: DEFAULT_TAX_RATE_PERCENT,
            flat_shipping_cost: DEFAULT_FLAT_SHIPPING_COST,
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            currency: USD,
        }
    }
}

fn ensure_in_range(field: &'static str, value: Decimal, max: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO {
        Err(PricingError::NegativeValue(field, value))
    } else if value > max {
        Err(PricingError::TooLarge(field, value, max))
    } else {
        Ok(())
    }
}

/// Order totals, at full precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line totals
    pub subtotal: Decimal,

    /// Shipping charge
    pub shipping: Decimal,

    /// Tax on the subtotal
    pub tax: Decimal,

    /// `subtotal + shipping + tax`
    pub grand_total: Decimal,
}

/// Order totals formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTotals {
    /// Formatted subtotal
    pub subtotal: String,

    /// Formatted shipping charge
    pub shipping: String,

    /// Formatted tax
    pub tax: String,

    /// Formatted grand total
    pub grand_total: String,
}

impl OrderTotals {
    /// Round and format every amount with the configuration's currency symbol.
    pub fn format(&self, config: &PricingConfig) -> FormattedTotals {
        FormattedTotals {
            subtotal: config.format(self.subtotal),
            shipping: config.format(self.shipping),
            tax: config.format(self.tax),
            grand_total: config.format(self.grand_total),
        }
    }

    /// Grand total in minor units of `currency`, as a payment provider expects it.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotRepresentable`] if the total overflows minor units.
    pub fn grand_total_minor(&self, currency: &Currency) -> Result<i64, AmountError> {
        minor_units(self.grand_total, currency)
    }
}

/// Calculate order totals for a cart snapshot.
///
/// Pure: identical inputs always produce identical totals. Shipping is waived
/// for an empty cart and at or above the free-shipping threshold, and is never
/// taxed.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if a total does not fit in a [`Decimal`].
pub fn compute_totals(
    items: &[LineItem],
    config: &PricingConfig,
) -> Result<OrderTotals, PricingError> {
    let Some(subtotal) = checked_sum(items.iter().map(LineItem::total)) else {
        return Err(PricingError::Overflow("subtotal"));
    };

    if subtotal.is_zero() {
        return Ok(OrderTotals::default());
    }

    let shipping = if subtotal >= config.free_shipping_threshold {
        Decimal::ZERO
    } else {
        config.flat_shipping_cost
    };

    let Some(tax) = percent_of(subtotal, config.tax_rate_percent) else {
        return Err(PricingError::Overflow("tax"));
    };

    let Some(grand_total) = checked_sum([subtotal, shipping, tax]) else {
        return Err(PricingError::Overflow("grand total"));
    };

    Ok(OrderTotals {
        subtotal,
        shipping,
        tax,
        grand_total,
    })
}
