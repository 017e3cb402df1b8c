//! Money & Quantity

use std::{fmt, num::NonZeroU32};

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::iso::{Currency, EUR, GBP, INR, USD};
use thiserror::Error;

/// Number of decimal places amounts are rounded to for display.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Errors raised by quantity validation and arithmetic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities must be at least one.
    #[error("Quantity must be a positive integer, got {0}")]
    NotPositive(i64),

    /// The quantity does not fit in a line item.
    #[error("Quantity {0} is too large")]
    TooLarge(i64),

    /// Merging two quantities overflowed.
    #[error("Quantity overflowed")]
    Overflow,
}

/// Errors raised when converting amounts to minor units.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// The rounded amount does not fit in an `i64` of minor units.
    #[error("Amount {0} cannot be represented in minor units")]
    NotRepresentable(Decimal),
}

/// A line item quantity. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Validate a raw quantity, as received from a form field or a stored cart.
    ///
    /// # Errors
    ///
    /// - [`QuantityError::NotPositive`]: the value is zero or negative.
    /// - [`QuantityError::TooLarge`]: the value does not fit in a `u32`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }

        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(QuantityError::TooLarge(value))
    }

    /// Returns the quantity as an integer.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Overflow`] if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, QuantityError> {
        self.0
            .checked_add(other.get())
            .map(Self)
            .ok_or(QuantityError::Overflow)
    }

    /// Returns the quantity as a decimal multiplier.
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.get())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calculates `price × quantity` at full precision.
pub fn line_total(price: Decimal, quantity: Quantity) -> Decimal {
    price * quantity.to_decimal()
}

/// Calculates `rate_percent`% of `amount` at full precision.
///
/// `rate_percent` is expressed in percent points, so `10` means ten percent.
/// Returns `None` if the result does not fit in a [`Decimal`].
pub fn percent_of(amount: Decimal, rate_percent: Decimal) -> Option<Decimal> {
    let rate = rate_percent.checked_div(Decimal::ONE_HUNDRED)?;

    rate.checked_mul(amount)
}

/// Sums amounts, returning `None` on overflow.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Rounds an amount for display, midpoint away from zero.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        DISPLAY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Formats an amount with a currency symbol, e.g. `$218.96`.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    let rounded = round_for_display(amount);

    format!("{symbol}{rounded:.2}")
}

/// Rounds an amount to the minor unit of `currency`, midpoint away from zero.
pub fn round_to_minor(amount: Decimal, currency: &Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an amount to integer minor units of `currency` (cents, pence, paise).
///
/// The amount is rounded to the currency's exponent first, midpoint away from zero.
///
/// # Errors
///
/// Returns [`AmountError::NotRepresentable`] if the result does not fit in an `i64`.
pub fn minor_units(amount: Decimal, currency: &Currency) -> Result<i64, AmountError> {
    let mut rounded = round_to_minor(amount, currency);
    rounded.rescale(currency.exponent);

    i64::try_from(rounded.mantissa()).map_err(|_err| AmountError::NotRepresentable(amount))
}

/// Looks up a supported ISO currency by its alpha code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" => Some(USD),
        "GBP" => Some(GBP),
        "EUR" => Some(EUR),
        "INR" => Some(INR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn quantity_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-3), Err(QuantityError::NotPositive(-3)));
    }

    #[test]
    fn quantity_rejects_values_beyond_u32() {
        let too_large = i64::from(u32::MAX) + 1;

        assert_eq!(Quantity::new(too_large), Err(QuantityError::TooLarge(too_large)));
    }

    #[test]
    fn quantity_checked_add_overflows() -> TestResult {
        let max = Quantity::new(i64::from(u32::MAX))?;

        assert_eq!(max.checked_add(Quantity::ONE), Err(QuantityError::Overflow));
        assert_eq!(Quantity::new(2)?.checked_add(Quantity::new(3)?)?.get(), 5);

        Ok(())
    }

    #[test]
    fn line_total_multiplies_without_rounding() -> TestResult {
        let total = line_total(Decimal::new(2_999, 2), Quantity::new(3)?);

        assert_eq!(total, Decimal::new(8_997, 2));

        Ok(())
    }

    #[test]
    fn percent_of_keeps_full_precision() {
        let tax = percent_of(Decimal::new(18_996, 2), Decimal::TEN);

        assert_eq!(tax, Some(Decimal::new(18_996, 3)));
    }

    #[test]
    fn percent_of_reports_overflow() {
        assert_eq!(percent_of(Decimal::MAX, Decimal::from(1_000)), None);
        assert_eq!(percent_of(Decimal::from(200), Decimal::MAX), None);
    }

    #[test]
    fn checked_sum_reports_overflow() {
        assert_eq!(
            checked_sum([Decimal::ONE, Decimal::TWO]),
            Some(Decimal::from(3))
        );
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
    }

    #[test]
    fn format_amount_rounds_midpoint_away_from_zero() {
        assert_eq!(format_amount("$", Decimal::new(218_956, 3)), "$218.96");
        assert_eq!(format_amount("$", Decimal::new(1_005, 3)), "$1.01");
        assert_eq!(format_amount("£", Decimal::ZERO), "£0.00");
    }

    #[test]
    fn minor_units_rounds_to_currency_exponent() -> TestResult {
        assert_eq!(minor_units(Decimal::new(218_956, 3), USD)?, 21_896);
        assert_eq!(minor_units(Decimal::from(5), GBP)?, 500);

        Ok(())
    }

    #[test]
    fn round_to_minor_keeps_large_amounts() {
        let huge = Decimal::from_i128_with_scale(4_294_967_295_000_000_000_000_000, 3);

        assert_eq!(round_to_minor(huge, USD), huge);
        assert!(minor_units(huge, USD).is_err());
    }

    #[test]
    fn currency_from_code_is_case_insensitive() {
        assert_eq!(currency_from_code("usd"), Some(USD));
        assert_eq!(currency_from_code(" INR "), Some(INR));
        assert_eq!(currency_from_code("XYZ"), None);
    }
}
