//! Orders
//!
//! The payload sent to the order backend when a cart is checked out, and a
//! verifier that recomputes every figure in a payload instead of trusting it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::LineItem,
    money::{Quantity, QuantityError, round_for_display, round_to_minor},
    pricing::{OrderTotals, PricingConfig, PricingError, compute_totals},
    products::{Product, ProductError, ProductId},
};

/// Errors raised when verifying an order payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The order has no products.
    #[error("Order has no products")]
    Empty,

    /// A line has an invalid quantity (product, error).
    #[error("Product {0} has an invalid quantity: {1}")]
    Quantity(ProductId, QuantityError),

    /// A line has an invalid product snapshot.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// A line total differs from `price × quantity` (product, expected, actual).
    #[error("Product {0} total should be {1}, got {2}")]
    LineTotalMismatch(ProductId, Decimal, Decimal),

    /// A financial figure differs from the recomputed one (field, expected, actual).
    #[error("Order {0} should be {1}, got {2}")]
    TotalsMismatch(&'static str, Decimal, Decimal),

    /// The order could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One order line, as the order backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProduct {
    /// Product identifier
    pub product_id: ProductId,

    /// Product name at the time of ordering
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Units ordered
    pub quantity: u32,

    /// `price × quantity`
    pub total: Decimal,
}

/// Financial summary attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    /// Sum of line totals
    pub subtotal: Decimal,

    /// Tax rate in percent points
    pub tax_rate: Decimal,

    /// Tax charged on the subtotal
    pub tax_amount: Decimal,

    /// Shipping charged
    pub shipping_cost: Decimal,

    /// Amount payable
    pub order_total: Decimal,
}

impl FinancialData {
    /// Summarise `totals`, rounded to display precision.
    pub fn from_totals(totals: &OrderTotals, config: &PricingConfig) -> Self {
        Self {
            subtotal: round_for_display(totals.subtotal),
            tax_rate: config.tax_rate_percent(),
            tax_amount: round_for_display(totals.tax),
            shipping_cost: round_for_display(totals.shipping),
            order_total: round_for_display(totals.grand_total),
        }
    }
}

/// Order creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Ordered lines
    pub products: Vec<OrderProduct>,

    /// Financial summary, if the client computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_data: Option<FinancialData>,
}

impl OrderRequest {
    /// Build a payload from cart lines, pricing them with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the order total does not fit in a [`Decimal`].
    pub fn from_items(items: &[LineItem], config: &PricingConfig) -> Result<Self, PricingError> {
        let totals = compute_totals(items, config)?;

        Ok(Self {
            products: items.iter().map(LineItem::to_order_product).collect(),
            financial_data: Some(FinancialData::from_totals(&totals, config)),
        })
    }

    /// Recompute the order from its lines and check every figure it carries.
    ///
    /// Amounts are compared after rounding to the minor unit of the configured
    /// currency, so a payload rounded for display still verifies.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] naming the first line or figure that is
    /// invalid or does not match.
    pub fn verify(&self, config: &PricingConfig) -> Result<OrderTotals, OrderError> {
        if self.products.is_empty() {
            return Err(OrderError::Empty);
        }

        let items = self
            .products
            .iter()
            .map(|line| verify_line(line, config))
            .collect::<Result<Vec<_>, _>>()?;

        let totals = compute_totals(&items, config)?;

        if let Some(financial) = &self.financial_data {
            let checks = [
                ("subtotal", totals.subtotal, financial.subtotal),
                ("taxAmount", totals.tax, financial.tax_amount),
                ("shippingCost", totals.shipping, financial.shipping_cost),
                ("orderTotal", totals.grand_total, financial.order_total),
            ];

            for (field, expected, actual) in checks {
                ensure_same_amount(field, expected, actual, config)?;
            }

            if financial.tax_rate.normalize() != config.tax_rate_percent().normalize() {
                return Err(OrderError::TotalsMismatch(
                    "taxRate",
                    config.tax_rate_percent(),
                    financial.tax_rate,
                ));
            }
        }

        Ok(totals)
    }
}

fn verify_line(line: &OrderProduct, config: &PricingConfig) -> Result<LineItem, OrderError> {
    let quantity = Quantity::new(i64::from(line.quantity))
        .map_err(|error| OrderError::Quantity(line.product_id, error))?;

    let product = Product::new(line.product_id.get(), line.name.clone(), line.price, "");
    product.validate()?;

    let item = LineItem::new(product, quantity);

    if !same_amount(item.total(), line.total, config) {
        return Err(OrderError::LineTotalMismatch(
            line.product_id,
            item.total(),
            line.total,
        ));
    }

    Ok(item)
}

fn ensure_same_amount(
    field: &'static str,
    expected: Decimal,
    actual: Decimal,
    config: &PricingConfig,
) -> Result<(), OrderError> {
    if same_amount(expected, actual, config) {
        Ok(())
    } else {
        Err(OrderError::TotalsMismatch(field, expected, actual))
    }
}

fn same_amount(a: Decimal, b: Decimal, config: &PricingConfig) -> bool {
    round_to_minor(a, config.currency()) == round_to_minor(b, config.currency())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn items() -> Result<Vec<LineItem>, QuantityError> {
        Ok(vec![
            LineItem::new(
                Product::new(1, "Headphones", Decimal::new(9_999, 2), "Electronics"),
                Quantity::ONE,
            ),
            LineItem::new(
                Product::new(2, "Mug", Decimal::new(2_999, 2), "Kitchen"),
                Quantity::new(3)?,
            ),
        ])
    }

    fn config() -> Result<PricingConfig, PricingError> {
        PricingConfig::new(Decimal::TEN, Decimal::TEN, Decimal::new(200, 0))
    }

    #[test]
    fn from_items_builds_lines_and_financials() -> TestResult {
        let request = OrderRequest::from_items(&items()?, &config()?)?;

        assert_eq!(request.products.len(), 2);
        assert_eq!(
            request.financial_data,
            Some(FinancialData {
                subtotal: Decimal::new(18_996, 2),
                tax_rate: Decimal::TEN,
                tax_amount: Decimal::new(1_900, 2),
                shipping_cost: Decimal::TEN,
                order_total: Decimal::new(21_896, 2),
            })
        );

        Ok(())
    }

    #[test]
    fn serializes_with_backend_field_names() -> TestResult {
        let request = OrderRequest::from_items(&items()?, &config()?)?;

        let json = serde_json::to_value(&request)?;

        assert!(json.pointer("/products/0/product_id").is_some());
        assert!(json.pointer("/financialData/taxAmount").is_some());
        assert!(json.pointer("/financialData/orderTotal").is_some());

        Ok(())
    }

    #[test]
    fn verify_accepts_own_payload() -> TestResult {
        let config = config()?;
        let request = OrderRequest::from_items(&items()?, &config)?;

        let totals = request.verify(&config)?;

        assert_eq!(totals.grand_total, Decimal::new(218_956, 3));

        Ok(())
    }

    #[test]
    fn verify_accepts_payload_from_json_numbers() -> TestResult {
        let request: OrderRequest = serde_json::from_str(
            r#"{
                "products": [
                    {"product_id": 7, "name": "Lamp", "price": 45.5, "quantity": 2, "total": 91}
                ],
                "financialData": {
                    "subtotal": 91, "taxRate": 10, "taxAmount": 9.1,
                    "shippingCost": 0, "orderTotal": 100.1
                }
            }"#,
        )?;

        let config = PricingConfig::new(Decimal::TEN, Decimal::ZERO, Decimal::ONE_HUNDRED)?
            .with_currency(INR, "₹");

        assert_eq!(request.verify(&config)?.grand_total, Decimal::new(1_001, 1));

        Ok(())
    }

    #[test]
    fn verify_rejects_tampered_line_total() -> TestResult {
        let config = config()?;
        let mut request = OrderRequest::from_items(&items()?, &config)?;

        if let Some(line) = request.products.first_mut() {
            line.total = Decimal::ONE;
        }

        assert_eq!(
            request.verify(&config),
            Err(OrderError::LineTotalMismatch(
                ProductId::new(1),
                Decimal::new(9_999, 2),
                Decimal::ONE
            ))
        );

        Ok(())
    }

    #[test]
    fn verify_rejects_tampered_order_total() -> TestResult {
        let config = config()?;
        let mut request = OrderRequest::from_items(&items()?, &config)?;

        if let Some(financial) = request.financial_data.as_mut() {
            financial.order_total = Decimal::new(1_000, 2);
        }

        assert!(matches!(
            request.verify(&config),
            Err(OrderError::TotalsMismatch("orderTotal", _, _))
        ));

        Ok(())
    }

    #[test]
    fn verify_rejects_different_tax_rate() -> TestResult {
        let config = config()?;
        let request = OrderRequest::from_items(&items()?, &config)?;
        let cheaper = PricingConfig::new(Decimal::ZERO, Decimal::TEN, Decimal::new(200, 0))?;

        assert!(matches!(
            request.verify(&cheaper),
            Err(OrderError::TotalsMismatch("taxAmount", _, _))
        ));

        Ok(())
    }

    #[test]
    fn verify_rejects_empty_and_zero_quantity_orders() -> TestResult {
        let config = config()?;

        let empty = OrderRequest {
            products: Vec::new(),
            financial_data: None,
        };
        assert_eq!(empty.verify(&config), Err(OrderError::Empty));

        let zero = OrderRequest {
            products: vec![OrderProduct {
                product_id: ProductId::new(3),
                name: "Pen".to_string(),
                price: Decimal::ONE,
                quantity: 0,
                total: Decimal::ZERO,
            }],
            financial_data: None,
        };
        assert_eq!(
            zero.verify(&config),
            Err(OrderError::Quantity(
                ProductId::new(3),
                QuantityError::NotPositive(0)
            ))
        );

        Ok(())
    }

    #[test]
    fn verify_accepts_totals_beyond_minor_unit_range() -> TestResult {
        let config = PricingConfig::new(Decimal::TEN, Decimal::ZERO, Decimal::ZERO)?;
        let items = [LineItem::new(
            Product::new(5, "Pallet", Decimal::from(1_000_000_000_000_i64), "Bulk"),
            Quantity::new(i64::from(u32::MAX))?,
        )];

        let request = OrderRequest::from_items(&items, &config)?;
        let totals = request.verify(&config)?;

        assert_eq!(
            totals.grand_total,
            Decimal::from_i128_with_scale(4_724_464_024_500_000_000_000, 0)
        );

        Ok(())
    }
}
