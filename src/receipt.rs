//! Receipt

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::LineItem,
    pricing::{OrderTotals, PricingConfig, PricingError, compute_totals},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Priced view of a cart, ready to print.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    items: &'a [LineItem],
    totals: OrderTotals,
    config: &'a PricingConfig,
}

impl<'a> Receipt<'a> {
    /// Price `items` with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if a total is too large to calculate.
    pub fn new(items: &'a [LineItem], config: &'a PricingConfig) -> Result<Self, PricingError> {
        Ok(Self {
            items,
            totals: compute_totals(items, config)?,
            config,
        })
    }

    /// Totals shown at the foot of the receipt.
    pub fn totals(&self) -> OrderTotals {
        self.totals
    }

    /// Writes the receipt table and totals.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.items.is_empty() {
            writeln!(out, "\nYour cart is empty\n").map_err(|_err| ReceiptError::IO)?;
        } else {
            write_receipt_table(&mut out, self.line_rows())?;
        }

        write_receipt_summary(&mut out, self)
    }

    fn line_rows(&self) -> Builder {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Category", "Price", "Qty", "Total"]);

        for (idx, line) in self.items.iter().enumerate() {
            let product = line.product();

            builder.push_record([
                format!("#{:<3}", idx + 1),
                product.name.clone(),
                product.category.clone(),
                self.config.format(product.price),
                line.quantity().to_string(),
                self.config.format(line.total()),
            ]);
        }

        builder
    }
}

fn write_receipt_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let config = receipt.config;
    let formatted = receipt.totals.format(config);

    let shipping = if receipt.totals.shipping.is_zero() {
        "Free".to_string()
    } else {
        formatted.shipping
    };

    let lines = [
        (" Subtotal:".to_string(), formatted.subtotal),
        (" Shipping:".to_string(), shipping),
        (
            format!(" Tax ({}%):", config.tax_rate_percent().normalize()),
            formatted.tax,
        ),
        (" Total:".to_string(), formatted.grand_total),
    ];

    let label_width = lines
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Writes a summary line with a right-aligned label and a right-aligned value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    writeln!(
        out,
        "{label:>label_col_width$}  {value:>value_col_width$}  "
    )
    .map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{money::Quantity, products::Product};

    use super::*;

    fn render(items: &[LineItem], config: &PricingConfig) -> TestResult<String> {
        let mut out = Vec::new();

        Receipt::new(items, config)?.write_to(&mut out)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn renders_lines_and_totals() -> TestResult {
        let items = [
            LineItem::new(
                Product::new(1, "Headphones", Decimal::new(9_999, 2), "Electronics"),
                Quantity::ONE,
            ),
            LineItem::new(
                Product::new(2, "Mug", Decimal::new(2_999, 2), "Kitchen"),
                Quantity::new(3)?,
            ),
        ];
        let config = PricingConfig::new(Decimal::TEN, Decimal::TEN, Decimal::new(200, 0))?;

        let output = render(&items, &config)?;

        assert!(output.contains("Headphones"));
        assert!(output.contains("Kitchen"));
        assert!(output.contains("$89.97"));
        assert!(output.contains("Subtotal:  $189.96"));
        assert!(output.contains("Tax (10%):"));
        assert!(output.contains("$19.00"));
        assert!(output.contains("$218.96"));

        Ok(())
    }

    #[test]
    fn free_shipping_is_labelled() -> TestResult {
        let items = [LineItem::new(
            Product::new(1, "Headphones", Decimal::new(15_000, 2), "Electronics"),
            Quantity::ONE,
        )];

        let output = render(&items, &PricingConfig::default())?;

        assert!(output.contains("Free"));
        assert!(output.contains("$165.00"));

        Ok(())
    }

    #[test]
    fn empty_cart_renders_zero_totals() -> TestResult {
        let output = render(&[], &PricingConfig::default())?;

        assert!(output.contains("Your cart is empty"));
        assert!(output.contains("Total:"));
        assert!(output.contains("$0.00"));

        Ok(())
    }
}
