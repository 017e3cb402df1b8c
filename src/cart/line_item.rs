//! Line Items

use rust_decimal::Decimal;

use crate::{
    money::{Quantity, line_total},
    orders::OrderProduct,
    products::{Product, ProductId},
};

/// One product-and-quantity entry in the cart.
///
/// The line total is derived from the unit price and quantity whenever either
/// changes; it is never accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    product: Product,
    quantity: Quantity,
    total: Decimal,
}

impl LineItem {
    /// Create a line for `quantity` units of `product`.
    pub fn new(product: Product, quantity: Quantity) -> Self {
        let total = line_total(product.price, quantity);

        Self {
            product,
            quantity,
            total,
        }
    }

    /// Returns the product snapshot.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the product identifier.
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Returns the quantity.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns `unit price × quantity`.
    pub fn total(&self) -> Decimal {
        self.total
    }

    pub(crate) fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
        self.total = line_total(self.product.price, quantity);
    }

    /// Convert the line into an order payload line.
    pub fn to_order_product(&self) -> OrderProduct {
        OrderProduct {
            product_id: self.product.id,
            name: self.product.name.clone(),
            price: self.product.price,
            quantity: self.quantity.get(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn headphones() -> Product {
        Product::new(1, "Headphones", Decimal::new(9_999, 2), "Electronics")
    }

    #[test]
    fn new_computes_total() -> TestResult {
        let line = LineItem::new(headphones(), Quantity::new(2)?);

        assert_eq!(line.total(), Decimal::new(19_998, 2));
        assert_eq!(line.product_id(), ProductId::new(1));

        Ok(())
    }

    #[test]
    fn set_quantity_recomputes_total() -> TestResult {
        let mut line = LineItem::new(headphones(), Quantity::new(5)?);

        line.set_quantity(Quantity::ONE);

        assert_eq!(line.quantity(), Quantity::ONE);
        assert_eq!(line.total(), Decimal::new(9_999, 2));

        Ok(())
    }

    #[test]
    fn to_order_product_copies_line() -> TestResult {
        let line = LineItem::new(headphones(), Quantity::new(3)?);

        let order_product = line.to_order_product();

        assert_eq!(order_product.product_id, ProductId::new(1));
        assert_eq!(order_product.name, "Headphones");
        assert_eq!(order_product.quantity, 3);
        assert_eq!(order_product.total, Decimal::new(29_997, 2));

        Ok(())
    }
}
