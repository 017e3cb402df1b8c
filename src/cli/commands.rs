use std::io;

use tracing::info;
use trolley::{
    cart::CartStore,
    catalog::Catalog,
    orders::OrderRequest,
    pricing::PricingConfig,
    products::ProductId,
    receipt::Receipt,
    storage::KeyValueStore,
};

use crate::cli::{CliError, config::Command};

pub(crate) fn needs_catalog(command: &Command) -> bool {
    matches!(command, Command::Add { .. })
}

pub(crate) fn execute<S: KeyValueStore>(
    command: Command,
    cart: &mut CartStore<S>,
    catalog: &Catalog,
    config: &PricingConfig,
    mut out: impl io::Write,
) -> Result<(), CliError> {
    match command {
        Command::Add {
            product_id,
            quantity,
        } => {
            let product = catalog.product(ProductId::new(product_id))?.clone();
            let name = product.name.clone();

            cart.add_item(product, quantity)?;

            writeln!(out, "Added {quantity} × {name}")?;
            write_status(&mut out, cart, config)
        }
        Command::Update {
            product_id,
            quantity,
        } => {
            cart.update_quantity(ProductId::new(product_id), quantity)?;

            if quantity < 1 {
                writeln!(out, "Removed product {product_id}")?;
            } else {
                writeln!(out, "Set product {product_id} to {quantity}")?;
            }

            write_status(&mut out, cart, config)
        }
        Command::Remove { product_id } => {
            if cart.remove_item(ProductId::new(product_id)) {
                writeln!(out, "Removed product {product_id}")?;
            } else {
                writeln!(out, "Product {product_id} is not in the cart")?;
            }

            write_status(&mut out, cart, config)
        }
        Command::Clear => {
            cart.clear();

            writeln!(out, "Cart cleared")?;

            Ok(())
        }
        Command::Show => {
            let items = cart.items();

            Receipt::new(&items, config)?.write_to(out)?;

            Ok(())
        }
        Command::Order { place } => {
            if cart.is_empty() {
                return Err(CliError::EmptyCart);
            }

            let request = OrderRequest::from_items(&cart.items(), config)?;
            let totals = request.verify(config)?;

            serde_json::to_writer_pretty(&mut out, &request)?;
            writeln!(out)?;

            if place {
                cart.clear();

                info!(
                    grand_total = %totals.grand_total,
                    grand_total_minor = totals.grand_total_minor(config.currency()).ok(),
                    "order placed"
                );
            }

            Ok(())
        }
    }
}

fn write_status<S: KeyValueStore>(
    out: &mut impl io::Write,
    cart: &CartStore<S>,
    config: &PricingConfig,
) -> Result<(), CliError> {
    let totals = cart.compute_totals(config)?;

    writeln!(
        out,
        "Cart: {} item(s), total {}",
        cart.total_item_count(),
        config.format(totals.grand_total)
    )?;

    Ok(())
}
