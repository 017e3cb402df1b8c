use std::io;

use thiserror::Error;
use tracing::{debug, info, warn};
use trolley::{
    cart::{CartError, CartStore},
    catalog::{Catalog, CatalogError},
    orders::OrderError,
    persistence::CartPersistence,
    pricing::PricingError,
    receipt::ReceiptError,
    settings::{Settings, SettingsError},
    storage::FileStore,
};

pub(crate) use config::Cli;

mod commands;
mod config;
mod logging;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("order failed verification: {0}")]
    Order(#[from] OrderError),

    #[error("failed to price cart: {0}")]
    Pricing(#[from] PricingError),

    #[error("failed to write receipt: {0}")]
    Receipt(#[from] ReceiptError),

    #[error("failed to encode order: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("the cart is empty")]
    EmptyCart,
}

impl Cli {
    pub(crate) fn run(self, out: impl io::Write) -> Result<(), CliError> {
        logging::init_subscriber(&self.logging)?;

        let settings = Settings::load(&self.sources.settings)?;
        let config = settings.pricing_config()?;

        debug!(
            store_dir = %self.storage.store_dir.display(),
            tax_rate = %config.tax_rate_percent(),
            currency = config.currency().iso_alpha_code,
            "starting"
        );

        let store = FileStore::new(self.storage.store_dir);
        let mut cart = CartStore::open(CartPersistence::new(store));

        cart.subscribe(|event| {
            if event.persisted {
                info!(change = ?event.change, lines = event.items.len(), "cart updated");
            } else {
                warn!(change = ?event.change, "cart updated but could not be saved");
            }
        });

        let catalog = if commands::needs_catalog(&self.command) {
            Catalog::load(&self.sources.catalog)?
        } else {
            Catalog::default()
        };

        commands::execute(self.command, &mut cart, &catalog, &config, out)
    }
}
