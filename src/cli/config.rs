//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Trolley cart CLI
#[derive(Debug, Parser)]
#[command(name = "trolley", about = "Shopping cart and order totals", long_about = None)]
pub(crate) struct Cli {
    /// Cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Catalog and pricing sources.
    #[command(flatten)]
    pub sources: SourcesConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Cart storage settings.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory the cart is persisted in
    #[arg(long, env = "TROLLEY_STORE_DIR", default_value = ".trolley")]
    pub store_dir: PathBuf,
}

/// Catalog and pricing sources.
#[derive(Debug, Args)]
pub(crate) struct SourcesConfig {
    /// YAML product catalog
    #[arg(long, env = "TROLLEY_CATALOG", default_value = "fixtures/catalog.yml")]
    pub catalog: PathBuf,

    /// JSON store settings; defaults apply when the file is missing
    #[arg(long, env = "TROLLEY_SETTINGS", default_value = "fixtures/settings.json")]
    pub settings: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub(crate) enum Command {
    /// Add a catalog product to the cart
    Add {
        /// Product id
        product_id: u64,

        /// Units to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Set the quantity of a cart line; zero or less removes it
    Update {
        /// Product id
        product_id: u64,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line from the cart
    Remove {
        /// Product id
        product_id: u64,
    },

    /// Empty the cart
    Clear,

    /// Show the cart with totals
    Show,

    /// Print the order payload for the cart
    Order {
        /// Empty the cart once the order payload is printed
        #[arg(long)]
        place: bool,
    },
}
