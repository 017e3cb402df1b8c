//! Settings
//!
//! Store settings as served by the admin settings endpoint:
//! `{"tax_rate": {"value": 10, "type": "number", "description": "..."}}`,
//! optionally wrapped in the API's `{"success", "data", "message"}` envelope.
//!
//! Missing or unreadable entries fall back to the pricing defaults.

use std::{fs, io, path::Path, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    money::currency_from_code,
    pricing::{
        DEFAULT_CURRENCY_SYMBOL, DEFAULT_FLAT_SHIPPING_COST, DEFAULT_FREE_SHIPPING_THRESHOLD,
        DEFAULT_TAX_RATE_PERCENT, PricingConfig, PricingError,
    },
};

/// Tax rate key, in percent points.
pub const TAX_RATE_KEY: &str = "tax_rate";

/// Flat shipping cost key.
pub const SHIPPING_COST_KEY: &str = "shipping_cost";

/// Free-shipping threshold key.
pub const FREE_SHIPPING_THRESHOLD_KEY: &str = "free_shipping_threshold";

/// Currency symbol key.
pub const CURRENCY_SYMBOL_KEY: &str = "currency_symbol";

/// ISO currency code key.
pub const CURRENCY_KEY: &str = "currency";

/// Errors raised while reading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings: {0}")]
    Io(#[from] io::Error),

    /// The settings document is not valid JSON of the expected shape.
    #[error("Failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings endpoint reported a failure.
    #[error("Settings request failed: {0}")]
    Rejected(String),

    /// The settings describe an invalid pricing configuration.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Declared type of a setting value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// Free text
    #[default]
    String,

    /// Number, possibly encoded as a string
    Number,

    /// Boolean, possibly encoded as `"true"`
    Boolean,

    /// Arbitrary JSON, possibly encoded as a string
    Json,
}

/// A single setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingValue {
    /// Raw value
    pub value: Value,

    /// Declared type
    #[serde(rename = "type", default)]
    pub kind: SettingType,

    /// Admin-facing description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SettingsDocument {
    Envelope {
        success: bool,
        #[serde(default)]
        data: FxHashMap<String, SettingValue>,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(FxHashMap<String, SettingValue>),
}

/// Settings map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings(FxHashMap<String, SettingValue>);

impl Settings {
    /// Parse a settings document, with or without the API envelope.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::Json`]: the document is malformed.
    /// - [`SettingsError::Rejected`]: the envelope reports `success: false`.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        match serde_json::from_str::<SettingsDocument>(json)? {
            SettingsDocument::Envelope {
                success: true,
                data,
                ..
            }
            | SettingsDocument::Bare(data) => Ok(Self(data)),
            SettingsDocument::Envelope {
                success: false,
                message,
                ..
            } => Err(SettingsError::Rejected(
                message.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }

    /// Read settings from a JSON file. A missing file yields empty settings.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Add or replace a setting.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value, kind: SettingType) -> Self {
        self.0.insert(
            key.into(),
            SettingValue {
                value,
                kind,
                description: None,
            },
        );
        self
    }

    /// Look up a raw setting.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no settings are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a numeric setting, accepting JSON numbers and numeric strings.
    pub fn number(&self, key: &str) -> Option<Decimal> {
        let setting = self.get(key)?;

        let parsed = match &setting.value {
            Value::Number(number) => parse_decimal(&number.to_string()),
            Value::String(text) => parse_decimal(text.trim()),
            _ => None,
        };

        if parsed.is_none() {
            warn!(key, value = %setting.value, "ignoring non-numeric setting");
        }

        parsed
    }

    /// Read a text setting. Empty strings count as missing.
    pub fn string(&self, key: &str) -> Option<String> {
        match &self.get(key)?.value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    /// Read a boolean setting, accepting `true` and `"true"`.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        match &self.get(key)?.value {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => Some(text == "true"),
            _ => None,
        }
    }

    /// Build the pricing configuration, falling back to defaults for missing entries.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Pricing`] if a numeric setting is negative or above its limit.
    pub fn pricing_config(&self) -> Result<PricingConfig, SettingsError> {
        let config = PricingConfig::new(
            self.number(TAX_RATE_KEY)
                .unwrap_or(DEFAULT_TAX_RATE_PERCENT),
            self.number(SHIPPING_COST_KEY)
                .unwrap_or(DEFAULT_FLAT_SHIPPING_COST),
            self.number(FREE_SHIPPING_THRESHOLD_KEY)
                .unwrap_or(DEFAULT_FREE_SHIPPING_THRESHOLD),
        )?;

        let symbol = self
            .string(CURRENCY_SYMBOL_KEY)
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());

        let currency = match self.string(CURRENCY_KEY) {
            Some(code) => currency_from_code(&code).unwrap_or_else(|| {
                warn!(code = %code, "unsupported currency, using the default");
                config.currency()
            }),
            None => config.currency(),
        };

        Ok(config.with_currency(currency, symbol))
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_err| Decimal::from_scientific(text))
        .ok()
}
