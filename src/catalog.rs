//! Catalog
//!
//! Product catalog loaded from YAML:
//!
//! ```yaml
//! products:
//!   - id: 1
//!     name: Wireless Headphones
//!     price: "99.99"
//!     category: Electronics
//! ```

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::products::{Product, ProductError, ProductId};

/// Catalog loading and lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The same product id appears twice
    #[error("Duplicate product: {0}")]
    DuplicateProduct(ProductId),

    /// A product record is invalid
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<Product>,
}

/// Products available to add to the cart, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: FxHashMap<ProductId, Product>,
}

impl Catalog {
    /// Build a catalog from product records.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Product`]: a record fails validation.
    /// - [`CatalogError::DuplicateProduct`]: two records share an id.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for product in products {
            product.validate()?;

            let id = product.id;

            if catalog.products.insert(id, product).is_some() {
                return Err(CatalogError::DuplicateProduct(id));
            }
        }

        Ok(catalog)
    }

    /// Parse a YAML catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed or a record is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        Self::from_products(fixture.products)
    }

    /// Load a YAML catalog file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let yaml = fs::read_to_string(path)?;

        Self::from_yaml(&yaml)
    }

    /// Look up a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has the id.
    pub fn product(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.products
            .get(&id)
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// All products, ordered by id.
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();
        products.sort_by_key(|product| product.id);
        products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
