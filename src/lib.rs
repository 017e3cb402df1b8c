//! Trolley
//!
//! Trolley is a shopping cart and order-total engine: a cart store mirrored to
//! key-value storage, a pure pricing calculator, and the order payloads built
//! from them.

pub mod cart;
pub mod catalog;
pub mod money;
pub mod orders;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod settings;
pub mod storage;
