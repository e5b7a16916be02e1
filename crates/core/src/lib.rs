//! CoffeeCraft Core - Shared types library.
//!
//! This crate provides the domain types used by the CoffeeCraft components:
//! - `storefront` - Catalog, cart engine and the JSON service in front of it
//! - `integration-tests` - Cross-crate tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
