//! CoffeeCraft Storefront library.
//!
//! This crate provides the catalog, the cart engine and the JSON service in
//! front of it as a library, allowing them to be tested and reused.
//!
//! # Modules
//!
//! - [`catalog`] - Static product list and category filtering
//! - [`cart`] - Cart state engine
//! - [`checkout`] - Checkout and the deferred clear that follows it
//! - [`events`] - Cart events and observers
//! - [`storage`] - Key-value persistence
//! - [`routes`] - HTTP handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod routes;
pub mod state;
pub mod storage;
