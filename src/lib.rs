//! Diecast
//!
//! Diecast is the ordering engine behind a die-cast model storefront: a stock-aware cart, tiered
//! per-piece pricing, order placement and editing against an HTTP backend.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod observability;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod session;
pub mod storefront;
