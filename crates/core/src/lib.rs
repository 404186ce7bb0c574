//! Foody Core - shared domain types and cart state.
//!
//! This crate holds the types and pure state transitions shared by the
//! Foody storefront components. It contains no I/O: no HTTP, no
//! filesystem, no clocks. The `foody-storefront` crate layers networking
//! and persistence on top of it.
//!
//! # Architecture
//!
//! The cart's flat line-item list is the single canonical piece of state.
//! Every grouped or aggregated view (per-restaurant groups, summaries,
//! order-history cards) is recomputed from a flat list on read and never
//! stored, so the groupings cannot drift out of sync with the items.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, order status, and the user record
//! - [`cart`] - The canonical cart line-item store
//! - [`group`] - Single-pass grouping of line items by restaurant
//! - [`filters`] - Restaurant discovery filter state
//! - [`orders`] - Order-history line items and views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filters;
pub mod group;
pub mod orders;
pub mod types;

pub use types::*;
