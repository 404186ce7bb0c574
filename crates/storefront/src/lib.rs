//! Foody storefront client library.
//!
//! Talks to the Foody REST backend and owns the client-side state that the
//! UI renders from: the authenticated session, the local mirror of the
//! server cart, and the restaurant discovery filters. Rendering, routing,
//! and styling are left entirely to the embedding UI.
//!
//! # Architecture
//!
//! - The backend is the source of truth; cart mutations are sent first and
//!   reconciled into local state from the confirmed response
//! - Restaurant reads go through a short-TTL `moka` cache; the cart is
//!   never cached
//! - One persisted JSON record holds `{user, token}`, read at startup and
//!   rewritten on every credential change
//!
//! # Example
//!
//! ```rust,ignore
//! use foody_storefront::{config::StorefrontConfig, state::Storefront};
//!
//! let storefront = Storefront::new(StorefrontConfig::from_env()?)?;
//!
//! storefront.login("sari@example.com", "secret").await?;
//! storefront.cart().add_item(restaurant_id, menu_id, 2).await?;
//! let groups = storefront.cart().groups();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod sync;
pub mod telemetry;
