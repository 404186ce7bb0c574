//! Core type definitions.
//!
//! These types are shared across the workspace and are designed to be:
//! - Type-safe: newtype IDs prevent mixing up entity references
//! - Serializable: all types work with the backend's JSON wire format
//! - Lightweight: plain data, no behavior beyond conversions and display

pub mod id;
pub mod money;
pub mod status;
pub mod user;

pub use id::*;
pub use money::Money;
pub use status::OrderStatus;
pub use user::User;
