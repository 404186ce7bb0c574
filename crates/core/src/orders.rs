//! Order-history line items and views.
//!
//! A transaction can span several restaurants; the history screen shows
//! one card per (transaction, restaurant) pair. Order lines reuse the cart
//! grouping machinery through [`Groupable`] - the aggregation is the same
//! single pass, the only difference being that these rows are immutable
//! snapshots carrying status and timestamp instead of mutable quantities.

use chrono::{DateTime, Utc};

use crate::group::{Groupable, RestaurantGroup, group_by_restaurant};
use crate::types::{MenuId, Money, OrderId, OrderStatus, RestaurantId};

/// One purchased menu line, flattened out of a past order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub restaurant_logo: Option<String>,
    pub menu_id: MenuId,
    pub menu_name: String,
    pub price: Money,
    pub quantity: u32,
    /// Server-computed `price * quantity`, kept as received.
    pub item_total: Money,
}

impl Groupable for OrderLine {
    fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    fn restaurant_logo(&self) -> Option<&str> {
        self.restaurant_logo.as_deref()
    }

    fn line_total(&self) -> Money {
        self.item_total
    }
}

/// Immutable metadata shared by every card of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHeader {
    pub order_id: OrderId,
    /// Human-facing transaction code (e.g. "TRX-20250301-0012").
    pub transaction_code: String,
    pub status: OrderStatus,
    pub payment_method: String,
    pub updated_at: DateTime<Utc>,
}

/// A transaction's slice for one restaurant, as shown in order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRestaurantView {
    pub header: OrderHeader,
    pub group: RestaurantGroup<OrderLine>,
}

/// Pricing breakdown returned by checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPricing {
    pub subtotal: Money,
    pub service_fee: Money,
    pub delivery_fee: Money,
    pub total_price: Money,
}

/// Split one order's flat lines into per-restaurant views.
///
/// Uses the same first-seen-order grouping as the live cart; every view
/// carries a copy of the order header.
#[must_use]
pub fn split_by_restaurant(header: &OrderHeader, lines: &[OrderLine]) -> Vec<OrderRestaurantView> {
    group_by_restaurant(lines)
        .into_iter()
        .map(|group| OrderRestaurantView {
            header: header.clone(),
            group,
        })
        .collect()
}
