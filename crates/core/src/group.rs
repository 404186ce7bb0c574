//! Grouping line items by restaurant.
//!
//! Both the live cart and the order history render their items grouped per
//! restaurant with a subtotal. The grouped view is always derived from the
//! flat list in a single pass and never stored, which rules out the whole
//! class of "groups out of sync with items" bugs.

use crate::types::{Money, RestaurantId};

/// A row that can be grouped under its restaurant.
///
/// Implemented by live-cart line items (mutable quantities) and historical
/// order lines (immutable snapshots); the grouping algorithm is identical
/// for both.
pub trait Groupable {
    fn restaurant_id(&self) -> RestaurantId;
    fn restaurant_name(&self) -> &str;
    fn restaurant_logo(&self) -> Option<&str>;
    /// Contribution of this row to the group subtotal.
    fn line_total(&self) -> Money;
}

/// Items of one restaurant plus their running subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantGroup<T> {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub restaurant_logo: Option<String>,
    pub items: Vec<T>,
    pub subtotal: Money,
}

/// Group a flat item list by restaurant.
///
/// Single pass over the input: groups appear in order of first appearance
/// and items keep their relative order within a group. Concatenating the
/// groups' items reproduces the input list.
#[must_use]
pub fn group_by_restaurant<T: Groupable + Clone>(items: &[T]) -> Vec<RestaurantGroup<T>> {
    // The group count per cart or order is tiny, so a linear scan beats a
    // map and keeps first-seen order for free.
    let mut groups: Vec<RestaurantGroup<T>> = Vec::new();

    for item in items {
        let id = item.restaurant_id();
        if let Some(group) = groups.iter_mut().find(|g| g.restaurant_id == id) {
            group.subtotal += item.line_total();
            group.items.push(item.clone());
        } else {
            groups.push(RestaurantGroup {
                restaurant_id: id,
                restaurant_name: item.restaurant_name().to_owned(),
                restaurant_logo: item.restaurant_logo().map(str::to_owned),
                subtotal: item.line_total(),
                items: vec![item.clone()],
            });
        }
    }

    groups
}
