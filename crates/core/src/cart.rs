//! The canonical cart state.
//!
//! [`CartStore`] owns the flat list of line items. Every operation here is
//! synchronous, immediately consistent, and touches only in-memory state;
//! talking to the backend belongs to the synchronizer in the storefront
//! crate. Grouped views are derived on read via
//! [`group_by_restaurant`](crate::group::group_by_restaurant) and never
//! stored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::group::{Groupable, RestaurantGroup, group_by_restaurant};
use crate::types::{CartItemId, MenuId, Money, RestaurantId};

/// One (restaurant, menu, quantity) tuple in the cart.
///
/// `id` is the server-issued cart item id; once the server has confirmed a
/// row, its id is authoritative and replaces any locally derived key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: CartItemId,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub restaurant_logo: Option<String>,
    pub menu_id: MenuId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub image: Option<String>,
}

impl LineItem {
    /// Line total (price times quantity).
    #[must_use]
    pub fn total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

impl Groupable for LineItem {
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
        self.total()
    }
}

/// Totals derived from the flat item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    pub total_items: u32,
    pub total_price: Money,
    pub restaurant_count: usize,
}

/// Flat, canonical list of cart line items.
///
/// Invariant: no stored item ever has quantity zero. Setting a quantity to
/// zero removes the row instead of persisting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<LineItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The flat item list, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of rows (not quantities).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up a row by its server-issued id.
    #[must_use]
    pub fn get(&self, id: CartItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Add an item.
    ///
    /// A row with the same id has its quantity incremented by the incoming
    /// quantity; otherwise the item is appended. Never creates duplicates.
    pub fn add(&mut self, item: LineItem) {
        if item.quantity == 0 {
            return;
        }
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Overwrite an item's quantity; zero removes the row.
    ///
    /// Unknown ids are a no-op, so repeating `set_quantity(id, 0)` after
    /// the row is gone is harmless.
    pub fn set_quantity(&mut self, id: CartItemId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
        } else if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
        }
    }

    /// Insert or replace a server-confirmed row.
    ///
    /// Used to reconcile the single item returned by a mutation response;
    /// a zero quantity removes the row instead.
    pub fn upsert(&mut self, item: LineItem) {
        if item.quantity == 0 {
            self.remove(item.id);
            return;
        }
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    /// Delete a row; no-op when absent.
    pub fn remove(&mut self, id: CartItemId) {
        self.items.retain(|item| item.id != id);
    }

    /// Replace local state wholesale with the server's cart
    /// (last-writer-wins from the server).
    pub fn replace_all(&mut self, items: Vec<LineItem>) {
        self.items = items.into_iter().filter(|item| item.quantity > 0).collect();
    }

    /// Empty the list; used after logout and successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Derived totals over the flat list.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let restaurants: HashSet<RestaurantId> =
            self.items.iter().map(|item| item.restaurant_id).collect();

        CartSummary {
            total_items: self
                .items
                .iter()
                .fold(0u32, |acc, item| acc.saturating_add(item.quantity)),
            total_price: self.items.iter().map(LineItem::total).sum(),
            restaurant_count: restaurants.len(),
        }
    }

    /// Grouped view, recomputed on every call.
    #[must_use]
    pub fn groups(&self) -> Vec<RestaurantGroup<LineItem>> {
        group_by_restaurant(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, restaurant: i64, price: i64, quantity: u32) -> LineItem {
        LineItem {
            id: CartItemId::new(id),
            restaurant_id: RestaurantId::new(restaurant),
            restaurant_name: format!("Resto {restaurant}"),
            restaurant_logo: None,
            menu_id: MenuId::new(id * 10),
            name: format!("Menu {id}"),
            price: Money::new(price),
            quantity,
            image: None,
        }
    }

    #[test]
    fn test_add_new_id_appends_one_row() {
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 2));
        store.add(item(2, 1, 20_000, 1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_same_id_increments_without_duplicate() {
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 2));
        store.add(item(1, 1, 10_000, 3));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(CartItemId::new(1)).map(|i| i.quantity), Some(5));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 2));

        store.set_quantity(CartItemId::new(1), 0);
        assert!(store.is_empty());

        // Repeating on the absent row is a no-op, not an error.
        store.set_quantity(CartItemId::new(1), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_zero_quantity_ever_observable() {
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 1));
        store.add(item(2, 2, 5_000, 3));
        store.set_quantity(CartItemId::new(2), 0);
        store.add(item(3, 1, 2_000, 0));
        store.upsert(item(1, 1, 10_000, 0));
        store.replace_all(vec![item(4, 1, 1_000, 2), item(5, 1, 1_000, 0)]);

        assert!(store.items().iter().all(|i| i.quantity >= 1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_replaces_row() {
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 2));
        store.upsert(item(1, 1, 10_000, 7));

        assert_eq!(store.get(CartItemId::new(1)).map(|i| i.quantity), Some(7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 2));
        store.remove(CartItemId::new(99));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_all_idempotent() {
        let items = vec![item(1, 1, 10_000, 2), item(2, 2, 5_000, 3)];

        let mut once = CartStore::new();
        once.replace_all(items.clone());

        let mut twice = CartStore::new();
        twice.replace_all(items.clone());
        twice.replace_all(items);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_grouping_scenario_subtotals() {
        // Restaurant A: qty 2 @ 10000 and qty 1 @ 20000; restaurant B:
        // qty 3 @ 5000.
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 2));
        store.add(item(2, 1, 20_000, 1));
        store.add(item(3, 2, 5_000, 3));

        let groups = store.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.first().map(|g| g.subtotal), Some(Money::new(40_000)));
        assert_eq!(groups.get(1).map(|g| g.subtotal), Some(Money::new(15_000)));

        let summary = store.summary();
        assert_eq!(summary.total_items, 6);
        assert_eq!(summary.total_price, Money::new(55_000));
        assert_eq!(summary.restaurant_count, 2);
    }

    #[test]
    fn test_groups_concatenate_back_to_flat_list() {
        let mut store = CartStore::new();
        store.add(item(1, 1, 10_000, 2));
        store.add(item(3, 2, 5_000, 3));
        store.add(item(2, 1, 20_000, 1));

        let grouped_ids: Vec<CartItemId> = store
            .groups()
            .into_iter()
            .flat_map(|g| g.items)
            .map(|i| i.id)
            .collect();
        assert_eq!(
            grouped_ids,
            vec![CartItemId::new(1), CartItemId::new(2), CartItemId::new(3)]
        );
    }
}
