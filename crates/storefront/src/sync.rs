//! Keeps the local cart mirror reconciled with the server cart.
//!
//! The backend owns cart truth. Every mutation is sent to the backend
//! first; only a confirmed response is folded into the local
//! [`CartStore`], so a failed request leaves local state exactly as it
//! was. While a mutation for a cart item is in flight, further mutations
//! for that same item are rejected with [`ApiError::ItemBusy`]; other
//! items stay mutable.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use foody_core::cart::{CartStore, CartSummary, LineItem};
use foody_core::group::RestaurantGroup;
use foody_core::{CartItemId, MenuId, RestaurantId};

use crate::api::ApiClient;
use crate::api::types::{CheckoutRequest, TransactionDto, flatten_cart};
use crate::error::{ApiError, Result};

/// Server-reconciled cart state.
///
/// Cheaply cloneable; all clones share the same cart mirror and in-flight
/// bookkeeping.
#[derive(Clone)]
pub struct CartSync {
    inner: Arc<CartSyncInner>,
}

struct CartSyncInner {
    api: ApiClient,
    store: Mutex<CartStore>,
    /// Cart items with a mutation currently in flight.
    in_flight: Mutex<HashSet<CartItemId>>,
}

/// Releases an item's in-flight slot when dropped, so the slot frees on
/// success and on every error path alike.
struct ItemGuard {
    inner: Arc<CartSyncInner>,
    id: CartItemId,
}

impl Drop for ItemGuard {
    fn drop(&mut self) {
        lock(&self.inner.in_flight).remove(&self.id);
    }
}

impl CartSync {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(CartSyncInner {
                api,
                store: Mutex::new(CartStore::new()),
                in_flight: Mutex::new(HashSet::new()),
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the local line items, in first-added order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.store().items().to_vec()
    }

    /// Line items grouped per restaurant, for the cart page.
    #[must_use]
    pub fn groups(&self) -> Vec<RestaurantGroup<LineItem>> {
        self.store().groups()
    }

    /// Totals over the local mirror.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.store().summary()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    /// True while a mutation for this item is in flight.
    #[must_use]
    pub fn is_item_busy(&self, id: CartItemId) -> bool {
        lock(&self.inner.in_flight).contains(&id)
    }

    // =========================================================================
    // Server-reconciled mutations
    // =========================================================================

    /// Replace the local mirror with the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; local state is unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let data = self.inner.api.cart().await?;
        let items = flatten_cart(data.cart);

        debug!(items = items.len(), "Refreshed cart from server");
        self.store().replace_all(items);
        Ok(())
    }

    /// Add a menu item to the cart.
    ///
    /// The server decides whether this creates a new row or merges into an
    /// existing one; the confirmed row replaces any local row with the
    /// same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; local state is unchanged.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        restaurant_id: RestaurantId,
        menu_id: MenuId,
        quantity: u32,
    ) -> Result<LineItem> {
        let dto = self
            .inner
            .api
            .add_cart_item(restaurant_id, menu_id, quantity)
            .await?;

        let item = dto.into_line_item();
        self.store().upsert(item.clone());
        Ok(item)
    }

    /// Set an item's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemBusy`] if a mutation for this item is
    /// already in flight, or the request error; local state is unchanged
    /// on failure.
    #[instrument(skip(self))]
    pub async fn set_quantity(&self, id: CartItemId, quantity: u32) -> Result<()> {
        let _guard = self.lock_item(id)?;

        if quantity == 0 {
            self.inner.api.delete_cart_item(id).await?;
            self.store().remove(id);
        } else {
            let dto = self.inner.api.update_cart_item(id, quantity).await?;
            self.store().upsert(dto.into_line_item());
        }

        Ok(())
    }

    /// Increase an item's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the item is not in the local
    /// mirror, otherwise as [`Self::set_quantity`].
    pub async fn increment(&self, id: CartItemId) -> Result<()> {
        let quantity = self.quantity_of(id)?;
        self.set_quantity(id, quantity.saturating_add(1)).await
    }

    /// Decrease an item's quantity by one; at one, the item is removed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the item is not in the local
    /// mirror, otherwise as [`Self::set_quantity`].
    pub async fn decrement(&self, id: CartItemId) -> Result<()> {
        let quantity = self.quantity_of(id)?;
        self.set_quantity(id, quantity.saturating_sub(1)).await
    }

    /// Remove an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemBusy`] if a mutation for this item is
    /// already in flight, or the request error; local state is unchanged
    /// on failure.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: CartItemId) -> Result<()> {
        let _guard = self.lock_item(id)?;

        self.inner.api.delete_cart_item(id).await?;
        self.store().remove(id);
        Ok(())
    }

    /// Empty the cart on the server and locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; local state is unchanged.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.inner.api.clear_cart().await?;
        self.store().clear();
        Ok(())
    }

    /// Check out the current cart.
    ///
    /// The local mirror is emptied only after the backend confirms the
    /// transaction; a failed checkout leaves the cart intact.
    ///
    /// # Errors
    ///
    /// Returns the request error; local state is unchanged on failure.
    #[instrument(skip(self, request))]
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<TransactionDto> {
        let transaction = self.inner.api.checkout(request).await?;

        debug!(transaction = %transaction.transaction_id, "Checkout confirmed");
        self.store().clear();
        Ok(transaction)
    }

    // =========================================================================
    // Local-only mutations
    // =========================================================================

    /// Replace the local mirror without a server round trip.
    ///
    /// For callers that already hold a confirmed server cart.
    pub fn replace_local(&self, items: Vec<LineItem>) {
        self.store().replace_all(items);
    }

    /// Drop the local mirror, e.g. on logout. The server cart is untouched.
    pub fn reset_local(&self) {
        self.store().clear();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn store(&self) -> MutexGuard<'_, CartStore> {
        lock(&self.inner.store)
    }

    fn quantity_of(&self, id: CartItemId) -> Result<u32> {
        self.store()
            .get(id)
            .map(|item| item.quantity)
            .ok_or_else(|| ApiError::NotFound(format!("Cart item {id} is not in the cart")))
    }

    fn lock_item(&self, id: CartItemId) -> Result<ItemGuard> {
        let mut in_flight = lock(&self.inner.in_flight);
        if !in_flight.insert(id) {
            return Err(ApiError::ItemBusy(id));
        }

        Ok(ItemGuard {
            inner: Arc::clone(&self.inner),
            id,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use foody_core::Money;

    use crate::config::StorefrontConfig;
    use crate::session::SessionStore;

    /// A sync whose backend refuses every connection, for failure paths.
    fn unreachable_sync() -> CartSync {
        let config = StorefrontConfig::new(
            "http://127.0.0.1:9/api".parse().expect("valid url"),
            PathBuf::from("/tmp/foody_sync_test.json"),
        );
        let session = SessionStore::open("/nonexistent/foody_sync_test.json");
        let api = ApiClient::new(&config, session).expect("client");
        CartSync::new(api)
    }

    fn line_item(id: i64, quantity: u32) -> LineItem {
        LineItem {
            id: CartItemId::new(id),
            restaurant_id: RestaurantId::new(1),
            restaurant_name: "Warung Padang".to_string(),
            restaurant_logo: None,
            menu_id: MenuId::new(10 + id),
            name: format!("Menu {id}"),
            price: Money::new(10_000),
            quantity,
            image: None,
        }
    }

    #[test]
    fn test_local_replace_and_reset() {
        let sync = unreachable_sync();
        sync.replace_local(vec![line_item(1, 2), line_item(2, 1)]);

        assert_eq!(sync.items().len(), 2);
        assert_eq!(sync.summary().total_price, Money::new(30_000));
        assert_eq!(sync.groups().len(), 1);

        sync.reset_local();
        assert!(sync.is_empty());
    }

    #[tokio::test]
    async fn test_failed_add_leaves_state_unchanged() {
        let sync = unreachable_sync();
        sync.replace_local(vec![line_item(1, 2)]);

        let result = sync
            .add_item(RestaurantId::new(1), MenuId::new(99), 1)
            .await;

        assert!(matches!(result, Err(ApiError::Http(_))));
        assert_eq!(sync.items().len(), 1);
        assert_eq!(sync.summary().total_items, 2);
    }

    #[tokio::test]
    async fn test_failed_set_quantity_releases_lock() {
        let sync = unreachable_sync();
        sync.replace_local(vec![line_item(1, 2)]);
        let id = CartItemId::new(1);

        let result = sync.set_quantity(id, 5).await;
        assert!(matches!(result, Err(ApiError::Http(_))));

        // State untouched and the item is mutable again.
        assert_eq!(sync.items().first().map(|i| i.quantity), Some(2));
        assert!(!sync.is_item_busy(id));

        let retry = sync.set_quantity(id, 5).await;
        assert!(matches!(retry, Err(ApiError::Http(_))));
    }

    #[tokio::test]
    async fn test_busy_item_rejects_second_mutation() {
        let sync = unreachable_sync();
        sync.replace_local(vec![line_item(1, 2), line_item(2, 1)]);
        let id = CartItemId::new(1);

        let _guard = sync.lock_item(id).expect("lock");
        assert!(sync.is_item_busy(id));

        let result = sync.set_quantity(id, 3).await;
        assert!(matches!(result, Err(ApiError::ItemBusy(busy)) if busy == id));

        // Other items are unaffected by this item's lock.
        assert!(!sync.is_item_busy(CartItemId::new(2)));
    }

    #[tokio::test]
    async fn test_guard_drop_releases_lock() {
        let sync = unreachable_sync();
        let id = CartItemId::new(7);

        {
            let _guard = sync.lock_item(id).expect("lock");
            assert!(sync.lock_item(id).is_err());
        }
        assert!(!sync.is_item_busy(id));
        assert!(sync.lock_item(id).is_ok());
    }

    #[tokio::test]
    async fn test_increment_unknown_item_is_not_found() {
        let sync = unreachable_sync();

        let result = sync.increment(CartItemId::new(404)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let sync = unreachable_sync();
        sync.replace_local(vec![line_item(1, 2)]);

        let request = CheckoutRequest {
            payment_method: "BNI".to_string(),
            delivery_address: "Jl. Sudirman 1".to_string(),
            notes: None,
        };
        let result = sync.checkout(&request).await;

        assert!(matches!(result, Err(ApiError::Http(_))));
        assert_eq!(sync.items().len(), 1);
    }
}
