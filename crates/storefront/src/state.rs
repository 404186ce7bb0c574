//! Top-level storefront handle tying the stores together.
//!
//! One [`Storefront`] owns the session store, the API client, the cart
//! synchronizer, and the restaurant filter state. The embedding UI holds a
//! clone of this handle and renders from its snapshots.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;
use tracing::{instrument, warn};

use foody_core::filters::RestaurantFilters;
use foody_core::orders::OrderRestaurantView;
use foody_core::{OrderStatus, RestaurantId, User};

use crate::api::ApiClient;
use crate::api::types::{
    AuthData, OrderSummaryDto, Pagination, RegisterRequest, RestaurantDetail, RestaurantPage,
    ReviewDto, ReviewRequest, UpdateProfileRequest,
};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::session::SessionStore;
use crate::sync::CartSync;

/// The storefront's client-side state and backend access, as one handle.
///
/// Cheaply cloneable; all clones share the same state.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    session: SessionStore,
    api: ApiClient,
    cart: CartSync,
    filters: Mutex<RestaurantFilters>,
}

impl Storefront {
    /// Build a storefront from configuration.
    ///
    /// Loads any persisted session record; the cart mirror starts empty
    /// until the first [`CartSync::refresh`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let session = SessionStore::open(config.session_file.clone());
        let api = ApiClient::new(&config, session.clone())?;
        let cart = CartSync::new(api.clone());

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                session,
                api,
                cart,
                filters: Mutex::new(RestaurantFilters::default()),
            }),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn cart(&self) -> &CartSync {
        &self.inner.cart
    }

    /// The restaurant filter state.
    ///
    /// The guard must not be held across an await point; take it, mutate,
    /// and drop it before issuing requests.
    #[must_use]
    pub fn filters(&self) -> MutexGuard<'_, RestaurantFilters> {
        self.inner
            .filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    // =========================================================================
    // Auth & Profile
    // =========================================================================

    /// Log in and persist the credentials.
    ///
    /// After a successful login the server cart is fetched into the local
    /// mirror; a failed cart fetch is logged but does not fail the login.
    ///
    /// # Errors
    ///
    /// Returns the request error, or a session error if the credentials
    /// cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let auth = self.inner.api.login(email, password).await?;
        self.complete_auth(auth).await
    }

    /// Register a new account and persist the credentials.
    ///
    /// # Errors
    ///
    /// Returns the request error, or a session error if the credentials
    /// cannot be persisted.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let auth = self.inner.api.register(request).await?;
        self.complete_auth(auth).await
    }

    async fn complete_auth(&self, auth: AuthData) -> Result<User> {
        let user = auth.user.clone();
        self.inner
            .session
            .set_credentials(auth.user, SecretString::from(auth.token))?;

        if let Err(e) = self.inner.cart.refresh().await {
            warn!(error = %e, "Could not fetch cart after sign-in");
        }

        Ok(user)
    }

    /// Clear the session and the local cart mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session record cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        self.inner.session.logout()?;
        self.inner.cart.reset_local();
        Ok(())
    }

    /// Fetch the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn profile(&self) -> Result<User> {
        self.inner.api.profile().await
    }

    /// Update the profile and refresh the persisted user record.
    ///
    /// # Errors
    ///
    /// Returns the request error, or a session error if the updated record
    /// cannot be persisted.
    #[instrument(skip(self, request))]
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        let user = self.inner.api.update_profile(request).await?;

        // Keep the persisted record in step with the server copy.
        if let Some(token) = self.inner.session.token() {
            self.inner.session.set_credentials(user.clone(), token)?;
        }

        Ok(user)
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Fetch a restaurant page under the current filters.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    #[instrument(skip(self))]
    pub async fn restaurants(&self, page: u32, limit: u32) -> Result<RestaurantPage> {
        let filters = *self.filters();
        self.inner.api.restaurants(page, limit, &filters).await
    }

    /// Fetch one restaurant's detail page.
    ///
    /// # Errors
    ///
    /// Returns the request error; not-found renders as empty state.
    pub async fn restaurant_detail(
        &self,
        id: RestaurantId,
        limit_menu: u32,
        limit_review: u32,
    ) -> Result<RestaurantDetail> {
        self.inner
            .api
            .restaurant_detail(id, limit_menu, limit_review)
            .await
    }

    // =========================================================================
    // Orders & Reviews
    // =========================================================================

    /// Fetch a page of order history, flattened to per-restaurant cards.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    #[instrument(skip(self))]
    pub async fn order_history(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<OrderRestaurantView>, Pagination)> {
        let data = self.inner.api.my_orders(status, page, limit).await?;

        let views = data
            .orders
            .into_iter()
            .flat_map(OrderSummaryDto::into_views)
            .collect();

        Ok((views, data.pagination))
    }

    /// Publish a review for a delivered order.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn submit_review(&self, request: &ReviewRequest) -> Result<ReviewDto> {
        self.inner.api.create_review(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use foody_core::filters::DistanceBucket;

    fn storefront() -> Storefront {
        let config = StorefrontConfig::new(
            "http://127.0.0.1:9/api".parse().expect("valid url"),
            PathBuf::from("/nonexistent/foody_state_test.json"),
        );
        Storefront::new(config).expect("storefront")
    }

    #[test]
    fn test_starts_logged_out_with_empty_cart() {
        let storefront = storefront();
        assert!(!storefront.is_authenticated());
        assert!(storefront.cart().is_empty());
        assert!(storefront.filters().is_empty());
    }

    #[test]
    fn test_filters_shared_across_clones() {
        let storefront = storefront();
        let clone = storefront.clone();

        storefront.filters().toggle_distance(DistanceBucket::Nearby);
        assert_eq!(clone.filters().distance, Some(DistanceBucket::Nearby));

        clone.filters().toggle_distance(DistanceBucket::Nearby);
        assert!(storefront.filters().is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_stays_logged_out() {
        let storefront = storefront();

        let result = storefront.login("sari@example.com", "secret").await;
        assert!(result.is_err());
        assert!(!storefront.is_authenticated());
    }

    #[test]
    fn test_logout_without_session_is_ok() {
        let storefront = storefront();
        storefront.logout().expect("logout");
        assert!(!storefront.is_authenticated());
    }
}
