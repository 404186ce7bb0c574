//! HTTP client for the Foody REST backend.
//!
//! Every endpoint speaks the standard `{success, message, data, errors}`
//! envelope. The client attaches the bearer token from the session store
//! when one is present, maps failure responses onto [`ApiError`], and keeps
//! a short-TTL cache in front of the restaurant read endpoints. Cart and
//! order endpoints are never cached.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use foody_core::filters::RestaurantFilters;
use foody_core::{CartItemId, MenuId, OrderStatus, RestaurantId, User};

use crate::config::StorefrontConfig;
use crate::error::{ApiError, FieldError, Result};
use crate::session::SessionStore;

use types::{
    AddCartRequest, AuthData, CartData, CartItemData, CartItemDto, CheckoutData, CheckoutRequest,
    Envelope, LoginRequest, OrdersPage, RegisterRequest, RestaurantDetail, RestaurantPage,
    ReviewData, ReviewDto, ReviewRequest, TransactionDto, UpdateCartRequest, UpdateProfileRequest,
};

/// How long cached restaurant reads stay fresh.
const RESTAURANT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached restaurant responses.
const RESTAURANT_CACHE_CAPACITY: u64 = 1000;

/// Cached restaurant read results.
#[derive(Clone)]
enum CacheValue {
    List(RestaurantPage),
    Detail(Box<RestaurantDetail>),
}

/// Client for the Foody REST API.
///
/// Cheaply cloneable; all clones share the HTTP connection pool, the
/// session store, and the restaurant cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash, so paths can be appended directly.
    base_url: String,
    session: SessionStore,
    restaurant_cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Build a client from configuration and a session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &StorefrontConfig, session: SessionStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let restaurant_cache = Cache::builder()
            .max_capacity(RESTAURANT_CACHE_CAPACITY)
            .time_to_live(RESTAURANT_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                session,
                restaurant_cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Envelope plumbing
    // =========================================================================

    /// Send a request and parse the response envelope.
    ///
    /// Attaches the bearer token when a session exists. Non-2xx responses
    /// and `success: false` envelopes both become errors.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>> {
        let builder = match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: envelope.message.unwrap_or_default(),
            });
        }

        Ok(envelope)
    }

    /// Execute and require a `data` payload.
    async fn fetch<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T> {
        let envelope = self.execute::<T>(builder).await?;

        envelope.data.ok_or_else(|| ApiError::Api {
            status: 200,
            message: envelope
                .message
                .unwrap_or_else(|| "Response contained no data".to_string()),
        })
    }

    /// Execute an endpoint whose success response carries no payload.
    async fn fetch_unit(&self, builder: reqwest::RequestBuilder) -> Result<()> {
        self.execute::<serde_json::Value>(builder).await.map(|_| ())
    }

    // =========================================================================
    // Auth & Profile
    // =========================================================================

    /// `POST /auth/login`
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthData> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/auth/login"))
            .json(&LoginRequest { email, password });

        self.fetch(builder).await
    }

    /// `POST /auth/register`
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthData> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/auth/register"))
            .json(request);

        self.fetch(builder).await
    }

    /// `GET /auth/profile`
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User> {
        self.fetch(self.inner.client.get(self.endpoint("/auth/profile")))
            .await
    }

    /// `PUT /auth/profile`
    #[instrument(skip(self, request))]
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        let builder = self
            .inner
            .client
            .put(self.endpoint("/auth/profile"))
            .json(request);

        self.fetch(builder).await
    }

    // =========================================================================
    // Restaurants
    // =========================================================================

    /// `GET /resto`
    ///
    /// Unfiltered pages are served from the cache when fresh. Filtered
    /// queries always hit the backend, so the cache never has to account
    /// for filter combinations.
    #[instrument(skip(self, filters))]
    pub async fn restaurants(
        &self,
        page: u32,
        limit: u32,
        filters: &RestaurantFilters,
    ) -> Result<RestaurantPage> {
        let cache_key = format!("restaurants:{page}:{limit}");

        if filters.is_empty()
            && let Some(CacheValue::List(cached)) = self.inner.restaurant_cache.get(&cache_key).await
        {
            debug!(page, limit, "Returning cached restaurant page");
            return Ok(cached);
        }

        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("limit", limit.to_string())];
        query.extend(filters.to_query());

        let result: RestaurantPage = self
            .fetch(self.inner.client.get(self.endpoint("/resto")).query(&query))
            .await?;

        if filters.is_empty() {
            self.inner
                .restaurant_cache
                .insert(cache_key, CacheValue::List(result.clone()))
                .await;
        }

        Ok(result)
    }

    /// `GET /resto/{id}`
    #[instrument(skip(self))]
    pub async fn restaurant_detail(
        &self,
        id: RestaurantId,
        limit_menu: u32,
        limit_review: u32,
    ) -> Result<RestaurantDetail> {
        let cache_key = format!("restaurant:{id}:{limit_menu}:{limit_review}");

        if let Some(CacheValue::Detail(cached)) = self.inner.restaurant_cache.get(&cache_key).await
        {
            debug!(%id, "Returning cached restaurant detail");
            return Ok(*cached);
        }

        let query = [
            ("limitMenu", limit_menu.to_string()),
            ("limitReview", limit_review.to_string()),
        ];
        let builder = self
            .inner
            .client
            .get(self.endpoint(&format!("/resto/{id}")))
            .query(&query);

        let detail: RestaurantDetail = self.fetch(builder).await?;

        self.inner
            .restaurant_cache
            .insert(cache_key, CacheValue::Detail(Box::new(detail.clone())))
            .await;

        Ok(detail)
    }

    /// Drop every cached restaurant response.
    ///
    /// Called after writes that change what restaurant reads would return,
    /// such as publishing a review.
    pub async fn invalidate_restaurants(&self) {
        self.inner.restaurant_cache.invalidate_all();
        self.inner.restaurant_cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// `GET /cart`
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<CartData> {
        self.fetch(self.inner.client.get(self.endpoint("/cart")))
            .await
    }

    /// `POST /cart`
    #[instrument(skip(self))]
    pub async fn add_cart_item(
        &self,
        restaurant_id: RestaurantId,
        menu_id: MenuId,
        quantity: u32,
    ) -> Result<CartItemDto> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/cart"))
            .json(&AddCartRequest {
                restaurant_id,
                menu_id,
                quantity,
            });

        self.fetch::<CartItemData>(builder).await.map(|d| d.cart_item)
    }

    /// `PUT /cart/{id}`
    #[instrument(skip(self))]
    pub async fn update_cart_item(&self, id: CartItemId, quantity: u32) -> Result<CartItemDto> {
        let builder = self
            .inner
            .client
            .put(self.endpoint(&format!("/cart/{id}")))
            .json(&UpdateCartRequest { quantity });

        self.fetch::<CartItemData>(builder).await.map(|d| d.cart_item)
    }

    /// `DELETE /cart/{id}`
    #[instrument(skip(self))]
    pub async fn delete_cart_item(&self, id: CartItemId) -> Result<()> {
        self.fetch_unit(self.inner.client.delete(self.endpoint(&format!("/cart/{id}"))))
            .await
    }

    /// `DELETE /cart`
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<()> {
        self.fetch_unit(self.inner.client.delete(self.endpoint("/cart")))
            .await
    }

    // =========================================================================
    // Checkout & Orders
    // =========================================================================

    /// `POST /order/checkout`
    #[instrument(skip(self, request))]
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<TransactionDto> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/order/checkout"))
            .json(request);

        self.fetch::<CheckoutData>(builder).await.map(|d| d.transaction)
    }

    /// `GET /order/my-order`
    #[instrument(skip(self))]
    pub async fn my_orders(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        limit: u32,
    ) -> Result<OrdersPage> {
        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }

        self.fetch(
            self.inner
                .client
                .get(self.endpoint("/order/my-order"))
                .query(&query),
        )
        .await
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// `POST /review`
    ///
    /// Invalidates cached restaurant reads so the new review and rating
    /// show up on the next detail fetch.
    #[instrument(skip(self, request))]
    pub async fn create_review(&self, request: &ReviewRequest) -> Result<ReviewDto> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/review"))
            .json(request);

        let review = self.fetch::<ReviewData>(builder).await.map(|d| d.review)?;
        self.invalidate_restaurants().await;
        Ok(review)
    }
}

/// Failure-response body; both fields are optional because proxies and
/// crashes can produce bodies that are not the standard envelope.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Vec<FieldError>>,
}

/// Map a non-2xx response onto the error taxonomy.
fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    if let Some(errors) = parsed.errors
        && !errors.is_empty()
    {
        return ApiError::Validation(errors);
    }

    let message = parsed.message.unwrap_or_default();

    if status == StatusCode::NOT_FOUND {
        let message = if message.is_empty() {
            "Resource not found".to_string()
        } else {
            message
        };
        return ApiError::NotFound(message);
    }

    ApiError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn client() -> ApiClient {
        let config = StorefrontConfig::new(
            "http://localhost:8080/api/".parse().expect("valid url"),
            PathBuf::from("/tmp/foody_auth_test.json"),
        );
        let session = SessionStore::open("/nonexistent/foody_auth_test.json");
        ApiClient::new(&config, session).expect("client")
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = client();
        assert_eq!(
            client.endpoint("/cart"),
            "http://localhost:8080/api/cart".to_string()
        );
    }

    #[test]
    fn test_error_from_response_maps_validation() {
        let body = r#"{
            "success": false,
            "message": "Validation failed",
            "errors": [
                { "msg": "Email is required", "path": "email" }
            ]
        }"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, body);

        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.first().map(|e| e.path.as_str()), Some("email"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_error_from_response_maps_not_found() {
        let body = r#"{ "success": false, "message": "Restaurant not found" }"#;
        let err = error_from_response(StatusCode::NOT_FOUND, body);

        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Restaurant not found");
    }

    #[test]
    fn test_error_from_response_tolerates_non_envelope_body() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 502);
                assert!(message.is_empty());
            }
            other => panic!("expected api error, got {other}"),
        }
    }

    #[test]
    fn test_error_from_response_keeps_backend_message() {
        let body = r#"{ "success": false, "message": "Cart is empty" }"#;
        let err = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.user_message(), "Cart is empty");
    }
}
