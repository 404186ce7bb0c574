//! Wire types for the Foody REST API.
//!
//! Field names follow the backend's camelCase JSON. Conversions into the
//! `foody-core` domain types live next to the DTOs they consume, so the
//! rest of the crate never touches raw wire shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foody_core::cart::LineItem;
use foody_core::orders::{OrderHeader, OrderLine, OrderPricing, OrderRestaurantView, split_by_restaurant};
use foody_core::{CartItemId, MenuId, Money, OrderId, OrderStatus, RestaurantId, ReviewId, User, UserId};

use crate::error::FieldError;

/// Standard response envelope wrapping every endpoint's payload.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}

// =============================================================================
// Restaurants
// =============================================================================

/// Inclusive menu price bounds of a restaurant.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

/// One row of the restaurant list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummary {
    pub id: RestaurantId,
    pub name: String,
    pub star: f64,
    pub place: String,
    pub logo: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub review_count: u32,
    pub menu_count: u32,
    pub price_range: PriceRange,
    /// Distance from the requester, in kilometres.
    pub distance: f64,
}

/// Page metadata for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// The next page number, if there is one.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.page < self.total_pages {
            Some(self.page + 1)
        } else {
            None
        }
    }
}

/// One page of the restaurant list.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantPage {
    pub restaurants: Vec<RestaurantSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

/// A menu entry, as embedded in both restaurant detail and cart payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuId,
    pub food_name: String,
    pub price: Money,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUser {
    pub id: UserId,
    pub name: String,
}

/// A published review on a restaurant's detail page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub star: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user: ReviewUser,
}

/// Restaurant detail with its menus and reviews.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetail {
    pub id: RestaurantId,
    pub name: String,
    pub star: f64,
    pub average_rating: f64,
    pub place: String,
    pub coordinates: Coordinates,
    pub logo: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub total_menus: u32,
    pub total_reviews: u32,
    pub menus: Vec<MenuItem>,
    pub reviews: Vec<Review>,
}

// =============================================================================
// Cart
// =============================================================================

/// Restaurant reference embedded in cart payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct CartRestaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// One server-side cart row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: CartItemId,
    pub restaurant: CartRestaurant,
    pub menu: MenuItem,
    pub quantity: u32,
    pub item_total: Money,
}

impl CartItemDto {
    /// Flatten into the local line-item shape; the server-issued id is
    /// authoritative.
    #[must_use]
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            id: self.id,
            restaurant_id: self.restaurant.id,
            restaurant_name: self.restaurant.name,
            restaurant_logo: self.restaurant.logo,
            menu_id: self.menu.id,
            name: self.menu.food_name,
            price: self.menu.price,
            quantity: self.quantity,
            image: self.menu.image,
        }
    }
}

/// The server cart, grouped per restaurant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartGroupDto {
    pub restaurant: CartRestaurant,
    pub items: Vec<CartItemDto>,
    pub subtotal: Money,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryDto {
    pub total_items: u32,
    pub total_price: Money,
    pub restaurant_count: u32,
}

/// Payload of `GET /cart`.
#[derive(Debug, Clone, Deserialize)]
pub struct CartData {
    pub cart: Vec<CartGroupDto>,
    pub summary: CartSummaryDto,
}

/// Payload wrapper of cart mutations (`POST /cart`, `PUT /cart/{id}`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemData {
    pub cart_item: CartItemDto,
}

/// Flatten the server's restaurant-grouped cart into line items.
///
/// The group's restaurant is authoritative for every row under it.
#[must_use]
pub fn flatten_cart(groups: Vec<CartGroupDto>) -> Vec<LineItem> {
    let mut items = Vec::new();

    for group in groups {
        let restaurant = group.restaurant;
        for item in group.items {
            items.push(LineItem {
                id: item.id,
                restaurant_id: restaurant.id,
                restaurant_name: restaurant.name.clone(),
                restaurant_logo: restaurant.logo.clone(),
                menu_id: item.menu.id,
                name: item.menu.food_name,
                price: item.menu.price,
                quantity: item.quantity,
                image: item.menu.image,
            });
        }
    }

    items
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCartRequest {
    pub restaurant_id: RestaurantId,
    pub menu_id: MenuId,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateCartRequest {
    pub quantity: u32,
}

// =============================================================================
// Auth & Profile
// =============================================================================

/// Payload of successful login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Body of `PUT /auth/profile`. Password fields are only sent when the
/// user is changing their password.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

// =============================================================================
// Checkout & Orders
// =============================================================================

/// Body of `POST /order/checkout`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: String,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Server-computed pricing breakdown of a transaction.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDto {
    pub subtotal: Money,
    pub service_fee: Money,
    pub delivery_fee: Money,
    pub total_price: Money,
}

impl From<PricingDto> for OrderPricing {
    fn from(dto: PricingDto) -> Self {
        Self {
            subtotal: dto.subtotal,
            service_fee: dto.service_fee,
            delivery_fee: dto.delivery_fee,
            total_price: dto.total_price,
        }
    }
}

/// One purchased menu line inside a transaction payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemDto {
    pub menu_id: MenuId,
    pub menu_name: String,
    pub price: Money,
    pub quantity: u32,
    pub item_total: Money,
}

/// One restaurant's slice of a freshly created transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRestaurantDto {
    pub restaurant: CartRestaurant,
    pub items: Vec<TransactionItemDto>,
    pub subtotal: Money,
}

/// The transaction created by checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: OrderId,
    pub transaction_id: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub pricing: PricingDto,
    pub restaurants: Vec<TransactionRestaurantDto>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutData {
    pub transaction: TransactionDto,
}

/// One restaurant's slice of a past order, as listed by
/// `GET /order/my-order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRestaurantDto {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub items: Vec<TransactionItemDto>,
    pub subtotal: Money,
}

/// A past order spanning one or more restaurants.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryDto {
    pub id: OrderId,
    pub transaction_id: String,
    pub status: OrderStatus,
    pub payment_method: String,
    pub updated_at: DateTime<Utc>,
    pub restaurants: Vec<OrderRestaurantDto>,
}

impl OrderSummaryDto {
    /// Per-restaurant history cards, produced by the same single-pass
    /// grouping the live cart uses.
    #[must_use]
    pub fn into_views(self) -> Vec<OrderRestaurantView> {
        let header = OrderHeader {
            order_id: self.id,
            transaction_code: self.transaction_id,
            status: self.status,
            payment_method: self.payment_method,
            updated_at: self.updated_at,
        };

        let mut lines = Vec::new();
        for restaurant in self.restaurants {
            for item in restaurant.items {
                lines.push(OrderLine {
                    restaurant_id: restaurant.restaurant_id,
                    restaurant_name: restaurant.restaurant_name.clone(),
                    restaurant_logo: None,
                    menu_id: item.menu_id,
                    menu_name: item.menu_name,
                    price: item.price,
                    quantity: item.quantity,
                    item_total: item.item_total,
                });
            }
        }

        split_by_restaurant(&header, &lines)
    }
}

/// One page of the order history.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    pub orders: Vec<OrderSummaryDto>,
    pub pagination: Pagination,
}

// =============================================================================
// Reviews
// =============================================================================

/// Body of `POST /review`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub transaction_id: String,
    pub restaurant_id: RestaurantId,
    pub star: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRestaurant {
    pub id: RestaurantId,
    pub name: String,
}

/// The created review as echoed back by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: ReviewId,
    pub star: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user: ReviewUser,
    pub restaurant: ReviewRestaurant,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewData {
    pub review: ReviewDto,
}
