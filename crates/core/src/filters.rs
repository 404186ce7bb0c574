//! Restaurant discovery filters.
//!
//! A plain holder for four independent fields used to parameterize
//! `GET /resto`. Distance and rating toggle off when the active option is
//! selected again; price bounds are plain overwrites. Values are passed to
//! the backend exactly as entered - the server owns validation, including
//! `price_min > price_max`.

use crate::types::Money;

/// Distance buckets offered by the discovery UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceBucket {
    Nearby,
    Within1Km,
    Within3Km,
    Within5Km,
}

impl DistanceBucket {
    /// The `range` query value understood by `GET /resto`.
    #[must_use]
    pub const fn range(self) -> u8 {
        match self {
            Self::Nearby => 0,
            Self::Within1Km => 1,
            Self::Within3Km => 3,
            Self::Within5Km => 5,
        }
    }
}

/// User-selected discovery filters for the restaurant list.
///
/// Holds query parameters only; nothing here is persisted beyond the
/// active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestaurantFilters {
    pub distance: Option<DistanceBucket>,
    pub price_min: Option<Money>,
    pub price_max: Option<Money>,
    /// Star rating, 1..=5.
    pub rating: Option<u8>,
}

impl RestaurantFilters {
    /// Select a distance bucket; selecting the active one clears it.
    pub fn toggle_distance(&mut self, bucket: DistanceBucket) {
        self.distance = if self.distance == Some(bucket) {
            None
        } else {
            Some(bucket)
        };
    }

    /// Select a star rating; selecting the active one clears it.
    pub fn toggle_rating(&mut self, rating: u8) {
        self.rating = if self.rating == Some(rating) {
            None
        } else {
            Some(rating)
        };
    }

    /// Overwrite the minimum price bound; `None` clears it.
    pub fn set_price_min(&mut self, min: Option<Money>) {
        self.price_min = min;
    }

    /// Overwrite the maximum price bound; `None` clears it.
    pub fn set_price_max(&mut self, max: Option<Money>) {
        self.price_max = max;
    }

    /// Clear all four fields.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.distance.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.rating.is_none()
    }

    /// Query parameters for `GET /resto`; unset fields are skipped.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(distance) = self.distance {
            params.push(("range", distance.range().to_string()));
        }
        if let Some(min) = self.price_min {
            params.push(("priceMin", min.amount().to_string()));
        }
        if let Some(max) = self.price_max {
            params.push(("priceMax", max.amount().to_string()));
        }
        if let Some(rating) = self.rating {
            params.push(("rating", rating.to_string()));
        }
        params
    }
}
