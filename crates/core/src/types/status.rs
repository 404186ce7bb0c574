//! Order status as reported by the backend.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a placed order.
///
/// The wire format is snake_case, matching both the order-history payload
/// and the `status` query parameter of `GET /order/my-order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Preparing,
    OnTheWay,
    Delivered,
    Done,
    Cancelled,
}

impl OrderStatus {
    /// Query-parameter value understood by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_snake_case() {
        let status: OrderStatus = serde_json::from_str("\"on_the_way\"").expect("deserialize");
        assert_eq!(status, OrderStatus::OnTheWay);
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).expect("serialize"),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_as_str_matches_serde() {
        for status in [
            OrderStatus::Preparing,
            OrderStatus::OnTheWay,
            OrderStatus::Delivered,
            OrderStatus::Done,
            OrderStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
