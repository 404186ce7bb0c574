//! The authenticated user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Account profile as returned by the auth and profile endpoints.
///
/// Serialized in the backend's camelCase wire format; the same shape is
/// reused for the persisted session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": 12,
            "name": "Sari Dewi",
            "email": "sari@example.com",
            "phone": "081234567890",
            "createdAt": "2025-03-01T08:30:00.000Z"
        }"#;

        let user: User = serde_json::from_str(json).expect("deserialize");
        assert_eq!(user.id, UserId::new(12));
        assert_eq!(user.email, "sari@example.com");
        assert_eq!(user.created_at.timestamp(), 1_740_817_800);
    }
}
