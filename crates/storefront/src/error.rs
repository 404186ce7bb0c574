//! Error taxonomy for backend calls.
//!
//! Three families, mirroring how the UI reacts to them: field-validation
//! errors mapped onto form fields by `path`, generic request failures shown
//! as a single transient notification, and not-found responses rendered as
//! empty state rather than errors. Nothing is retried automatically and no
//! error is fatal; a failed request leaves prior state unchanged.

use foody_core::CartItemId;
use serde::Deserialize;
use thiserror::Error;

use crate::session::SessionError;

/// Fallback notification text when the backend supplies no message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// A single field-validation failure reported by the backend.
///
/// The backend sends more context (`type`, `value`, `location`); only the
/// parts the UI keys on are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    /// Request-body field the error applies to.
    pub path: String,
    /// Human-readable message.
    #[serde(rename = "msg")]
    pub message: String,
}

/// Errors from talking to the Foody backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend rejected individual request fields.
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Backend reported a failure with an HTTP status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Resource does not exist; render as empty state, not an error.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A mutation for this cart item is already in flight.
    #[error("Cart item {0} has an update in flight")]
    ItemBusy(CartItemId),

    /// Persisting or clearing the session record failed.
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Message suitable for a user-facing notification.
    ///
    /// Uses the backend-supplied message when there is one, otherwise falls
    /// back to a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Validation(errors) => errors
                .first()
                .map_or_else(|| GENERIC_FAILURE_MESSAGE.to_string(), |e| e.message.clone()),
            Self::NotFound(message) => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Field errors keyed by `path`, for form rendering.
    ///
    /// Empty for every non-validation error.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// True when the response should render as empty state.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn email_error() -> FieldError {
        FieldError {
            path: "email".to_string(),
            message: "Invalid email address".to_string(),
        }
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = ApiError::Validation(vec![email_error()]);
        assert_eq!(
            err.to_string(),
            "Validation failed: email: Invalid email address"
        );
    }

    #[test]
    fn test_validation_display_without_details() {
        let err = ApiError::Validation(vec![]);
        assert_eq!(
            err.to_string(),
            "Validation failed: (no error details provided)"
        );
    }

    #[test]
    fn test_user_message_prefers_backend_message() {
        let err = ApiError::Api {
            status: 500,
            message: "Cart is empty".to_string(),
        };
        assert_eq!(err.user_message(), "Cart is empty");
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let err = ApiError::Api {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let busy = ApiError::ItemBusy(CartItemId::new(3));
        assert_eq!(busy.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_field_errors_only_for_validation() {
        let err = ApiError::Validation(vec![email_error()]);
        assert_eq!(err.field_errors().len(), 1);

        let other = ApiError::NotFound("restaurant 9".to_string());
        assert!(other.field_errors().is_empty());
        assert!(other.is_not_found());
    }

    #[test]
    fn test_field_error_deserializes_backend_shape() {
        let json = r#"{
            "type": "field",
            "value": "not-an-email",
            "msg": "Invalid email address",
            "path": "email",
            "location": "body"
        }"#;
        let field: FieldError = serde_json::from_str(json).expect("deserialize");
        assert_eq!(field, email_error());
    }
}
