//! Error handling for EventHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use std::collections::HashMap;
use thiserror::Error;

/// Main error type for the EventHub application
#[derive(Error, Debug)]
pub enum EventHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Validation failed")]
    Validation(HashMap<String, String>),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid activation link")]
    InvalidActivationToken,

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Category not found: {category_id}")]
    CategoryNotFound { category_id: i64 },

    #[error("{0}")]
    Protected(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for EventHub operations
pub type Result<T> = std::result::Result<T, EventHubError>;

impl EventHubError {
    /// Build a validation error for a single field
    pub fn field(name: &str, message: &str) -> Self {
        let mut errors = HashMap::new();
        errors.insert(name.to_string(), message.to_string());
        EventHubError::Validation(errors)
    }

    /// Check if the error is caused by the client request rather than
    /// a server-side fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EventHubError::Validation(_)
                | EventHubError::Unauthenticated
                | EventHubError::InvalidCredentials
                | EventHubError::PermissionDenied(_)
                | EventHubError::InvalidActivationToken
                | EventHubError::UserNotFound { .. }
                | EventHubError::GroupNotFound { .. }
                | EventHubError::EventNotFound { .. }
                | EventHubError::CategoryNotFound { .. }
                | EventHubError::Protected(_)
                | EventHubError::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_carries_field_name() {
        let err = EventHubError::field("email", "Enter a valid email address");
        match err {
            EventHubError::Validation(fields) => {
                assert_eq!(fields.get("email").map(String::as_str), Some("Enter a valid email address"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_client_error_classification() {
        assert!(EventHubError::Unauthenticated.is_client_error());
        assert!(EventHubError::PermissionDenied("x".into()).is_client_error());
        assert!(EventHubError::Protected("x".into()).is_client_error());
        assert!(!EventHubError::Config("x".into()).is_client_error());
        assert!(!EventHubError::Email("x".into()).is_client_error());
    }
}
