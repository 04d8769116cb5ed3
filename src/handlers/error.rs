//! Error-to-response mapping
//!
//! Authorization failures redirect to the fixed sign-in / no-permission
//! routes; everything else maps to a JSON body carrying a message at
//! one of the levels the UI renders (success, warning, error).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::utils::errors::EventHubError;

/// Message payload mirroring the success/warning/error levels
#[derive(Debug, Clone, Serialize)]
pub struct ApiMessage {
    pub status: &'static str,
    pub message: String,
}

impl ApiMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: "success", message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { status: "warning", message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: "error", message: message.into() }
    }
}

impl IntoResponse for EventHubError {
    fn into_response(self) -> Response {
        match self {
            EventHubError::Unauthenticated => Redirect::to("/sign_in").into_response(),

            EventHubError::PermissionDenied(_) => Redirect::to("/no_permission").into_response(),

            EventHubError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ApiMessage::error("Invalid username or password")),
            )
                .into_response(),

            EventHubError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "status": "error", "errors": fields })),
            )
                .into_response(),

            EventHubError::InvalidActivationToken => (
                StatusCode::BAD_REQUEST,
                Json(ApiMessage::error("Invalid activation link")),
            )
                .into_response(),

            EventHubError::UserNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ApiMessage::error("User not found")),
            )
                .into_response(),

            EventHubError::GroupNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ApiMessage::error("Group not found")),
            )
                .into_response(),

            EventHubError::EventNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ApiMessage::error("Event not found.")),
            )
                .into_response(),

            EventHubError::CategoryNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ApiMessage::error("Category not found")),
            )
                .into_response(),

            EventHubError::Protected(message) => (
                StatusCode::CONFLICT,
                Json(ApiMessage::error(message)),
            )
                .into_response(),

            EventHubError::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                Json(ApiMessage::error(message)),
            )
                .into_response(),

            other => {
                error!(error = %other, "Unhandled error while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiMessage::error("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_redirects() {
        let response = EventHubError::PermissionDenied("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/no_permission")
        );
    }

    #[test]
    fn test_unauthenticated_redirects_to_sign_in() {
        let response = EventHubError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/sign_in")
        );
    }

    #[test]
    fn test_validation_maps_to_422() {
        let response = EventHubError::field("email", "bad").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_protected_maps_to_conflict() {
        let response = EventHubError::Protected("guarded".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let response = EventHubError::Config("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
