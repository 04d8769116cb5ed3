//! Authentication middleware
//!
//! Resolves the session token carried by the request (cookie or bearer
//! header) into a `CurrentUser` stored in request extensions. Handlers
//! take `CurrentUser` as an extractor argument; requests without a
//! valid session are redirected to the sign-in route by the extractor,
//! never by a panic or a 5xx.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::handlers::AppState;
use crate::models::user::User;
use crate::utils::errors::EventHubError;

/// The signed-in user attached to a request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session_token: String,
}

/// Pull the session token out of the request headers. The cookie is
/// what browsers send; the bearer form serves API clients.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        let pair = pair.trim();
        if let Some(token) = pair.strip_prefix("session=") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    None
}

/// Resolve the session, if any, and attach the user to the request
pub async fn resolve_current_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_session_token(request.headers()) {
        match state.sessions.resolve(&token).await {
            Ok(Some(user_id)) => {
                if let Ok(Some(user)) = state.services.users.find_by_id(user_id).await {
                    debug!(user_id = user.id, "Session resolved");
                    request.extensions_mut().insert(CurrentUser {
                        user,
                        session_token: token,
                    });
                }
            }
            Ok(None) => debug!("Unknown or expired session token"),
            Err(e) => tracing::warn!(error = %e, "Session lookup failed"),
        }
    }

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    // Maps to a redirect to the sign-in route.
    type Rejection = EventHubError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(EventHubError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(extract_session_token(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn test_cookie_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=tok-9; lang=en"),
        );
        assert_eq!(extract_session_token(&headers), Some("tok-9".to_string()));
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session=from-cookie"));
        assert_eq!(extract_session_token(&headers), Some("from-header".to_string()));
    }

    #[test]
    fn test_missing_token() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(extract_session_token(&headers), None);
    }
}
