//! Sign-up, sign-in, activation and session handlers

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

use crate::models::user::{SignInRequest, SignUpRequest};
use crate::utils::errors::Result;

use super::error::ApiMessage;
use super::AppState;
use crate::middleware::CurrentUser;

/// POST /sign_up
pub async fn sign_up(
    State(state): State<AppState>,
    Json(form): Json<SignUpRequest>,
) -> Result<impl IntoResponse> {
    let user = state.services.identity.sign_up(form).await?;

    info!(user_id = user.id, "Sign-up completed");
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::success(
            "A Confirmation mail sent. Please check your email",
        )),
    ))
}

/// POST /sign_in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(form): Json<SignInRequest>,
) -> Result<impl IntoResponse> {
    let user = state.services.identity.authenticate(&form).await?;
    let token = state.sessions.create(user.id).await?;

    info!(user_id = user.id, "User signed in");

    let cookie = format!(
        "session={}; Path=/; HttpOnly; Max-Age={}",
        token, state.settings.redis.session_ttl_seconds
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "status": "success",
            "message": "Signed in",
            "token": token,
            "username": user.username,
        })),
    ))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse> {
    state.sessions.destroy(&current.session_token).await?;

    info!(user_id = current.user.id, "User signed out");

    let cookie = "session=; Path=/; HttpOnly; Max-Age=0".to_string();
    Ok(([(header::SET_COOKIE, cookie)], Json(ApiMessage::success("Signed out"))))
}

/// GET /activate/:user_id/:token
pub async fn activate(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(i64, String)>,
) -> Result<impl IntoResponse> {
    state.services.identity.activate(user_id, &token).await?;

    Ok(Json(ApiMessage::success(
        "Account activated. You can now sign in.",
    )))
}

/// GET /no_permission, the fixed deny fallback
pub async fn no_permission() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(ApiMessage::error(
            "You do not have permission to view this page",
        )),
    )
}
