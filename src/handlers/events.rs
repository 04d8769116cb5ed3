//! Public event list, event detail with RSVP, and catalog management
//! handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::models::event::{CreateEventRequest, EventRow, RsvpAction, UpdateEventRequest};
use crate::models::category::CreateCategoryRequest;
use crate::services::Capability;
use crate::utils::errors::{EventHubError, Result};

use super::error::ApiMessage;
use super::AppState;
use crate::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventActionRequest {
    pub action: String,
}

/// Events without an uploaded image get the configured default path.
fn with_default_asset(mut rows: Vec<EventRow>, default_path: &str) -> Vec<EventRow> {
    for row in &mut rows {
        if row.asset_path.is_none() {
            row.asset_path = Some(default_path.to_string());
        }
    }
    rows
}

/// GET /home: public event list with optional search
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<impl IntoResponse> {
    let term = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let events = state.services.events.search(term).await?;
    let events = with_default_asset(events, &state.settings.media.default_event_image);

    Ok(Json(json!({
        "events": events,
        "query": term.unwrap_or(""),
    })))
}

/// GET /event/:id: event detail with the caller's RSVP state
pub async fn event_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let event = state.services.events.find_row(id).await?
        .ok_or(EventHubError::EventNotFound { event_id: id })?;

    let user_rsvp = state.services.events.is_participant(id, current.user.id).await?;
    let mut events = with_default_asset(vec![event], &state.settings.media.default_event_image);
    let event = events.remove(0);

    Ok(Json(json!({
        "event": event,
        "user_rsvp": user_rsvp,
    })))
}

/// POST /event/:id: apply an RSVP action
pub async fn event_action(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<EventActionRequest>,
) -> Result<impl IntoResponse> {
    let action = RsvpAction::parse(&body.action)
        .ok_or_else(|| EventHubError::InvalidInput("Invalid action.".to_string()))?;

    let (_event, outcome) = state.services.rsvp.submit(&current.user, id, action).await?;

    let message = if outcome.is_warning() {
        ApiMessage::warning(outcome.message())
    } else {
        ApiMessage::success(outcome.message())
    };

    Ok(Json(message))
}

/// POST /create_event
pub async fn create_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(form): Json<CreateEventRequest>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::CreateEvent).await?;

    let event = state.services.catalog.create_event(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Event Created Successfully",
            "event": event,
        })),
    ))
}

/// POST /update_event/:id
pub async fn update_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(form): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::UpdateEvent).await?;

    let event = state.services.catalog.update_event(id, form).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Event Updated Successfully",
        "event": event,
    })))
}

/// POST /delete_event/:id
pub async fn delete_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::DeleteEvent).await?;

    state.services.catalog.delete_event(id).await?;

    Ok(Json(ApiMessage::success("Event Deleted Successfully")))
}

/// POST /add_category
pub async fn add_category(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(form): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::AddCategory).await?;

    let category = state.services.catalog.add_category(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Category added successfully!",
            "category": category,
        })),
    ))
}
