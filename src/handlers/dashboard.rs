//! Organizer and participant dashboard handlers
//!
//! The reference "now" is taken from local time once per request and
//! passed down to the aggregator.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::models::event::{EventListFilter, EventScope};
use crate::services::gate::{ORGANIZER_GROUP, PARTICIPANT_GROUP};
use crate::services::Capability;
use crate::utils::errors::Result;

use super::AppState;
use crate::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct OrganizerQuery {
    #[serde(rename = "type")]
    pub list_type: Option<String>,
    pub category: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantQuery {
    #[serde(rename = "type")]
    pub list_type: Option<String>,
}

fn local_now() -> (NaiveDate, NaiveTime) {
    let now = Local::now();
    (now.date_naive(), now.time())
}

/// GET /dashboard: route the signed-in user to their view
pub async fn dispatch(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Redirect> {
    let profile = state.services.gate.profile(current.user.id).await?;

    if profile.in_group(ORGANIZER_GROUP) {
        Ok(Redirect::to("/organizer_dashboard"))
    } else if profile.in_group(PARTICIPANT_GROUP) {
        Ok(Redirect::to("/user_dashboard"))
    } else {
        Ok(Redirect::to("/no_permission"))
    }
}

/// GET /organizer_dashboard
pub async fn organizer(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<OrganizerQuery>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::OrganizerDashboard).await?;

    let filter = EventListFilter {
        scope: EventScope::parse(query.list_type.as_deref()),
        category_id: query.category,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let (today, now) = local_now();
    let dashboard = state.services.dashboard.organizer(filter, today, now).await?;

    Ok(Json(dashboard))
}

/// GET /user_dashboard
pub async fn participant(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ParticipantQuery>,
) -> Result<impl IntoResponse> {
    let scope = EventScope::parse(query.list_type.as_deref());
    let (today, now) = local_now();

    let dashboard = state
        .services
        .dashboard
        .participant(current.user.id, scope, today, now)
        .await?;

    Ok(Json(dashboard))
}
