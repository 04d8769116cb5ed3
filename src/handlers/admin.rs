//! Admin-area handlers: user accounts, role assignment, groups
//!
//! Every route here is gated on the admin capability; protected
//! records (superusers, the "admin" group) abort with an error message
//! and no state change.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::services::Capability;
use crate::utils::errors::{EventHubError, Result};

use super::error::ApiMessage;
use super::AppState;
use crate::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct AdminDashboardAction {
    pub action: String,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    /// Group id of the role to assign
    pub role: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupAction {
    pub action: String,
    pub group_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// GET /admin_dashboard: all users with their first group name
pub async fn admin_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::AdminArea).await?;

    let users = state.services.identity.list_users_with_role().await?;
    let users: Vec<_> = users
        .into_iter()
        .map(|(user, role)| {
            json!({
                "id": user.id,
                "username": user.username,
                "email": user.email,
                "is_active": user.is_active,
                "is_superuser": user.is_superuser,
                "groups_name": role.unwrap_or_else(|| "No Group Assigned".to_string()),
            })
        })
        .collect();

    Ok(Json(json!({ "users": users })))
}

/// POST /admin_dashboard: currently only user deletion
pub async fn admin_dashboard_action(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<AdminDashboardAction>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::AdminArea).await?;

    match body.action.as_str() {
        "delete_user" => {
            let user_id = body.user_id
                .ok_or_else(|| EventHubError::InvalidInput("User id missing.".to_string()))?;

            let username = state.services.identity.delete_user(current.user.id, user_id).await?;

            Ok(Json(ApiMessage::success(format!(
                "User '{}' deleted successfully.",
                username
            ))))
        }
        _ => Err(EventHubError::InvalidInput("Unknown action.".to_string())),
    }
}

/// POST /assign_role/:user_id: single-valued role assignment
pub async fn assign_role(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<i64>,
    Json(body): Json<AssignRoleRequest>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::AdminArea).await?;

    let (user, group) = state
        .services
        .identity
        .assign_role(current.user.id, user_id, body.role)
        .await?;

    Ok(Json(ApiMessage::success(format!(
        "User {} assigned to role {}.",
        user.username, group.name
    ))))
}

/// POST /create_group
pub async fn create_group(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::AdminArea).await?;

    let group = state.services.identity.create_group(&body.name).await?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("Group {} has been created successfully", group.name),
        "group": group,
    })))
}

/// GET /show_groups: groups with their members
pub async fn show_groups(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::AdminArea).await?;

    let groups = state.services.identity.list_groups_with_members().await?;

    Ok(Json(json!({ "groups": groups })))
}

/// POST /show_groups: delete a group or remove a user from one
pub async fn group_action(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<GroupAction>,
) -> Result<impl IntoResponse> {
    state.services.gate.require(current.user.id, Capability::AdminArea).await?;

    match body.action.as_str() {
        "delete_group" => {
            let group_id = body.group_id
                .ok_or_else(|| EventHubError::InvalidInput("Group id missing.".to_string()))?;

            let name = state.services.identity.delete_group(current.user.id, group_id).await?;

            Ok(Json(ApiMessage::success(format!(
                "Group '{}' has been deleted.",
                name
            ))))
        }
        "remove_user" => {
            let group_id = body.group_id
                .ok_or_else(|| EventHubError::InvalidInput("Group id missing.".to_string()))?;
            let user_id = body.user_id
                .ok_or_else(|| EventHubError::InvalidInput("User id missing.".to_string()))?;

            let (user, group) = state
                .services
                .identity
                .remove_user_from_group(current.user.id, group_id, user_id)
                .await?;

            Ok(Json(ApiMessage::success(format!(
                "{} removed from group '{}'.",
                user.display_name(),
                group.name
            ))))
        }
        _ => Err(EventHubError::InvalidInput("Unknown action.".to_string())),
    }
}
