//! HTTP handlers module
//!
//! Axum handlers for every route the service exposes, plus the router
//! wiring and the error-to-response mapping.

pub mod error;
pub mod auth;
pub mod events;
pub mod dashboard;
pub mod admin;

pub use error::ApiMessage;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::services::ServiceFactory;
use crate::state::SessionStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub sessions: SessionStore,
    pub settings: Settings,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public surface
        .route("/home", get(events::home))
        .route("/sign_up", post(auth::sign_up))
        .route("/sign_in", post(auth::sign_in))
        .route("/logout", post(auth::logout))
        .route("/activate/:user_id/:token", get(auth::activate))
        .route("/no_permission", get(auth::no_permission))
        // Events and catalog
        .route("/event/:id", get(events::event_detail).post(events::event_action))
        .route("/create_event", post(events::create_event))
        .route("/update_event/:id", post(events::update_event))
        .route("/delete_event/:id", post(events::delete_event))
        .route("/add_category", post(events::add_category))
        // Dashboards
        .route("/dashboard", get(dashboard::dispatch))
        .route("/organizer_dashboard", get(dashboard::organizer))
        .route("/user_dashboard", get(dashboard::participant))
        // Admin area
        .route(
            "/admin_dashboard",
            get(admin::admin_dashboard).post(admin::admin_dashboard_action),
        )
        .route("/assign_role/:user_id", post(admin::assign_role))
        .route("/create_group", post(admin::create_group))
        .route("/show_groups", get(admin::show_groups).post(admin::group_action))
        .layer(from_fn_with_state(
            state.clone(),
            crate::middleware::resolve_current_user,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
