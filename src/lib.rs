//! EventHub
//!
//! An event-management web service: organizers create and manage
//! events, participants browse and RSVP, administrators manage user
//! accounts, roles, and groups.

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventHubError, Result};

// Re-export main components for easy access
pub use handlers::AppState;
pub use services::ServiceFactory;
pub use state::SessionStore;
