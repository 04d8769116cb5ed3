//! Middleware module
//!
//! Request-level concerns: session resolution into `CurrentUser`.

pub mod auth;

pub use auth::{CurrentUser, resolve_current_user, extract_session_token};
