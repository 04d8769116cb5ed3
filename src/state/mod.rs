//! Session state module
//!
//! Redis-backed sign-in sessions.

pub mod sessions;

pub use sessions::SessionStore;
