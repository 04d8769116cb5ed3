//! Shared test helpers

pub mod database_helper;
pub mod notifier;

pub use database_helper::TestDatabase;
pub use notifier::{RecordingNotifier, FailingNotifier};
