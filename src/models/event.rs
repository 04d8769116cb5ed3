//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub category_id: i64,
    pub asset_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event row joined with its category name and participant count, as
/// listed on the dashboards.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub category_id: i64,
    pub category_name: String,
    pub asset_path: Option<String>,
    pub participant_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub category_id: i64,
    pub asset_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub category_id: Option<i64>,
    pub asset_path: Option<String>,
}

/// Which slice of the event list a dashboard request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventScope {
    #[default]
    All,
    Upcoming,
    Past,
}

impl EventScope {
    /// Parse the `type` query parameter; anything unrecognized falls
    /// back to the full list, matching the original behavior.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("upcoming") => EventScope::Upcoming,
            Some("past") => EventScope::Past,
            _ => EventScope::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventScope::All => "all",
            EventScope::Upcoming => "upcoming",
            EventScope::Past => "past",
        }
    }
}

/// Filters applied to the organizer event list.
#[derive(Debug, Clone, Default)]
pub struct EventListFilter {
    pub scope: EventScope,
    pub category_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Action requested on the event detail endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpAction {
    Rsvp,
    Cancel,
}

impl RsvpAction {
    /// Parse the form value, trimmed and case-insensitive as in the
    /// original form handling.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "rsvp" => Some(RsvpAction::Rsvp),
            "cancel" => Some(RsvpAction::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_scope_parsing_defaults_to_all() {
        assert_eq!(EventScope::parse(Some("upcoming")), EventScope::Upcoming);
        assert_eq!(EventScope::parse(Some("past")), EventScope::Past);
        assert_eq!(EventScope::parse(Some("everything")), EventScope::All);
        assert_eq!(EventScope::parse(None), EventScope::All);
    }

    #[test]
    fn test_rsvp_action_parsing() {
        assert_eq!(RsvpAction::parse("rsvp"), Some(RsvpAction::Rsvp));
        assert_eq!(RsvpAction::parse(" RSVP "), Some(RsvpAction::Rsvp));
        assert_eq!(RsvpAction::parse("Cancel"), Some(RsvpAction::Cancel));
        assert_eq!(RsvpAction::parse("attend"), None);
        assert_eq!(RsvpAction::parse(""), None);
    }
}
