//! Dashboard aggregator
//!
//! Read-only queries computing counts and filtered event lists for the
//! organizer and participant views. The reference "now" is an explicit
//! `(today, now)` pair taken once at the request boundary.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::database::repositories::{CategoryRepository, EventRepository, UserRepository};
use crate::models::category::Category;
use crate::models::event::{EventListFilter, EventRow, EventScope};
use crate::utils::errors::Result;

/// Where an event sits relative to the reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Upcoming,
    Past,
}

/// Classify an event by date, with time as the tie-break on the
/// current day. An event starting exactly now counts as upcoming.
pub fn classify(date: NaiveDate, time: NaiveTime, today: NaiveDate, now: NaiveTime) -> Timing {
    if date > today || (date == today && time >= now) {
        Timing::Upcoming
    } else {
        Timing::Past
    }
}

pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizerCounts {
    pub total_events: i64,
    pub upcoming_events: i64,
    pub past_events: i64,
    /// Distinct user accounts system-wide
    pub total_participants_distinct: i64,
    /// Sum of per-event participant counts
    pub total_participants_all_events_sum: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizerDashboard {
    pub counts: OrganizerCounts,
    pub events: Vec<EventRow>,
    pub todays_events: Vec<EventRow>,
    pub list_type: &'static str,
    pub selected_category: Option<i64>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantCounts {
    pub total_rsvp: i64,
    pub upcoming_rsvp: i64,
    pub past_rsvp: i64,
    pub today_rsvp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDashboard {
    pub counts: ParticipantCounts,
    pub events: Vec<EventRow>,
    pub todays_events: Vec<EventRow>,
    pub list_type: &'static str,
}

/// Dashboard aggregation service
#[derive(Debug, Clone)]
pub struct DashboardService {
    events: EventRepository,
    users: UserRepository,
    categories: CategoryRepository,
}

impl DashboardService {
    pub fn new(events: EventRepository, users: UserRepository, categories: CategoryRepository) -> Self {
        Self { events, users, categories }
    }

    /// Organizer view: system-wide counts plus the filtered event list,
    /// newest first
    pub async fn organizer(
        &self,
        filter: EventListFilter,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<OrganizerDashboard> {
        let counts = OrganizerCounts {
            total_events: self.events.count().await?,
            upcoming_events: self.events.count_upcoming(today, now).await?,
            past_events: self.events.count_past(today, now).await?,
            total_participants_distinct: self.users.count().await?,
            total_participants_all_events_sum: self.events.participant_sum().await?,
        };

        let events = self.events.list_filtered(&filter, today, now).await?;
        let todays_events = self.events.todays_rows(today).await?;
        let categories = self.categories.list_all().await?;

        Ok(OrganizerDashboard {
            counts,
            events,
            todays_events,
            list_type: filter.scope.as_str(),
            selected_category: filter.category_id,
            categories,
        })
    }

    /// Participant view: the same partition scoped to the signed-in
    /// user's RSVP set, soonest first
    pub async fn participant(
        &self,
        user_id: i64,
        scope: EventScope,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<ParticipantDashboard> {
        let (total, upcoming, past, today_count) =
            self.events.user_rsvp_counts(user_id, today, now).await?;

        let counts = ParticipantCounts {
            total_rsvp: total,
            upcoming_rsvp: upcoming,
            past_rsvp: past,
            today_rsvp: today_count,
        };

        let events = self.events.user_rsvp_rows(user_id, scope.as_str(), today, now).await?;
        let todays_events = self.events.user_todays_rows(user_id, today).await?;

        Ok(ParticipantDashboard {
            counts,
            events,
            todays_events,
            list_type: scope.as_str(),
        })
    }
}
