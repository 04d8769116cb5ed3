//! RSVP coordinator
//!
//! Drives the two-state machine per (user, event) pair and sends the
//! confirmation email explicitly after a successful join, so ordering
//! and failure handling are visible at the call site.

use std::sync::Arc;
use tracing::{info, warn};

use crate::database::repositories::EventRepository;
use crate::models::event::{Event, RsvpAction};
use crate::models::user::User;
use crate::services::notification::{rsvp_confirmation_email, Notifier};
use crate::utils::errors::{EventHubError, Result};

/// Result of applying an RSVP action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpOutcome {
    /// NOT_RSVPD -> RSVPD
    Confirmed,
    /// RSVP while already RSVP'd: no-op
    AlreadyRsvpd,
    /// RSVPD -> NOT_RSVPD
    Cancelled,
    /// Cancel while not RSVP'd: no-op
    NotRsvpd,
}

impl RsvpOutcome {
    /// No-op outcomes are reported as warnings, not errors
    pub fn is_warning(&self) -> bool {
        matches!(self, RsvpOutcome::AlreadyRsvpd | RsvpOutcome::NotRsvpd)
    }

    pub fn message(&self) -> &'static str {
        match self {
            RsvpOutcome::Confirmed => "RSVP successful!",
            RsvpOutcome::AlreadyRsvpd => "You have already RSVP to this event.",
            RsvpOutcome::Cancelled => "Your RSVP has been cancelled.",
            RsvpOutcome::NotRsvpd => "You are not RSVP to this event.",
        }
    }
}

/// Pure transition function for the per-pair state machine
pub fn transition(action: RsvpAction, currently_rsvpd: bool) -> RsvpOutcome {
    match (action, currently_rsvpd) {
        (RsvpAction::Rsvp, false) => RsvpOutcome::Confirmed,
        (RsvpAction::Rsvp, true) => RsvpOutcome::AlreadyRsvpd,
        (RsvpAction::Cancel, true) => RsvpOutcome::Cancelled,
        (RsvpAction::Cancel, false) => RsvpOutcome::NotRsvpd,
    }
}

/// RSVP coordination service
#[derive(Clone)]
pub struct RsvpService {
    events: EventRepository,
    notifier: Arc<dyn Notifier>,
}

impl RsvpService {
    pub fn new(events: EventRepository, notifier: Arc<dyn Notifier>) -> Self {
        Self { events, notifier }
    }

    /// Apply an RSVP action for a user on an event
    pub async fn submit(&self, user: &User, event_id: i64, action: RsvpAction) -> Result<(Event, RsvpOutcome)> {
        let event = self.events.find_by_id(event_id).await?
            .ok_or(EventHubError::EventNotFound { event_id })?;

        let currently = self.events.is_participant(event.id, user.id).await?;
        let outcome = transition(action, currently);

        match outcome {
            RsvpOutcome::Confirmed => {
                // A racing duplicate leaves the edge in place and the
                // insert reports it, so the no-op path still wins.
                let inserted = self.events.add_participant(event.id, user.id).await?;
                if !inserted {
                    return Ok((event, RsvpOutcome::AlreadyRsvpd));
                }

                info!(user_id = user.id, event_id = event.id, "RSVP confirmed");

                let message = rsvp_confirmation_email(user, &event);
                if let Err(e) = self.notifier.send(message).await {
                    warn!(user_id = user.id, event_id = event.id, error = %e,
                          "Failed to send RSVP confirmation email");
                }
            }
            RsvpOutcome::Cancelled => {
                self.events.remove_participant(event.id, user.id).await?;
                info!(user_id = user.id, event_id = event.id, "RSVP cancelled");
            }
            RsvpOutcome::AlreadyRsvpd | RsvpOutcome::NotRsvpd => {
                info!(user_id = user.id, event_id = event.id, outcome = ?outcome, "RSVP no-op");
            }
        }

        Ok((event, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsvp_from_not_rsvpd_confirms() {
        assert_eq!(transition(RsvpAction::Rsvp, false), RsvpOutcome::Confirmed);
    }

    #[test]
    fn test_rsvp_twice_is_a_warning_noop() {
        let outcome = transition(RsvpAction::Rsvp, true);
        assert_eq!(outcome, RsvpOutcome::AlreadyRsvpd);
        assert!(outcome.is_warning());
    }

    #[test]
    fn test_cancel_from_rsvpd_cancels() {
        let outcome = transition(RsvpAction::Cancel, true);
        assert_eq!(outcome, RsvpOutcome::Cancelled);
        assert!(!outcome.is_warning());
    }

    #[test]
    fn test_cancel_without_rsvp_is_a_warning_noop() {
        let outcome = transition(RsvpAction::Cancel, false);
        assert_eq!(outcome, RsvpOutcome::NotRsvpd);
        assert!(outcome.is_warning());
    }

    #[test]
    fn test_rsvp_then_cancel_returns_to_start() {
        // Walk the machine by hand: each transition feeds the next.
        let mut rsvpd = false;

        assert_eq!(transition(RsvpAction::Rsvp, rsvpd), RsvpOutcome::Confirmed);
        rsvpd = true;

        assert_eq!(transition(RsvpAction::Cancel, rsvpd), RsvpOutcome::Cancelled);
        rsvpd = false;

        assert_eq!(transition(RsvpAction::Cancel, rsvpd), RsvpOutcome::NotRsvpd);
    }
}
