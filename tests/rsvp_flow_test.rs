//! RSVP coordinator integration tests
//!
//! These exercise the state machine against a real PostgreSQL store.
//! Run them with a database available:
//! `TEST_DATABASE_URL=... cargo test -- --ignored`

mod helpers;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use serial_test::serial;

use eventhub::models::event::RsvpAction;
use eventhub::services::rsvp::{RsvpOutcome, RsvpService};
use eventhub::services::CatalogService;
use eventhub::utils::errors::EventHubError;
use helpers::{FailingNotifier, RecordingNotifier, TestDatabase};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, min, 0).unwrap()
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn test_rsvp_is_idempotent_and_warns_on_replay() {
    let db = TestDatabase::new().await.expect("test database");
    let user = db.seed_user("rsvp_user").await.unwrap();
    let category = db.seed_category("Workshops").await.unwrap();
    let event = db.seed_event("Lindy Hop Night", category.id, d(2030, 1, 15), t(19, 0)).await.unwrap();

    let notifier = RecordingNotifier::new();
    let service = RsvpService::new(db.events(), Arc::new(notifier.clone()));

    let (_, outcome) = service.submit(&user, event.id, RsvpAction::Rsvp).await.unwrap();
    assert_eq!(outcome, RsvpOutcome::Confirmed);
    assert_eq!(db.events().participant_count(event.id).await.unwrap(), 1);
    assert_eq!(notifier.messages().len(), 1);
    assert!(notifier.messages()[0].subject.contains("Lindy Hop Night"));

    // Second RSVP: unchanged participant set, warning, no second email
    let (_, outcome) = service.submit(&user, event.id, RsvpAction::Rsvp).await.unwrap();
    assert_eq!(outcome, RsvpOutcome::AlreadyRsvpd);
    assert!(outcome.is_warning());
    assert_eq!(db.events().participant_count(event.id).await.unwrap(), 1);
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn test_rsvp_then_cancel_restores_participant_set() {
    let db = TestDatabase::new().await.expect("test database");
    let user = db.seed_user("cancel_user").await.unwrap();
    let category = db.seed_category("Socials").await.unwrap();
    let event = db.seed_event("Spring Social", category.id, d(2030, 4, 1), t(20, 0)).await.unwrap();

    let service = RsvpService::new(db.events(), Arc::new(RecordingNotifier::new()));

    service.submit(&user, event.id, RsvpAction::Rsvp).await.unwrap();
    let (_, outcome) = service.submit(&user, event.id, RsvpAction::Cancel).await.unwrap();

    assert_eq!(outcome, RsvpOutcome::Cancelled);
    assert_eq!(db.events().participant_count(event.id).await.unwrap(), 0);
    assert!(!db.events().is_participant(event.id, user.id).await.unwrap());

    // Cancelling again is a warning no-op
    let (_, outcome) = service.submit(&user, event.id, RsvpAction::Cancel).await.unwrap();
    assert_eq!(outcome, RsvpOutcome::NotRsvpd);
    assert!(outcome.is_warning());
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn test_rsvp_email_failure_does_not_roll_back_state() {
    let db = TestDatabase::new().await.expect("test database");
    let user = db.seed_user("unlucky_user").await.unwrap();
    let category = db.seed_category("Classes").await.unwrap();
    let event = db.seed_event("Beginner Class", category.id, d(2030, 2, 1), t(18, 0)).await.unwrap();

    let service = RsvpService::new(db.events(), Arc::new(FailingNotifier));

    let (_, outcome) = service.submit(&user, event.id, RsvpAction::Rsvp).await.unwrap();

    assert_eq!(outcome, RsvpOutcome::Confirmed);
    assert!(db.events().is_participant(event.id, user.id).await.unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn test_referenced_category_cannot_be_deleted() {
    let db = TestDatabase::new().await.expect("test database");
    let category = db.seed_category("Protected").await.unwrap();
    let event = db.seed_event("Holdout", category.id, d(2030, 3, 1), t(12, 0)).await.unwrap();

    let catalog = CatalogService::new(db.events(), db.categories());

    let err = catalog.delete_category(category.id).await.unwrap_err();
    assert_matches!(err, EventHubError::Protected(_));
    assert!(db.categories().find_by_id(category.id).await.unwrap().is_some());

    // Once nothing references it, deletion goes through
    catalog.delete_event(event.id).await.unwrap();
    catalog.delete_category(category.id).await.unwrap();
    assert!(db.categories().find_by_id(category.id).await.unwrap().is_none());
}
