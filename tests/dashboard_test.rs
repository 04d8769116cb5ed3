//! Dashboard aggregation integration tests
//!
//! Run with a database available:
//! `TEST_DATABASE_URL=... cargo test -- --ignored`

mod helpers;

use chrono::{NaiveDate, NaiveTime};
use serial_test::serial;

use eventhub::models::event::{EventListFilter, EventScope};
use eventhub::services::DashboardService;
use helpers::TestDatabase;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, min, 0).unwrap()
}

struct Fixture {
    db: TestDatabase,
    today: NaiveDate,
    noon: NaiveTime,
    yesterday_id: i64,
    today_earlier_id: i64,
    today_later_id: i64,
    tomorrow_id: i64,
}

/// Events at {yesterday, today 09:00, today 15:00, tomorrow}, with the
/// reference now at today noon.
async fn fixture() -> Fixture {
    let db = TestDatabase::new().await.expect("test database");
    let category = db.seed_category("Fixture").await.unwrap();

    let today = d(2025, 5, 10);
    let noon = t(12, 0);

    let yesterday = db.seed_event("Yesterday", category.id, d(2025, 5, 9), noon).await.unwrap();
    let today_earlier = db.seed_event("Today Earlier", category.id, today, t(9, 0)).await.unwrap();
    let today_later = db.seed_event("Today Later", category.id, today, t(15, 0)).await.unwrap();
    let tomorrow = db.seed_event("Tomorrow", category.id, d(2025, 5, 11), noon).await.unwrap();

    Fixture {
        db,
        today,
        noon,
        yesterday_id: yesterday.id,
        today_earlier_id: today_earlier.id,
        today_later_id: today_later.id,
        tomorrow_id: tomorrow.id,
    }
}

fn dashboard(db: &TestDatabase) -> DashboardService {
    DashboardService::new(db.events(), db.users(), db.categories())
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn test_upcoming_past_today_partitions_match_exactly() {
    let fx = fixture().await;
    let service = dashboard(&fx.db);

    let upcoming = service
        .organizer(
            EventListFilter { scope: EventScope::Upcoming, ..Default::default() },
            fx.today,
            fx.noon,
        )
        .await
        .unwrap();

    let upcoming_ids: Vec<i64> = upcoming.events.iter().map(|e| e.id).collect();
    assert_eq!(upcoming_ids, vec![fx.tomorrow_id, fx.today_later_id]); // newest first

    let past = service
        .organizer(
            EventListFilter { scope: EventScope::Past, ..Default::default() },
            fx.today,
            fx.noon,
        )
        .await
        .unwrap();

    let past_ids: Vec<i64> = past.events.iter().map(|e| e.id).collect();
    assert_eq!(past_ids, vec![fx.today_earlier_id, fx.yesterday_id]);

    let today_ids: Vec<i64> = past.todays_events.iter().map(|e| e.id).collect();
    assert_eq!(today_ids, vec![fx.today_earlier_id, fx.today_later_id]); // by time

    assert_eq!(past.counts.total_events, 4);
    assert_eq!(past.counts.upcoming_events, 2);
    assert_eq!(past.counts.past_events, 2);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn test_organizer_filters_by_category_and_date_range() {
    let fx = fixture().await;
    let service = dashboard(&fx.db);

    let other = fx.db.seed_category("Other").await.unwrap();
    let outlier = fx.db.seed_event("Outlier", other.id, d(2025, 6, 1), fx.noon).await.unwrap();

    let filtered = service
        .organizer(
            EventListFilter { category_id: Some(other.id), ..Default::default() },
            fx.today,
            fx.noon,
        )
        .await
        .unwrap();
    let ids: Vec<i64> = filtered.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![outlier.id]);

    // Range bounds are inclusive and only apply when both are present
    let ranged = service
        .organizer(
            EventListFilter {
                start_date: Some(d(2025, 5, 9)),
                end_date: Some(d(2025, 5, 10)),
                ..Default::default()
            },
            fx.today,
            fx.noon,
        )
        .await
        .unwrap();
    assert_eq!(ranged.events.len(), 3);

    let half_open = service
        .organizer(
            EventListFilter { start_date: Some(d(2025, 5, 9)), ..Default::default() },
            fx.today,
            fx.noon,
        )
        .await
        .unwrap();
    assert_eq!(half_open.events.len(), 5);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL test database"]
async fn test_participant_view_is_scoped_to_own_rsvps() {
    let fx = fixture().await;
    let service = dashboard(&fx.db);

    let attendee = fx.db.seed_user("attendee").await.unwrap();
    let bystander = fx.db.seed_user("bystander").await.unwrap();

    for event_id in [fx.yesterday_id, fx.today_earlier_id, fx.today_later_id, fx.tomorrow_id] {
        fx.db.events().add_participant(event_id, attendee.id).await.unwrap();
    }
    fx.db.events().add_participant(fx.tomorrow_id, bystander.id).await.unwrap();

    let view = service
        .participant(attendee.id, EventScope::All, fx.today, fx.noon)
        .await
        .unwrap();

    assert_eq!(view.counts.total_rsvp, 4);
    assert_eq!(view.counts.upcoming_rsvp, 2);
    assert_eq!(view.counts.past_rsvp, 2);
    assert_eq!(view.counts.today_rsvp, 2);

    // Ascending date/time order for participants
    let ids: Vec<i64> = view.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![fx.yesterday_id, fx.today_earlier_id, fx.today_later_id, fx.tomorrow_id]);

    let bystander_view = service
        .participant(bystander.id, EventScope::All, fx.today, fx.noon)
        .await
        .unwrap();
    assert_eq!(bystander_view.counts.total_rsvp, 1);
    assert_eq!(bystander_view.events.len(), 1);

    // System-wide sum counts every edge once
    assert_eq!(fx.db.events().participant_sum().await.unwrap(), 5);
}
