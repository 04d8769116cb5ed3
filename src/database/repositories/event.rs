//! Event repository implementation
//!
//! Dashboard queries take the reference `(today, now)` pair as explicit
//! parameters so the upcoming/past split is decided once, at the
//! request boundary.

use sqlx::PgPool;
use chrono::{NaiveDate, NaiveTime, Utc};
use crate::models::event::{Event, EventRow, EventListFilter, CreateEventRequest, UpdateEventRequest};
use crate::utils::errors::EventHubError;

const EVENT_COLUMNS: &str = "id, name, description, date, time, location, category_id, asset_path, created_at, updated_at";

/// Joined row shape shared by every listing query.
const ROW_SELECT: &str = r#"
    SELECT e.id, e.name, e.description, e.date, e.time, e.location,
           e.category_id, c.name AS category_name, e.asset_path,
           COUNT(ep.user_id) AS participant_count
    FROM events e
    INNER JOIN categories c ON c.id = e.category_id
    LEFT JOIN event_participants ep ON ep.event_id = e.id
"#;

const ROW_GROUP: &str = " GROUP BY e.id, c.name ";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, EventHubError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, description, date, time, location, category_id, asset_path, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, name, description, date, time, location, category_id, asset_path, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.date)
        .bind(request.time)
        .bind(request.location)
        .bind(request.category_id)
        .bind(request.asset_path)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventHubError> {
        let event = sqlx::query_as::<_, Event>(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1")
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, EventHubError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                time = COALESCE($5, time),
                location = COALESCE($6, location),
                category_id = COALESCE($7, category_id),
                asset_path = COALESCE($8, asset_path),
                updated_at = $9
            WHERE id = $1
            RETURNING id, name, description, date, time, location, category_id, asset_path, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.date)
        .bind(request.time)
        .bind(request.location)
        .bind(request.category_id)
        .bind(request.asset_path)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event; returns whether a row existed
    pub async fn delete(&self, id: i64) -> Result<bool, EventHubError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Public event list with optional search over name and location
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<EventRow>, EventHubError> {
        let sql = format!(
            r#"{ROW_SELECT}
            WHERE ($1::text IS NULL OR e.name ILIKE '%' || $1 || '%' OR e.location ILIKE '%' || $1 || '%')
            {ROW_GROUP}
            ORDER BY e.date ASC, e.time ASC
            "#
        );

        let events = sqlx::query_as::<_, EventRow>(&sql)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// One event with category name and participant count
    pub async fn find_row(&self, id: i64) -> Result<Option<EventRow>, EventHubError> {
        let sql = format!("{ROW_SELECT} WHERE e.id = $1 {ROW_GROUP}");

        let event = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    /// Organizer event list: scope plus optional category and date
    /// range filters, newest first. The range applies only when both
    /// bounds are present.
    pub async fn list_filtered(
        &self,
        filter: &EventListFilter,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<Vec<EventRow>, EventHubError> {
        let sql = format!(
            r#"{ROW_SELECT}
            WHERE ( $3 = 'all'
                 OR ($3 = 'upcoming' AND (e.date > $1 OR (e.date = $1 AND e.time >= $2)))
                 OR ($3 = 'past'     AND (e.date < $1 OR (e.date = $1 AND e.time <  $2))) )
              AND ($4::bigint IS NULL OR e.category_id = $4)
              AND ($5::date IS NULL OR $6::date IS NULL OR e.date BETWEEN $5 AND $6)
            {ROW_GROUP}
            ORDER BY e.date DESC, e.time DESC
            "#
        );

        let events = sqlx::query_as::<_, EventRow>(&sql)
            .bind(today)
            .bind(now)
            .bind(filter.scope.as_str())
            .bind(filter.category_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Events taking place today, earliest first
    pub async fn todays_rows(&self, today: NaiveDate) -> Result<Vec<EventRow>, EventHubError> {
        let sql = format!("{ROW_SELECT} WHERE e.date = $1 {ROW_GROUP} ORDER BY e.time ASC");

        let events = sqlx::query_as::<_, EventRow>(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count events not yet past
    pub async fn count_upcoming(&self, today: NaiveDate, now: NaiveTime) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events e WHERE e.date > $1 OR (e.date = $1 AND e.time >= $2)"
        )
        .bind(today)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Count events already past
    pub async fn count_past(&self, today: NaiveDate, now: NaiveTime) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events e WHERE e.date < $1 OR (e.date = $1 AND e.time < $2)"
        )
        .bind(today)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Sum of per-event participant counts (every RSVP edge counted once)
    pub async fn participant_sum(&self) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM event_participants")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Add the RSVP edge. Returns false when the edge already existed;
    /// the conflict clause keeps a racing duplicate harmless.
    pub async fn add_participant(&self, event_id: i64, user_id: i64) -> Result<bool, EventHubError> {
        let result = sqlx::query(
            r#"
            INSERT INTO event_participants (event_id, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#
        )
        .bind(event_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove the RSVP edge. Returns false when there was none.
    pub async fn remove_participant(&self, event_id: i64, user_id: i64) -> Result<bool, EventHubError> {
        let result = sqlx::query(
            "DELETE FROM event_participants WHERE event_id = $1 AND user_id = $2"
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether the user has RSVP'd to the event
    pub async fn is_participant(&self, event_id: i64, user_id: i64) -> Result<bool, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_participants WHERE event_id = $1 AND user_id = $2"
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Participant count for one event
    pub async fn participant_count(&self, event_id: i64) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_participants WHERE event_id = $1"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Events the user has RSVP'd to, scoped like the dashboards and
    /// ordered soonest first
    pub async fn user_rsvp_rows(
        &self,
        user_id: i64,
        scope: &str,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<Vec<EventRow>, EventHubError> {
        let sql = format!(
            r#"
            SELECT e.id, e.name, e.description, e.date, e.time, e.location,
                   e.category_id, c.name AS category_name, e.asset_path,
                   COUNT(ep.user_id) AS participant_count
            FROM events e
            INNER JOIN categories c ON c.id = e.category_id
            INNER JOIN event_participants me ON me.event_id = e.id AND me.user_id = $4
            LEFT JOIN event_participants ep ON ep.event_id = e.id
            WHERE ( $3 = 'all'
                 OR ($3 = 'upcoming' AND (e.date > $1 OR (e.date = $1 AND e.time >= $2)))
                 OR ($3 = 'past'     AND (e.date < $1 OR (e.date = $1 AND e.time <  $2))) )
            {ROW_GROUP}
            ORDER BY e.date ASC, e.time ASC
            "#
        );

        let events = sqlx::query_as::<_, EventRow>(&sql)
            .bind(today)
            .bind(now)
            .bind(scope)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Today's slice of the user's RSVP set, earliest first
    pub async fn user_todays_rows(&self, user_id: i64, today: NaiveDate) -> Result<Vec<EventRow>, EventHubError> {
        let sql = format!(
            r#"
            SELECT e.id, e.name, e.description, e.date, e.time, e.location,
                   e.category_id, c.name AS category_name, e.asset_path,
                   COUNT(ep.user_id) AS participant_count
            FROM events e
            INNER JOIN categories c ON c.id = e.category_id
            INNER JOIN event_participants me ON me.event_id = e.id AND me.user_id = $2
            LEFT JOIN event_participants ep ON ep.event_id = e.id
            WHERE e.date = $1
            {ROW_GROUP}
            ORDER BY e.time ASC
            "#
        );

        let events = sqlx::query_as::<_, EventRow>(&sql)
            .bind(today)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// RSVP counts for the participant dashboard:
    /// (total, upcoming, past, today)
    pub async fn user_rsvp_counts(
        &self,
        user_id: i64,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<(i64, i64, i64, i64), EventHubError> {
        let counts: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE e.date > $2 OR (e.date = $2 AND e.time >= $3)),
                   COUNT(*) FILTER (WHERE e.date < $2 OR (e.date = $2 AND e.time < $3)),
                   COUNT(*) FILTER (WHERE e.date = $2)
            FROM events e
            INNER JOIN event_participants ep ON ep.event_id = e.id
            WHERE ep.user_id = $1
            "#
        )
        .bind(user_id)
        .bind(today)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
