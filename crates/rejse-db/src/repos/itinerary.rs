use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItineraryRow {
    pub itinerary_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewItinerary<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub struct ItineraryRepo;

impl ItineraryRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        itinerary: NewItinerary<'_>,
    ) -> Result<ItineraryRow> {
        let row = sqlx::query_as::<_, ItineraryRow>(
            r#"INSERT INTO itinerary (user_id, title, description, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING itinerary_id, user_id, title, description, start_date, end_date, created_at, updated_at"#,
        )
        .bind(user_id)
        .bind(itinerary.title)
        .bind(itinerary.description)
        .bind(itinerary.start_date)
        .bind(itinerary.end_date)
        .fetch_one(pool)
        .await
        .context("Failed to create itinerary")?;
        Ok(row)
    }

    /// Owner-scoped listing, most recent trips first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ItineraryRow>> {
        let rows = sqlx::query_as::<_, ItineraryRow>(
            r#"SELECT itinerary_id, user_id, title, description, start_date, end_date, created_at, updated_at
               FROM itinerary WHERE user_id = $1
               ORDER BY start_date DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list itineraries")?;
        Ok(rows)
    }

    /// Fetch an itinerary only if it belongs to `user_id`.
    /// A foreign itinerary is indistinguishable from a missing one.
    pub async fn get_owned(
        pool: &PgPool,
        itinerary_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItineraryRow>> {
        let row = sqlx::query_as::<_, ItineraryRow>(
            r#"SELECT itinerary_id, user_id, title, description, start_date, end_date, created_at, updated_at
               FROM itinerary WHERE itinerary_id = $1 AND user_id = $2"#,
        )
        .bind(itinerary_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get itinerary")?;
        Ok(row)
    }
}
