use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItineraryItemRow {
    pub item_id: Uuid,
    pub itinerary_id: Uuid,
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visit_date: Option<NaiveDate>,
    pub visit_order: Option<i32>,
    pub memo: Option<String>,
    pub place_type: Option<String>,
    pub external_place_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewItineraryItem<'a> {
    pub place_name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub visit_date: Option<NaiveDate>,
    pub visit_order: Option<i32>,
    pub memo: Option<&'a str>,
    pub place_type: Option<&'a str>,
    pub external_place_id: Option<&'a str>,
}

pub struct ItineraryItemRepo;

impl ItineraryItemRepo {
    pub async fn create(
        pool: &PgPool,
        itinerary_id: Uuid,
        item: NewItineraryItem<'_>,
    ) -> Result<ItineraryItemRow> {
        let row = sqlx::query_as::<_, ItineraryItemRow>(
            r#"INSERT INTO itinerary_item (itinerary_id, place_name, latitude, longitude, visit_date, visit_order, memo, place_type, external_place_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING item_id, itinerary_id, place_name, latitude, longitude, visit_date, visit_order, memo, place_type, external_place_id, created_at, updated_at"#,
        )
        .bind(itinerary_id)
        .bind(item.place_name)
        .bind(item.latitude)
        .bind(item.longitude)
        .bind(item.visit_date)
        .bind(item.visit_order)
        .bind(item.memo)
        .bind(item.place_type)
        .bind(item.external_place_id)
        .fetch_one(pool)
        .await
        .context("Failed to create itinerary item")?;
        Ok(row)
    }

    /// Items in display sequence; unordered items come last, oldest first.
    pub async fn list_for_itinerary(
        pool: &PgPool,
        itinerary_id: Uuid,
    ) -> Result<Vec<ItineraryItemRow>> {
        let rows = sqlx::query_as::<_, ItineraryItemRow>(
            r#"SELECT item_id, itinerary_id, place_name, latitude, longitude, visit_date, visit_order, memo, place_type, external_place_id, created_at, updated_at
               FROM itinerary_item WHERE itinerary_id = $1
               ORDER BY visit_order ASC NULLS LAST, created_at ASC"#,
        )
        .bind(itinerary_id)
        .fetch_all(pool)
        .await
        .context("Failed to list itinerary items")?;
        Ok(rows)
    }

    /// Full-field replace. Returns None if the item does not exist under
    /// this itinerary.
    pub async fn update(
        pool: &PgPool,
        item_id: Uuid,
        itinerary_id: Uuid,
        item: NewItineraryItem<'_>,
    ) -> Result<Option<ItineraryItemRow>> {
        let row = sqlx::query_as::<_, ItineraryItemRow>(
            r#"UPDATE itinerary_item SET
                   place_name = $3,
                   latitude = $4,
                   longitude = $5,
                   visit_date = $6,
                   visit_order = $7,
                   memo = $8,
                   place_type = $9,
                   external_place_id = $10,
                   updated_at = NOW()
               WHERE item_id = $1 AND itinerary_id = $2
               RETURNING item_id, itinerary_id, place_name, latitude, longitude, visit_date, visit_order, memo, place_type, external_place_id, created_at, updated_at"#,
        )
        .bind(item_id)
        .bind(itinerary_id)
        .bind(item.place_name)
        .bind(item.latitude)
        .bind(item.longitude)
        .bind(item.visit_date)
        .bind(item.visit_order)
        .bind(item.memo)
        .bind(item.place_type)
        .bind(item.external_place_id)
        .fetch_optional(pool)
        .await
        .context("Failed to update itinerary item")?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, item_id: Uuid, itinerary_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM itinerary_item WHERE item_id = $1 AND itinerary_id = $2")
                .bind(item_id)
                .bind(itinerary_id)
                .execute(pool)
                .await
                .context("Failed to delete itinerary item")?;
        Ok(result.rows_affected() > 0)
    }
}
