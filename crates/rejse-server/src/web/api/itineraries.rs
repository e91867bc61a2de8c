use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::CurrentUser;
use crate::web::api::{default_list_limit, resolve_owned_itinerary, validate_pagination};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rejse_db::{ItineraryRepo, ItineraryRow, NewItinerary};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub(crate) fn itinerary_json(row: &ItineraryRow) -> Value {
    json!({
        "itinerary_id": row.itinerary_id,
        "title": row.title,
        "description": row.description,
        "start_date": row.start_date,
        "end_date": row.end_date,
        "created_at": row.created_at,
        "updated_at": row.updated_at,
    })
}

#[derive(Debug, Deserialize)]
pub struct ListItinerariesQuery {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// GET /api/v1/itineraries — caller's trips, most recent start date first.
#[tracing::instrument(skip(state, user))]
pub async fn list_itineraries(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListItinerariesQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    validate_pagination(query.limit, query.offset)?;

    let rows =
        ItineraryRepo::list_by_user(&state.pool, user.user_id, query.limit, query.offset).await?;
    Ok(Json(rows.iter().map(itinerary_json).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateItineraryRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub(crate) fn validate_itinerary(req: &CreateItineraryRequest) -> Result<(), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::invalid_field("title", "title is required"));
    }
    if req.end_date < req.start_date {
        return Err(ApiError::invalid_field(
            "end_date",
            "end_date must not precede start_date",
        ));
    }
    Ok(())
}

/// POST /api/v1/itineraries
#[tracing::instrument(skip(state, user, req))]
pub async fn create_itinerary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateItineraryRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate_itinerary(&req)?;

    let row = ItineraryRepo::create(
        &state.pool,
        user.user_id,
        NewItinerary {
            title: req.title.trim(),
            description: req.description.as_deref(),
            start_date: req.start_date,
            end_date: req.end_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(itinerary_json(&row))))
}

/// GET /api/v1/itineraries/{id} — 404 unless the caller owns it.
#[tracing::instrument(skip(state, user))]
pub async fn get_itinerary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let row = resolve_owned_itinerary(&state.pool, id, &user).await?;
    Ok(Json(itinerary_json(&row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, start: &str, end: &str) -> CreateItineraryRequest {
        CreateItineraryRequest {
            title: title.to_string(),
            description: None,
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
        }
    }

    #[test]
    fn test_valid_date_range_accepted() {
        assert!(validate_itinerary(&request("Seoul Trip", "2024-05-01", "2024-05-05")).is_ok());
        // Single-day trips are fine
        assert!(validate_itinerary(&request("Day trip", "2024-05-01", "2024-05-01")).is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err =
            validate_itinerary(&request("Backwards", "2024-05-05", "2024-05-01")).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        match err {
            ApiError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("end_date"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_title_rejected() {
        let err = validate_itinerary(&request("   ", "2024-05-01", "2024-05-05")).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
