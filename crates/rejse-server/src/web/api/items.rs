use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::CurrentUser;
use crate::web::api::resolve_owned_itinerary;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rejse_db::{ItineraryItemRepo, ItineraryItemRow, NewItineraryItem};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

fn item_json(row: &ItineraryItemRow) -> Value {
    json!({
        "item_id": row.item_id,
        "itinerary_id": row.itinerary_id,
        "place_name": row.place_name,
        "latitude": row.latitude,
        "longitude": row.longitude,
        "visit_date": row.visit_date,
        "visit_order": row.visit_order,
        "memo": row.memo,
        "place_type": row.place_type,
        "external_place_id": row.external_place_id,
        "created_at": row.created_at,
        "updated_at": row.updated_at,
    })
}

/// Create and full-replace share this payload: PUT replaces every field
/// with what is provided here, clearing the omitted ones.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visit_date: Option<NaiveDate>,
    pub visit_order: Option<i32>,
    pub memo: Option<String>,
    pub place_type: Option<String>,
    pub external_place_id: Option<String>,
}

pub(crate) fn validate_item(req: &ItemRequest) -> Result<(), ApiError> {
    if req.place_name.trim().is_empty() {
        return Err(ApiError::invalid_field("place_name", "place_name is required"));
    }
    if !(-90.0..=90.0).contains(&req.latitude) {
        return Err(ApiError::invalid_field(
            "latitude",
            "must be between -90 and 90",
        ));
    }
    if !(-180.0..=180.0).contains(&req.longitude) {
        return Err(ApiError::invalid_field(
            "longitude",
            "must be between -180 and 180",
        ));
    }
    Ok(())
}

impl ItemRequest {
    fn as_new_item(&self) -> NewItineraryItem<'_> {
        NewItineraryItem {
            place_name: self.place_name.trim(),
            latitude: self.latitude,
            longitude: self.longitude,
            visit_date: self.visit_date,
            visit_order: self.visit_order,
            memo: self.memo.as_deref(),
            place_type: self.place_type.as_deref(),
            external_place_id: self.external_place_id.as_deref(),
        }
    }
}

/// GET /api/v1/itineraries/{id}/items
#[tracing::instrument(skip(state, user))]
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(itinerary_id): Path<Uuid>,
) -> Result<Json<Vec<Value>>, ApiError> {
    resolve_owned_itinerary(&state.pool, itinerary_id, &user).await?;

    let rows = ItineraryItemRepo::list_for_itinerary(&state.pool, itinerary_id).await?;
    Ok(Json(rows.iter().map(item_json).collect()))
}

/// POST /api/v1/itineraries/{id}/items
#[tracing::instrument(skip(state, user, req))]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(itinerary_id): Path<Uuid>,
    Json(req): Json<ItemRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    resolve_owned_itinerary(&state.pool, itinerary_id, &user).await?;
    validate_item(&req)?;

    let row = ItineraryItemRepo::create(&state.pool, itinerary_id, req.as_new_item()).await?;
    Ok((StatusCode::CREATED, Json(item_json(&row))))
}

/// PUT /api/v1/itineraries/{id}/items/{item_id} — full-field replace.
#[tracing::instrument(skip(state, user, req))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((itinerary_id, item_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<Value>, ApiError> {
    resolve_owned_itinerary(&state.pool, itinerary_id, &user).await?;
    validate_item(&req)?;

    let row = ItineraryItemRepo::update(&state.pool, item_id, itinerary_id, req.as_new_item())
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    Ok(Json(item_json(&row)))
}

/// DELETE /api/v1/itineraries/{id}/items/{item_id} — hard delete.
#[tracing::instrument(skip(state, user))]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((itinerary_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    resolve_owned_itinerary(&state.pool, itinerary_id, &user).await?;

    let deleted = ItineraryItemRepo::delete(&state.pool, item_id, itinerary_id).await?;
    if !deleted {
        return Err(ApiError::not_found("Item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(place_name: &str, latitude: f64, longitude: f64) -> ItemRequest {
        ItemRequest {
            place_name: place_name.to_string(),
            latitude,
            longitude,
            visit_date: None,
            visit_order: None,
            memo: None,
            place_type: None,
            external_place_id: None,
        }
    }

    #[test]
    fn test_valid_item_accepted() {
        assert!(validate_item(&request("Gyeongbokgung", 37.5788, 126.9770)).is_ok());
        // Range edges are valid
        assert!(validate_item(&request("South Pole", -90.0, 180.0)).is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let err = validate_item(&request("Nowhere", 95.0, 126.9)).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err = validate_item(&request("Nowhere", 37.5, -181.0)).unwrap_err();
        match err {
            ApiError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("longitude"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_place_name_rejected() {
        assert!(validate_item(&request("", 37.5, 126.9)).is_err());
    }
}
