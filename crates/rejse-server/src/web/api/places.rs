use crate::state::AppState;
use crate::error::ApiError;
use crate::clients::ProxyError;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

fn default_keyword_radius() -> u32 {
    20_000
}

fn default_category_radius() -> u32 {
    5_000
}

fn default_page() -> u32 {
    1
}

fn default_keyword_size() -> u32 {
    15
}

fn default_address_size() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct KeywordQuery {
    pub query: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(default = "default_keyword_radius")]
    pub radius: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_keyword_size")]
    pub size: u32,
}

/// GET /api/v1/places/keyword — Kakao keyword place search
#[tracing::instrument(skip(state))]
pub async fn search_keyword(
    State(state): State<Arc<AppState>>,
    Query(q): Query<KeywordQuery>,
) -> Result<Json<Value>, ApiError> {
    if q.query.trim().is_empty() {
        return Err(ApiError::invalid_field("query", "query is required"));
    }
    let result = state
        .kakao
        .search_keyword(&q.query, q.x, q.y, q.radius, q.page, q.size)
        .await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_address_size")]
    pub size: u32,
}

/// GET /api/v1/places/address — Kakao address search
#[tracing::instrument(skip(state))]
pub async fn search_address(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AddressQuery>,
) -> Result<Json<Value>, ApiError> {
    if q.query.trim().is_empty() {
        return Err(ApiError::invalid_field("query", "query is required"));
    }
    let result = state.kakao.search_address(&q.query, q.page, q.size).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct CoordQuery {
    pub x: f64,
    pub y: f64,
}

/// GET /api/v1/places/coord — coordinate to address
#[tracing::instrument(skip(state))]
pub async fn coord_to_address(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CoordQuery>,
) -> Result<Json<Value>, ApiError> {
    if !(-180.0..=180.0).contains(&q.x) || !(-90.0..=90.0).contains(&q.y) {
        return Err(ApiError::invalid_field("x", "coordinates out of range"));
    }
    let result = state
        .kakao
        .coord_to_address(q.x, q.y)
        .await
        .map_err(|e| match e {
            ProxyError::NotFound => ApiError::not_found("Address not found for coordinates"),
            other => other.into(),
        })?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category_code: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_category_radius")]
    pub radius: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_keyword_size")]
    pub size: u32,
}

/// GET /api/v1/places/category — category search around a coordinate
#[tracing::instrument(skip(state))]
pub async fn search_category(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CategoryQuery>,
) -> Result<Json<Value>, ApiError> {
    if q.category_code.trim().is_empty() {
        return Err(ApiError::invalid_field(
            "category_code",
            "category_code is required",
        ));
    }
    let result = state
        .kakao
        .search_category(&q.category_code, q.x, q.y, q.radius, q.page, q.size)
        .await?;
    Ok(Json(result))
}
