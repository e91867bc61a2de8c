use crate::clients::ProxyError;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

fn default_search_radius() -> u32 {
    10_000
}

fn default_search_rows() -> u32 {
    10
}

fn default_popular_rows() -> u32 {
    20
}

fn default_content_type() -> String {
    // 12 = tourist attraction
    "12".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TourSearchQuery {
    pub keyword: String,
    pub map_x: f64,
    pub map_y: f64,
    #[serde(default = "default_search_radius")]
    pub radius: u32,
    #[serde(default = "default_search_rows")]
    pub rows: u32,
    pub content_type_id: Option<String>,
}

/// GET /api/v1/tour/search — keyword search around a coordinate
#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TourSearchQuery>,
) -> Result<Json<Value>, ApiError> {
    if q.keyword.trim().is_empty() {
        return Err(ApiError::invalid_field("keyword", "keyword is required"));
    }
    let result = state
        .tour
        .search(
            &q.keyword,
            q.map_x,
            q.map_y,
            q.radius,
            q.rows,
            q.content_type_id.as_deref(),
        )
        .await?;
    Ok(Json(result))
}

/// GET /api/v1/tour/detail/{content_id}
#[tracing::instrument(skip(state))]
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let result = state.tour.detail(&content_id).await.map_err(|e| match e {
        ProxyError::NotFound => ApiError::not_found("Tourist spot not found"),
        other => other.into(),
    })?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub area_code: Option<String>,
    #[serde(default = "default_content_type")]
    pub content_type_id: String,
    #[serde(default = "default_popular_rows")]
    pub rows: u32,
}

/// GET /api/v1/tour/popular — popularity-ordered spots
#[tracing::instrument(skip(state))]
pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PopularQuery>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .tour
        .popular(q.area_code.as_deref(), &q.content_type_id, q.rows)
        .await?;
    Ok(Json(result))
}
