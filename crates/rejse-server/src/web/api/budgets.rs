use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::CurrentUser;
use crate::web::api::resolve_owned_itinerary;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rejse_db::{BudgetRepo, BudgetRow, NewBudget};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

fn budget_json(row: &BudgetRow) -> Value {
    json!({
        "budget_id": row.budget_id,
        "itinerary_id": row.itinerary_id,
        "category": row.category,
        "amount": row.amount,
        "currency": row.currency,
        "spent_at": row.spent_at,
        "description": row.description,
        "created_at": row.created_at,
        "updated_at": row.updated_at,
    })
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub category: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub spent_at: DateTime<Utc>,
    pub description: Option<String>,
}

pub(crate) fn validate_budget(req: &BudgetRequest) -> Result<(), ApiError> {
    if req.category.trim().is_empty() {
        return Err(ApiError::invalid_field("category", "category is required"));
    }
    if !req.amount.is_finite() {
        return Err(ApiError::invalid_field("amount", "must be a finite number"));
    }
    if req.currency.len() != 3 || !req.currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::invalid_field(
            "currency",
            "must be a 3-letter currency code",
        ));
    }
    Ok(())
}

/// GET /api/v1/itineraries/{id}/budgets
#[tracing::instrument(skip(state, user))]
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(itinerary_id): Path<Uuid>,
) -> Result<Json<Vec<Value>>, ApiError> {
    resolve_owned_itinerary(&state.pool, itinerary_id, &user).await?;

    let rows = BudgetRepo::list_for_itinerary(&state.pool, itinerary_id).await?;
    Ok(Json(rows.iter().map(budget_json).collect()))
}

/// POST /api/v1/itineraries/{id}/budgets
#[tracing::instrument(skip(state, user, req))]
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(itinerary_id): Path<Uuid>,
    Json(req): Json<BudgetRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    resolve_owned_itinerary(&state.pool, itinerary_id, &user).await?;
    validate_budget(&req)?;

    let row = BudgetRepo::create(
        &state.pool,
        itinerary_id,
        NewBudget {
            category: req.category.trim(),
            amount: req.amount,
            currency: &req.currency.to_uppercase(),
            spent_at: req.spent_at,
            description: req.description.as_deref(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(budget_json(&row))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(category: &str, amount: f64, currency: &str) -> BudgetRequest {
        BudgetRequest {
            category: category.to_string(),
            amount,
            currency: currency.to_string(),
            spent_at: Utc::now(),
            description: None,
        }
    }

    #[test]
    fn test_valid_budget_accepted() {
        assert!(validate_budget(&request("food", 15000.0, "KRW")).is_ok());
    }

    #[test]
    fn test_blank_category_rejected() {
        assert!(validate_budget(&request(" ", 10.0, "USD")).is_err());
    }

    #[test]
    fn test_bad_currency_code_rejected() {
        assert!(validate_budget(&request("food", 10.0, "US")).is_err());
        assert!(validate_budget(&request("food", 10.0, "KRWX")).is_err());
        assert!(validate_budget(&request("food", 10.0, "12A")).is_err());
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        assert!(validate_budget(&request("food", f64::NAN, "USD")).is_err());
        assert!(validate_budget(&request("food", f64::INFINITY, "USD")).is_err());
    }
}
