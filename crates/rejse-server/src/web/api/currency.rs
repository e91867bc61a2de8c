use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

fn default_base() -> String {
    "KRW".to_string()
}

fn validate_currency_code(field: &str, code: &str) -> Result<(), ApiError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::invalid_field(
            field,
            "must be a 3-letter currency code",
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    #[serde(default = "default_base")]
    pub base: String,
}

/// GET /api/v1/currency/rates — hourly-cached rates for a base currency.
#[tracing::instrument(skip(state))]
pub async fn get_rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatesQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_currency_code("base", &query.base)?;
    let rates = state.exchange.latest_rates(&query.base).await?;
    Ok(Json(rates))
}

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// GET /api/v1/currency/convert
#[tracing::instrument(skip(state))]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_currency_code("from", &query.from)?;
    validate_currency_code("to", &query.to)?;
    if !query.amount.is_finite() || query.amount < 0.0 {
        return Err(ApiError::invalid_field(
            "amount",
            "must be a non-negative number",
        ));
    }

    let result = state
        .exchange
        .convert(&query.from, &query.to, query.amount)
        .await?;
    Ok(Json(result))
}

/// GET /api/v1/currency/supported — static list
pub async fn supported() -> Json<Value> {
    Json(json!({
        "currencies": [
            {"code": "KRW", "name": "Korean Won", "symbol": "₩"},
            {"code": "USD", "name": "US Dollar", "symbol": "$"},
            {"code": "EUR", "name": "Euro", "symbol": "€"},
            {"code": "JPY", "name": "Japanese Yen", "symbol": "¥"},
            {"code": "CNY", "name": "Chinese Yuan", "symbol": "¥"},
            {"code": "GBP", "name": "British Pound", "symbol": "£"},
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_validation() {
        assert!(validate_currency_code("base", "KRW").is_ok());
        assert!(validate_currency_code("base", "usd").is_ok());
        assert!(validate_currency_code("base", "KR").is_err());
        assert!(validate_currency_code("base", "WONS").is_err());
        assert!(validate_currency_code("base", "K1W").is_err());
    }
}
