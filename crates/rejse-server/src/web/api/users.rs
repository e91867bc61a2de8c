use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::CurrentUser;
use axum::{extract::State, http::StatusCode, Json};
use rejse_db::{UserProfileUpdate, UserRepo, UserRow};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

fn user_json(user: &UserRow) -> Value {
    json!({
        "user_id": user.user_id,
        "social_provider": user.social_provider,
        "email": user.email,
        "display_name": user.display_name,
        "language_code": user.language_code,
        "currency_code": user.currency_code,
        "avatar_url": user.avatar_url,
        "created_at": user.created_at,
        "updated_at": user.updated_at,
    })
}

/// GET /api/v1/users/me
#[tracing::instrument(skip(user))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(user_json(&user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub language_code: Option<String>,
    pub currency_code: Option<String>,
    pub avatar_url: Option<String>,
}

/// PUT /api/v1/users/me — partial profile update; absent fields unchanged.
#[tracing::instrument(skip(state, user, req))]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateMeRequest>,
) -> Result<Json<Value>, ApiError> {
    if let Some(currency) = &req.currency_code {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ApiError::invalid_field(
                "currency_code",
                "must be a 3-letter currency code",
            ));
        }
    }
    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(ApiError::invalid_field("email", "invalid email address"));
        }
    }

    let updated = UserRepo::update_profile(
        &state.pool,
        user.user_id,
        UserProfileUpdate {
            email: req.email,
            display_name: req.display_name,
            language_code: req.language_code,
            currency_code: req.currency_code.map(|c| c.to_uppercase()),
            avatar_url: req.avatar_url,
        },
    )
    .await?
    .ok_or_else(|| ApiError::unknown_user("User no longer exists"))?;

    Ok(Json(user_json(&updated)))
}

/// DELETE /api/v1/users/me — remove the account; itineraries, items and
/// budgets go with it through the store's cascade.
#[tracing::instrument(skip(state, user))]
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    UserRepo::delete(&state.pool, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
