use crate::auth::{create_access_token, create_refresh_token, validate_token};
use crate::error::ApiError;
use crate::oauth::{self, OAuthError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use rejse_db::UserRepo;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SocialLoginRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

fn issue_token_pair(state: &AppState, user_id: Uuid) -> Result<TokenResponse, ApiError> {
    let auth = &state.config.auth;
    let access_token = create_access_token(
        user_id,
        &auth.jwt_secret,
        &auth.jwt_algorithm,
        auth.access_token_ttl_minutes,
    )?;
    let refresh_token = create_refresh_token(
        user_id,
        &auth.jwt_secret,
        &auth.jwt_algorithm,
        auth.refresh_token_ttl_days,
    )?;
    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer",
    })
}

/// POST /api/v1/auth/{provider} — exchange a social authorization code for
/// internal tokens, creating the local user on first login.
#[tracing::instrument(skip(state, req))]
pub async fn social_login(
    State(state): State<Arc<AppState>>,
    Path(provider_name): Path<String>,
    Json(req): Json<SocialLoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if req.code.trim().is_empty() {
        return Err(ApiError::invalid_field("code", "code is required"));
    }

    let provider = state
        .oauth_providers
        .get(&provider_name)
        .ok_or_else(|| {
            ApiError::not_found(format!("Unknown social provider: {}", provider_name))
        })?;

    let identity = oauth::exchange_code(provider, &req.code)
        .await
        .map_err(|e| match e {
            OAuthError::InvalidCode => ApiError::bad_request("Invalid authorization code"),
            OAuthError::IdToken(detail) => {
                tracing::warn!("ID token rejected for '{}': {}", provider_name, detail);
                ApiError::bad_request("Identity token could not be verified")
            }
            OAuthError::Upstream(detail) => {
                tracing::error!("Provider '{}' unreachable: {}", provider_name, detail);
                ApiError::upstream("Social provider unavailable")
            }
        })?;

    let user = oauth::provision_user(&state.pool, &provider_name, &identity).await?;

    Ok(Json(issue_token_pair(&state, user.user_id)?))
}

/// POST /api/v1/auth/refresh — trade a valid refresh token for a new pair.
#[tracing::instrument(skip(state, req))]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let auth = &state.config.auth;
    let claims = validate_token(&req.refresh_token, &auth.jwt_secret, &auth.jwt_algorithm)
        .map_err(|_| ApiError::invalid_token("Invalid or expired refresh token"))?;

    let user_id: Uuid = claims
        .sub
        .parse()
        .map_err(|_| ApiError::invalid_token("Malformed token subject"))?;

    let user = UserRepo::get_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::unknown_user("User no longer exists"))?;

    Ok(Json(issue_token_pair(&state, user.user_id)?))
}
