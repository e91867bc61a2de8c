use crate::auth::validate_token;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use rejse_db::{UserRepo, UserRow};
use std::sync::Arc;
use uuid::Uuid;

/// Extractor resolving the authenticated caller from a Bearer token.
///
/// Rejections stay in the 401 class but carry distinct codes: a token that
/// fails verification is `TOKEN_INVALID`, a valid token whose subject has
/// been deleted is `USER_NOT_FOUND`.
#[derive(Debug)]
pub struct CurrentUser(pub UserRow);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::invalid_token("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::invalid_token("Invalid authorization header format"))?;

        let auth = &state.config.auth;
        let claims = validate_token(token, &auth.jwt_secret, &auth.jwt_algorithm)
            .map_err(|_| ApiError::invalid_token("Invalid or expired token"))?;

        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| ApiError::invalid_token("Malformed token subject"))?;

        let user = UserRepo::get_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| ApiError::unknown_user("User no longer exists"))?;

        Ok(CurrentUser(user))
    }
}
