use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with a machine-readable code and a client-safe message.
///
/// Clients branch on `code`, not on message text; in particular a rejected
/// token (`TOKEN_INVALID`) and a token whose subject no longer exists
/// (`USER_NOT_FOUND`) both map to 401 and are told apart by code only.
#[derive(Debug)]
pub enum ApiError {
    // 400
    BadRequest(String),
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },
    // 401
    InvalidToken(String),
    UnknownUser(String),
    // 404
    NotFound(String),
    // 502
    Upstream(String),
    // 503
    ServiceUnavailable(String),
    // 500
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(
        message: impl Into<String>,
        field_errors: HashMap<String, String>,
    ) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors,
        }
    }

    /// Single-field validation error.
    pub fn invalid_field(field: &str, detail: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), detail.into());
        ApiError::Validation {
            message: "Invalid input".to_string(),
            field_errors,
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        ApiError::InvalidToken(message.into())
    }

    pub fn unknown_user(message: impl Into<String>) -> Self {
        ApiError::UnknownUser(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidToken(_) | ApiError::UnknownUser(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::InvalidToken(_) => "TOKEN_INVALID",
            ApiError::UnknownUser(_) => "USER_NOT_FOUND",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::InvalidToken(msg)
            | ApiError::UnknownUser(msg)
            | ApiError::NotFound(msg)
            | ApiError::Upstream(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg,
            ApiError::Validation { message, .. } => message,
        }
    }

    fn to_json(&self) -> Value {
        let mut body = json!({
            "error": true,
            "code": self.error_code(),
            "message": self.message(),
        });
        if let ApiError::Validation { field_errors, .. } = self {
            body["field_errors"] = json!(field_errors);
        }
        body
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Repository failures carry internal detail (SQL, connection strings);
// log them and hand the client a generic message.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:#}", err);
        ApiError::internal("An internal error occurred")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_token("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::unknown_user("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::upstream("x").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::service_unavailable("x").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_distinguished_by_code_not_status() {
        let bad_token = ApiError::invalid_token("no good");
        let gone_user = ApiError::unknown_user("no such user");
        assert_eq!(bad_token.status_code(), gone_user.status_code());
        assert_ne!(bad_token.error_code(), gone_user.error_code());
    }

    #[test]
    fn test_validation_body_includes_field_errors() {
        let err = ApiError::invalid_field("end_date", "must not precede start_date");
        let body = err.to_json();
        assert_eq!(body["error"], json!(true));
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
        assert_eq!(
            body["field_errors"]["end_date"],
            json!("must not precede start_date")
        );
    }

    #[test]
    fn test_plain_error_body_has_no_field_errors() {
        let body = ApiError::not_found("Itinerary not found").to_json();
        assert!(body.get("field_errors").is_none());
        assert_eq!(body["message"], json!("Itinerary not found"));
    }

    #[test]
    fn test_anyhow_conversion_is_generic() {
        let err: ApiError = anyhow::anyhow!("connection refused to db at 10.0.0.3").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(!err.message().contains("10.0.0.3"));
    }
}
