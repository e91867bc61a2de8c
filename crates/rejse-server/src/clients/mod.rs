pub mod exchange;
pub mod kakao;
pub mod tour;

use crate::error::ApiError;

pub use exchange::ExchangeClient;
pub use kakao::KakaoClient;
pub use tour::TourClient;

/// Failure modes shared by the third-party proxy clients
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No API key configured and no mock fallback for this endpoint
    #[error("API key not configured")]
    MissingKey,
    /// Non-2xx provider response, network failure or timeout
    #[error("upstream request failed: {0}")]
    Upstream(String),
    /// The provider answered but had nothing for this query
    #[error("no matching result")]
    NotFound,
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Upstream(err.to_string())
    }
}

// Upstream detail is logged, never surfaced; retrying is left to clients.
impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::MissingKey => ApiError::service_unavailable("API key not configured"),
            ProxyError::Upstream(detail) => {
                tracing::error!("Upstream API failure: {}", detail);
                ApiError::upstream("External service unavailable")
            }
            ProxyError::NotFound => ApiError::not_found("No matching result"),
        }
    }
}

/// Numeric fields in provider payloads often arrive as strings.
pub(crate) fn lenient_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_f64_accepts_strings_and_numbers() {
        assert_eq!(lenient_f64(&json!("126.9770")), 126.9770);
        assert_eq!(lenient_f64(&json!(37.5788)), 37.5788);
        assert_eq!(lenient_f64(&json!("")), 0.0);
        assert_eq!(lenient_f64(&json!(null)), 0.0);
    }

    #[test]
    fn test_proxy_error_maps_to_api_error() {
        let err: ApiError = ProxyError::MissingKey.into();
        assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");

        let err: ApiError = ProxyError::Upstream("kakao said 500".to_string()).into();
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
        assert!(!err.message().contains("kakao"), "detail must not leak");

        let err: ApiError = ProxyError::NotFound.into();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
