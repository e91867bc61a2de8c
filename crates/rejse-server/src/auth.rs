use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

fn parse_algorithm(name: &str) -> Result<Algorithm> {
    Algorithm::from_str(name).with_context(|| format!("Unsupported JWT algorithm: {}", name))
}

fn create_token(user_id: Uuid, secret: &str, algorithm: &str, ttl_secs: i64) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };
    jsonwebtoken::encode(
        &Header::new(parse_algorithm(algorithm)?),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign token")
}

/// Create a short-lived access token (minutes-scale)
pub fn create_access_token(
    user_id: Uuid,
    secret: &str,
    algorithm: &str,
    ttl_minutes: i64,
) -> Result<String> {
    create_token(user_id, secret, algorithm, ttl_minutes * 60)
}

/// Create a long-lived refresh token (day-scale)
pub fn create_refresh_token(
    user_id: Uuid,
    secret: &str,
    algorithm: &str,
    ttl_days: i64,
) -> Result<String> {
    create_token(user_id, secret, algorithm, ttl_days * 24 * 3600)
}

/// Verify signature and expiry, returning the claims
pub fn validate_token(token: &str, secret: &str, algorithm: &str) -> Result<Claims> {
    let validation = Validation::new(parse_algorithm(algorithm)?);
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .context("Invalid or expired token")?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret";
    const ALG: &str = "HS256";

    #[test]
    fn test_access_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, SECRET, ALG, 60).unwrap();
        let claims = validate_token(&token, SECRET, ALG).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_longer_lived_than_access() {
        let user_id = Uuid::new_v4();
        let access = create_access_token(user_id, SECRET, ALG, 60).unwrap();
        let refresh = create_refresh_token(user_id, SECRET, ALG, 7).unwrap();
        let access_claims = validate_token(&access, SECRET, ALG).unwrap();
        let refresh_claims = validate_token(&refresh, SECRET, ALG).unwrap();
        assert!(refresh_claims.exp > access_claims.exp);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = create_access_token(Uuid::new_v4(), "secret-1", ALG, 60).unwrap();
        assert!(validate_token(&token, "secret-2", ALG).is_err());
    }

    #[test]
    fn test_expired_token_fails() {
        // Negative TTL puts exp in the past (beyond the default leeway)
        let token = create_access_token(Uuid::new_v4(), SECRET, ALG, -5).unwrap();
        assert!(validate_token(&token, SECRET, ALG).is_err());
    }

    #[test]
    fn test_garbage_token_fails() {
        assert!(validate_token("not.a.jwt", SECRET, ALG).is_err());
    }

    #[test]
    fn test_unsupported_algorithm_rejected() {
        let result = create_access_token(Uuid::new_v4(), SECRET, "XS512", 60);
        assert!(result.is_err());
    }

    #[test]
    fn test_algorithm_mismatch_fails() {
        let token = create_access_token(Uuid::new_v4(), SECRET, "HS256", 60).unwrap();
        assert!(validate_token(&token, SECRET, "HS384").is_err());
    }
}
