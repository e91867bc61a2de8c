use anyhow::{Context, Result};
use openidconnect::core::{CoreClient, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, IssuerUrl, Nonce, RedirectUrl, RequestTokenError,
    TokenResponse,
};
use rejse_db::{NewUser, UserRepo, UserRow};
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::ProviderConfig;

const PROVIDER_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Defaults applied to users created on first login
const DEFAULT_LANGUAGE_CODE: &str = "en";
const DEFAULT_CURRENCY_CODE: &str = "USD";

/// Initialized social login provider ready for code exchange
pub struct OAuthProvider {
    pub metadata: CoreProviderMetadata,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub redirect_url: RedirectUrl,
}

/// Identity claims taken from a verified ID token
#[derive(Debug, Clone)]
pub struct SocialIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// The provider rejected the authorization code
    #[error("invalid authorization code")]
    InvalidCode,
    /// The exchange succeeded but the ID token could not be trusted
    #[error("identity token rejected: {0}")]
    IdToken(String),
    /// The provider could not be reached (network failure, timeout)
    #[error("provider request failed: {0}")]
    Upstream(String),
}

fn provider_http_client() -> Result<openidconnect::reqwest::Client> {
    openidconnect::reqwest::ClientBuilder::new()
        .redirect(openidconnect::reqwest::redirect::Policy::none())
        .timeout(PROVIDER_HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client for OIDC")
}

/// Initialize social providers from config (performs discovery for each)
#[tracing::instrument(skip(providers))]
pub async fn init_providers(
    providers: &HashMap<String, ProviderConfig>,
) -> Result<HashMap<String, OAuthProvider>> {
    let http_client = provider_http_client()?;

    let mut result = HashMap::new();

    for (name, config) in providers {
        tracing::info!(
            "Discovering OIDC provider '{}' at {}",
            name,
            config.issuer_url
        );

        let issuer = IssuerUrl::new(config.issuer_url.clone())
            .with_context(|| format!("Invalid issuer URL for provider '{}'", name))?;

        let metadata = CoreProviderMetadata::discover_async(issuer, &http_client)
            .await
            .with_context(|| format!("OIDC discovery failed for provider '{}'", name))?;

        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .with_context(|| format!("Invalid redirect URI for provider '{}'", name))?;

        tracing::info!("OIDC provider '{}' initialized successfully", name);

        result.insert(
            name.clone(),
            OAuthProvider {
                metadata,
                client_id: ClientId::new(config.client_id.clone()),
                client_secret: ClientSecret::new(config.client_secret.clone()),
                redirect_url,
            },
        );
    }

    Ok(result)
}

/// The authorization code is obtained by the client app, so no server-side
/// nonce exists to compare against. Signature, issuer and audience are
/// still verified by the ID token verifier.
fn accept_absent_nonce(_nonce: Option<&Nonce>) -> Result<(), String> {
    Ok(())
}

/// Exchange an authorization code for verified identity claims.
#[tracing::instrument(skip(provider, code))]
pub async fn exchange_code(
    provider: &OAuthProvider,
    code: &str,
) -> Result<SocialIdentity, OAuthError> {
    let client = CoreClient::from_provider_metadata(
        provider.metadata.clone(),
        provider.client_id.clone(),
        Some(provider.client_secret.clone()),
    )
    .set_redirect_uri(provider.redirect_url.clone());

    let http_client =
        provider_http_client().map_err(|e| OAuthError::Upstream(format!("{:#}", e)))?;

    let token_response = client
        .exchange_code(AuthorizationCode::new(code.to_string()))
        .map_err(|e| OAuthError::Upstream(format!("token endpoint not available: {}", e)))?
        .request_async(&http_client)
        .await
        .map_err(|e| match e {
            RequestTokenError::ServerResponse(_) => OAuthError::InvalidCode,
            RequestTokenError::Request(e) => OAuthError::Upstream(e.to_string()),
            other => OAuthError::Upstream(other.to_string()),
        })?;

    let id_token = token_response
        .id_token()
        .ok_or_else(|| OAuthError::IdToken("no ID token in response".to_string()))?;

    // Signature, issuer and audience checks happen here
    let id_token_verifier = client.id_token_verifier();
    let claims = id_token
        .claims(&id_token_verifier, accept_absent_nonce)
        .map_err(|e| OAuthError::IdToken(e.to_string()))?;

    Ok(SocialIdentity {
        subject: claims.subject().as_str().to_string(),
        email: claims.email().map(|e| e.as_str().to_string()),
        display_name: claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.as_str().to_string()),
        avatar_url: claims
            .picture()
            .and_then(|p| p.get(None))
            .map(|p| p.as_str().to_string()),
    })
}

/// Find-or-create the local user for a verified social identity.
///
/// Identity is anchored by the (provider, subject) pair; first-time users
/// get the profile claims plus language/currency defaults.
#[tracing::instrument(skip(pool, identity))]
pub async fn provision_user(
    pool: &PgPool,
    provider_name: &str,
    identity: &SocialIdentity,
) -> Result<UserRow> {
    if let Some(user) = UserRepo::get_by_social(pool, provider_name, &identity.subject).await? {
        return Ok(user);
    }

    let user = UserRepo::create(
        pool,
        NewUser {
            social_provider: provider_name,
            social_id: &identity.subject,
            email: identity.email.as_deref(),
            display_name: identity.display_name.as_deref(),
            language_code: DEFAULT_LANGUAGE_CODE,
            currency_code: DEFAULT_CURRENCY_CODE,
            avatar_url: identity.avatar_url.as_deref(),
        },
    )
    .await?;

    tracing::info!(
        "Created new user {} via provider {}",
        user.user_id,
        provider_name
    );

    Ok(user)
}
