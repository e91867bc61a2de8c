use crate::clients::{ExchangeClient, KakaoClient, TourClient};
use crate::config::ServerConfig;
use crate::oauth::OAuthProvider;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub oauth_providers: Arc<HashMap<String, OAuthProvider>>,
    pub kakao: Arc<KakaoClient>,
    pub tour: Arc<TourClient>,
    pub exchange: Arc<ExchangeClient>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: ServerConfig,
        oauth_providers: HashMap<String, OAuthProvider>,
    ) -> Self {
        let kakao = KakaoClient::new(config.external.kakao_rest_api_key.clone());
        let tour = TourClient::new(
            &config.external.tour_base_url,
            config.external.tour_api_key.clone(),
        );
        let exchange = ExchangeClient::new(
            &config.external.exchange_rate_base_url,
            config.external.exchange_rate_api_key.clone(),
        );
        Self {
            pool,
            config: Arc::new(config),
            oauth_providers: Arc::new(oauth_providers),
            kakao: Arc::new(kakao),
            tour: Arc::new(tour),
            exchange: Arc::new(exchange),
        }
    }
}
