use serde_json::{json, Value};
use std::time::Duration;

use super::ProxyError;
use crate::cache::TtlCache;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cached rate payloads go stale after an hour
pub const RATES_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Currencies reported by the rates endpoint
const TRACKED_CURRENCIES: [&str; 6] = ["USD", "EUR", "JPY", "CNY", "GBP", "KRW"];

/// Client for ExchangeRate-API with a per-base-currency response cache.
/// Docs: https://www.exchangerate-api.com/docs/overview
pub struct ExchangeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cache: TtlCache<Value>,
}

impl ExchangeClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            cache: TtlCache::new(),
        }
    }

    /// Current rates for `base`. Real provider responses are cached for
    /// [`RATES_CACHE_TTL`] per base currency; mock payloads are not cached.
    #[tracing::instrument(skip(self))]
    pub async fn latest_rates(&self, base: &str) -> Result<Value, ProxyError> {
        let base = base.to_uppercase();

        if let Some(cached) = self.cache.get(&base).await {
            return Ok(cached);
        }

        let api_key = match &self.api_key {
            Some(key) => key,
            None => return Ok(mock_rates(&base)),
        };

        let url = format!("{}/{}/latest/{}", self.base_url, api_key, base);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProxyError::Upstream(format!(
                "ExchangeRate-API returned {}",
                response.status()
            )));
        }
        let payload: Value = response.json().await?;

        let mut rates = serde_json::Map::new();
        for code in TRACKED_CURRENCIES {
            rates.insert(
                code.to_string(),
                json!(super::lenient_f64(&payload["conversion_rates"][code])),
            );
        }

        let result = json!({
            "base": base,
            "updated_at": payload["time_last_update_utc"],
            "rates": rates,
            "mock": false,
        });

        self.cache.put(&base, result.clone(), RATES_CACHE_TTL).await;

        Ok(result)
    }

    /// Convert `amount` between two currencies via the provider's pair endpoint.
    #[tracing::instrument(skip(self))]
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Value, ProxyError> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        let api_key = match &self.api_key {
            Some(key) => key,
            None => return Ok(mock_convert(&from, &to, amount)),
        };

        let url = format!(
            "{}/{}/pair/{}/{}/{}",
            self.base_url, api_key, from, to, amount
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProxyError::Upstream(format!(
                "ExchangeRate-API returned {}",
                response.status()
            )));
        }
        let payload: Value = response.json().await?;

        Ok(json!({
            "from": from,
            "to": to,
            "amount": amount,
            "converted_amount": round2(super::lenient_f64(&payload["conversion_result"])),
            "rate": super::lenient_f64(&payload["conversion_rate"]),
            "mock": false,
        }))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Static development rates served when no API key is configured
fn mock_rates(base: &str) -> Value {
    let krw = base == "KRW";
    json!({
        "base": base,
        "updated_at": chrono::Utc::now().to_rfc3339(),
        "rates": {
            "USD": if krw { 0.00075 } else { 1330.0 },
            "EUR": if krw { 0.00069 } else { 1450.0 },
            "JPY": if krw { 0.11 } else { 9.1 },
            "CNY": if krw { 0.0054 } else { 185.0 },
            "GBP": if krw { 0.00059 } else { 1690.0 },
        },
        "mock": true,
    })
}

fn mock_convert(from: &str, to: &str, amount: f64) -> Value {
    let rate = match (from, to) {
        ("KRW", "USD") => 0.00075,
        ("USD", "KRW") => 1330.0,
        ("KRW", "EUR") => 0.00069,
        ("EUR", "KRW") => 1450.0,
        ("KRW", "JPY") => 0.11,
        ("JPY", "KRW") => 9.1,
        _ => 1.0,
    };
    json!({
        "from": from,
        "to": to,
        "amount": amount,
        "converted_amount": round2(amount * rate),
        "rate": rate,
        "mock": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyless_client() -> ExchangeClient {
        ExchangeClient::new("https://v6.exchangerate-api.com/v6", None)
    }

    #[tokio::test]
    async fn test_rates_without_key_are_flagged_mock() {
        let client = keyless_client();
        let rates = client.latest_rates("KRW").await.unwrap();
        assert_eq!(rates["mock"], serde_json::json!(true));
        assert_eq!(rates["base"], serde_json::json!("KRW"));
        assert_eq!(rates["rates"]["USD"], serde_json::json!(0.00075));
    }

    #[tokio::test]
    async fn test_rates_base_is_normalized_to_uppercase() {
        let client = keyless_client();
        let rates = client.latest_rates("usd").await.unwrap();
        assert_eq!(rates["base"], serde_json::json!("USD"));
        // Non-KRW base gets the inverse mock table
        assert_eq!(rates["rates"]["USD"], serde_json::json!(1330.0));
    }

    #[tokio::test]
    async fn test_convert_without_key_uses_mock_table() {
        let client = keyless_client();
        let result = client.convert("KRW", "USD", 10000.0).await.unwrap();
        assert_eq!(result["mock"], serde_json::json!(true));
        assert_eq!(result["rate"], serde_json::json!(0.00075));
        assert_eq!(result["converted_amount"], serde_json::json!(7.5));
    }

    #[tokio::test]
    async fn test_convert_unknown_pair_falls_back_to_identity() {
        let client = keyless_client();
        let result = client.convert("CHF", "NOK", 42.0).await.unwrap();
        assert_eq!(result["rate"], serde_json::json!(1.0));
        assert_eq!(result["converted_amount"], serde_json::json!(42.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(7.499999), 7.5);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(1330.0), 1330.0);
    }
}
