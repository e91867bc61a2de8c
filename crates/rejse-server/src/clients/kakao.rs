use serde_json::{json, Value};
use std::time::Duration;

use super::{lenient_f64, ProxyError};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const BASE_URL: &str = "https://dapi.kakao.com/v2/local";

/// Provider-imposed caps
const MAX_RADIUS_M: u32 = 20_000;
const MAX_KEYWORD_SIZE: u32 = 15;
const MAX_ADDRESS_SIZE: u32 = 30;

/// Client for the Kakao Local REST API.
/// Docs: https://developers.kakao.com/docs/latest/en/local/dev-guide
pub struct KakaoClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl KakaoClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("reqwest client"),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, ProxyError> {
        self.api_key.as_deref().ok_or(ProxyError::MissingKey)
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ProxyError> {
        let key = self.api_key()?;
        let response = self
            .http
            .get(format!("{}{}", BASE_URL, path))
            .header("Authorization", format!("KakaoAK {}", key))
            .query(params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProxyError::Upstream(format!(
                "Kakao API returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// Keyword place search, optionally distance-sorted around a coordinate.
    #[tracing::instrument(skip(self))]
    pub async fn search_keyword(
        &self,
        query: &str,
        x: Option<f64>,
        y: Option<f64>,
        radius: u32,
        page: u32,
        size: u32,
    ) -> Result<Value, ProxyError> {
        let mut params = vec![
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("size", size.min(MAX_KEYWORD_SIZE).to_string()),
        ];
        if let (Some(x), Some(y)) = (x, y) {
            params.push(("x", x.to_string()));
            params.push(("y", y.to_string()));
            params.push(("radius", radius.min(MAX_RADIUS_M).to_string()));
        }

        let data = self.get("/search/keyword.json", &params).await?;
        Ok(json!({
            "total": data["meta"]["total_count"],
            "is_end": data["meta"]["is_end"],
            "results": map_places(&data),
        }))
    }

    /// Address search.
    #[tracing::instrument(skip(self))]
    pub async fn search_address(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Value, ProxyError> {
        let params = vec![
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("size", size.min(MAX_ADDRESS_SIZE).to_string()),
        ];

        let data = self.get("/search/address.json", &params).await?;
        let results: Vec<Value> = data["documents"]
            .as_array()
            .map(|docs| {
                docs.iter()
                    .map(|doc| {
                        json!({
                            "address": doc["address_name"],
                            "road_address": doc["road_address"]["address_name"].as_str().unwrap_or(""),
                            "longitude": doc["x"].as_str().and_then(|s| s.parse::<f64>().ok()),
                            "latitude": doc["y"].as_str().and_then(|s| s.parse::<f64>().ok()),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(json!({
            "total": data["meta"]["total_count"],
            "results": results,
        }))
    }

    /// Reverse geocoding: coordinate to address.
    #[tracing::instrument(skip(self))]
    pub async fn coord_to_address(&self, x: f64, y: f64) -> Result<Value, ProxyError> {
        let params = vec![("x", x.to_string()), ("y", y.to_string())];
        let data = self.get("/geo/coord2address.json", &params).await?;

        let doc = data["documents"]
            .as_array()
            .and_then(|docs| docs.first())
            .ok_or(ProxyError::NotFound)?;

        Ok(json!({
            "address": doc["address"]["address_name"].as_str().unwrap_or(""),
            "road_address": doc["road_address"]["address_name"].as_str().unwrap_or(""),
            "longitude": x,
            "latitude": y,
        }))
    }

    /// Category search around a coordinate, distance-sorted.
    #[tracing::instrument(skip(self))]
    pub async fn search_category(
        &self,
        category_code: &str,
        x: f64,
        y: f64,
        radius: u32,
        page: u32,
        size: u32,
    ) -> Result<Value, ProxyError> {
        let params = vec![
            ("category_group_code", category_code.to_string()),
            ("x", x.to_string()),
            ("y", y.to_string()),
            ("radius", radius.min(MAX_RADIUS_M).to_string()),
            ("page", page.to_string()),
            ("size", size.min(MAX_KEYWORD_SIZE).to_string()),
            ("sort", "distance".to_string()),
        ];

        let data = self.get("/search/category.json", &params).await?;
        Ok(json!({
            "total": data["meta"]["total_count"],
            "results": map_places(&data),
        }))
    }
}

/// Map Kakao place documents into the stable response shape.
fn map_places(data: &Value) -> Vec<Value> {
    data["documents"]
        .as_array()
        .map(|docs| {
            docs.iter()
                .map(|place| {
                    json!({
                        "id": place["id"],
                        "name": place["place_name"],
                        "category": place["category_name"],
                        "address": place["address_name"],
                        "road_address": place["road_address_name"].as_str().unwrap_or(""),
                        "phone": place["phone"].as_str().unwrap_or(""),
                        "url": place["place_url"].as_str().unwrap_or(""),
                        "longitude": lenient_f64(&place["x"]),
                        "latitude": lenient_f64(&place["y"]),
                        "distance": place["distance"].as_str().unwrap_or(""),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let client = KakaoClient::new(None);
        let result = client.search_keyword("Gyeongbokgung", None, None, 20000, 1, 15).await;
        assert!(matches!(result, Err(ProxyError::MissingKey)));

        let result = client.coord_to_address(126.9770, 37.5788).await;
        assert!(matches!(result, Err(ProxyError::MissingKey)));
    }

    #[test]
    fn test_map_places_shapes_documents() {
        let data = json!({
            "documents": [{
                "id": "8203157",
                "place_name": "경복궁",
                "category_name": "여행 > 관광,명소 > 고궁,궁",
                "address_name": "서울 종로구 세종로 1-1",
                "road_address_name": "서울 종로구 사직로 161",
                "phone": "02-3700-3900",
                "place_url": "http://place.map.kakao.com/8203157",
                "x": "126.976861",
                "y": "37.579617",
                "distance": "418",
            }]
        });
        let mapped = map_places(&data);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0]["name"], json!("경복궁"));
        assert_eq!(mapped[0]["longitude"], json!(126.976861));
        assert_eq!(mapped[0]["latitude"], json!(37.579617));
        assert_eq!(mapped[0]["distance"], json!("418"));
    }

    #[test]
    fn test_map_places_handles_missing_optional_fields() {
        let data = json!({
            "documents": [{
                "id": "1",
                "place_name": "Somewhere",
                "category_name": "cat",
                "address_name": "addr",
                "x": "127.0",
                "y": "37.5",
            }]
        });
        let mapped = map_places(&data);
        assert_eq!(mapped[0]["road_address"], json!(""));
        assert_eq!(mapped[0]["phone"], json!(""));
        assert_eq!(mapped[0]["url"], json!(""));
    }

    #[test]
    fn test_map_places_empty_documents() {
        assert!(map_places(&json!({"documents": []})).is_empty());
        assert!(map_places(&json!({})).is_empty());
    }
}
