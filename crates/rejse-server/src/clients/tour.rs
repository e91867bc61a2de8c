use serde_json::{json, Value};
use std::time::Duration;

use super::{lenient_f64, ProxyError};

// TourAPI is slow; the original service allowed it 30 seconds.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const MOBILE_OS: &str = "ETC";
const MOBILE_APP: &str = "Rejse";

/// Client for the Korea Tourism Organization TourAPI 4.0.
pub struct TourClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TourClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get(&self, endpoint: &str, extra: &[(&str, String)]) -> Result<Value, ProxyError> {
        let key = self.api_key.as_deref().ok_or(ProxyError::MissingKey)?;
        let mut params = vec![
            ("serviceKey", key.to_string()),
            ("_type", "json".to_string()),
            ("MobileOS", MOBILE_OS.to_string()),
            ("MobileApp", MOBILE_APP.to_string()),
        ];
        params.extend(extra.iter().cloned());

        let response = self
            .http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProxyError::Upstream(format!(
                "TourAPI returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// Keyword search around a coordinate, popularity-ordered.
    /// Without an API key a flagged empty mock result is served.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        keyword: &str,
        map_x: f64,
        map_y: f64,
        radius: u32,
        rows: u32,
        content_type_id: Option<&str>,
    ) -> Result<Value, ProxyError> {
        if self.api_key.is_none() {
            return Ok(json!({"total": 0, "results": [], "mock": true}));
        }

        let mut params = vec![
            ("mapX", map_x.to_string()),
            ("mapY", map_y.to_string()),
            ("radius", radius.to_string()),
            ("numOfRows", rows.to_string()),
            ("keyword", keyword.to_string()),
            ("arrange", "P".to_string()),
        ];
        if let Some(content_type) = content_type_id {
            params.push(("contentTypeId", content_type.to_string()));
        }

        let data = self.get("locationBasedList1", &params).await?;
        let results: Vec<Value> = normalize_items(&data).iter().map(map_spot).collect();

        Ok(json!({
            "total": results.len(),
            "results": results,
            "mock": false,
        }))
    }

    /// Detail record for one tourist spot.
    #[tracing::instrument(skip(self))]
    pub async fn detail(&self, content_id: &str) -> Result<Value, ProxyError> {
        let params = vec![
            ("contentId", content_id.to_string()),
            ("defaultYN", "Y".to_string()),
            ("firstImageYN", "Y".to_string()),
            ("addrinfoYN", "Y".to_string()),
            ("mapinfoYN", "Y".to_string()),
            ("overviewYN", "Y".to_string()),
        ];

        let data = self.get("detailCommon1", &params).await?;
        let items = normalize_items(&data);
        let item = items.first().ok_or(ProxyError::NotFound)?;

        Ok(json!({
            "id": item["contentid"],
            "title": item["title"].as_str().unwrap_or(""),
            "address": item["addr1"].as_str().unwrap_or(""),
            "detail_address": item["addr2"].as_str().unwrap_or(""),
            "category": item["cat3"].as_str().unwrap_or(""),
            "image": item["firstimage"].as_str().unwrap_or(""),
            "thumbnail": item["firstimage2"].as_str().unwrap_or(""),
            "map_x": lenient_f64(&item["mapx"]),
            "map_y": lenient_f64(&item["mapy"]),
            "tel": item["tel"].as_str().unwrap_or(""),
            "homepage": item["homepage"].as_str().unwrap_or(""),
            "overview": item["overview"].as_str().unwrap_or(""),
            "zipcode": item["zipcode"].as_str().unwrap_or(""),
        }))
    }

    /// Popular spots, optionally filtered by area.
    /// Without an API key a static, flagged mock list is served.
    #[tracing::instrument(skip(self))]
    pub async fn popular(
        &self,
        area_code: Option<&str>,
        content_type_id: &str,
        rows: u32,
    ) -> Result<Value, ProxyError> {
        if self.api_key.is_none() {
            return Ok(mock_popular());
        }

        let mut params = vec![
            ("contentTypeId", content_type_id.to_string()),
            ("numOfRows", rows.to_string()),
            ("arrange", "P".to_string()),
        ];
        if let Some(area) = area_code {
            params.push(("areaCode", area.to_string()));
        }

        let data = self.get("areaBasedList1", &params).await?;
        let results: Vec<Value> = normalize_items(&data).iter().map(map_spot).collect();

        Ok(json!({
            "total": results.len(),
            "results": results,
            "mock": false,
        }))
    }
}

/// TourAPI wraps results in response.body.items.item and collapses a
/// single-element list into a bare object.
fn normalize_items(data: &Value) -> Vec<Value> {
    let items = &data["response"]["body"]["items"]["item"];
    match items {
        Value::Array(list) => list.clone(),
        Value::Object(_) => vec![items.clone()],
        _ => vec![],
    }
}

fn map_spot(item: &Value) -> Value {
    json!({
        "id": item["contentid"],
        "title": item["title"].as_str().unwrap_or(""),
        "address": item["addr1"].as_str().unwrap_or(""),
        "category": item["cat3"].as_str().unwrap_or(""),
        "image": item["firstimage"].as_str().unwrap_or(""),
        "thumbnail": item["firstimage2"].as_str().unwrap_or(""),
        "map_x": lenient_f64(&item["mapx"]),
        "map_y": lenient_f64(&item["mapy"]),
        "tel": item["tel"].as_str().unwrap_or(""),
    })
}

/// Seoul staples served in development when no TourAPI key is configured
fn mock_popular() -> Value {
    let spots = [
        ("Gyeongbokgung Palace", "Historical Site", "161 Sajik-ro, Jongno-gu, Seoul", 126.9770, 37.5788, "+82-2-3700-3900"),
        ("N Seoul Tower", "Landmark", "105 Namsangongwon-gil, Yongsan-gu, Seoul", 126.9882, 37.5512, "+82-2-3455-9277"),
        ("Bukchon Hanok Village", "Cultural", "37 Gyedong-gil, Jongno-gu, Seoul", 126.9850, 37.5825, "+82-2-2148-4161"),
        ("Myeongdong Shopping Street", "Shopping", "Myeongdong-gil, Jung-gu, Seoul", 126.9850, 37.5637, ""),
        ("Gangnam District", "Entertainment", "Gangnam-gu, Seoul", 127.0276, 37.4979, ""),
        ("Insadong Street", "Cultural", "Insadong-gil, Jongno-gu, Seoul", 126.9853, 37.5742, ""),
    ];
    let results: Vec<Value> = spots
        .iter()
        .enumerate()
        .map(|(i, (title, category, address, x, y, tel))| {
            json!({
                "id": format!("mock_{}", i + 1),
                "title": title,
                "address": address,
                "category": category,
                "image": "",
                "thumbnail": "",
                "map_x": x,
                "map_y": y,
                "tel": tel,
            })
        })
        .collect();

    json!({
        "total": results.len(),
        "results": results,
        "mock": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_items_list() {
        let data = json!({
            "response": {"body": {"items": {"item": [
                {"contentid": "1"}, {"contentid": "2"}
            ]}}}
        });
        assert_eq!(normalize_items(&data).len(), 2);
    }

    #[test]
    fn test_normalize_items_single_object() {
        let data = json!({
            "response": {"body": {"items": {"item": {"contentid": "1"}}}}
        });
        let items = normalize_items(&data);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["contentid"], json!("1"));
    }

    #[test]
    fn test_normalize_items_empty_payload() {
        // TourAPI reports "no results" as an empty string in place of the map
        let data = json!({"response": {"body": {"items": ""}}});
        assert!(normalize_items(&data).is_empty());
        assert!(normalize_items(&json!({})).is_empty());
    }

    #[test]
    fn test_map_spot_parses_string_coordinates() {
        let item = json!({
            "contentid": "126508",
            "title": "Gyeongbokgung",
            "addr1": "161 Sajik-ro",
            "cat3": "A02010100",
            "mapx": "126.9769930325",
            "mapy": "37.5788222356",
        });
        let spot = map_spot(&item);
        assert_eq!(spot["map_x"], json!(126.9769930325));
        assert_eq!(spot["map_y"], json!(37.5788222356));
        assert_eq!(spot["image"], json!(""));
    }

    #[tokio::test]
    async fn test_search_without_key_serves_empty_mock() {
        let client = TourClient::new("http://apis.data.go.kr/B551011/KorService1", None);
        let result = client.search("palace", 126.97, 37.57, 10000, 10, None).await.unwrap();
        assert_eq!(result["mock"], json!(true));
        assert_eq!(result["total"], json!(0));
    }

    #[tokio::test]
    async fn test_popular_without_key_serves_mock_spots() {
        let client = TourClient::new("http://apis.data.go.kr/B551011/KorService1", None);
        let result = client.popular(None, "12", 20).await.unwrap();
        assert_eq!(result["mock"], json!(true));
        assert_eq!(result["total"], json!(6));
        assert_eq!(result["results"][0]["title"], json!("Gyeongbokgung Palace"));
    }

    #[tokio::test]
    async fn test_detail_without_key_is_unavailable() {
        let client = TourClient::new("http://apis.data.go.kr/B551011/KorService1", None);
        let result = client.detail("126508").await;
        assert!(matches!(result, Err(ProxyError::MissingKey)));
    }
}
