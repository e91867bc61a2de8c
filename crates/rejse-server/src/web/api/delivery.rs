use crate::error::ApiError;
use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Curated restaurant entry with delivery-partner deep links.
/// This dataset is static; there is no delivery aggregator upstream.
#[derive(Debug, Clone, Serialize)]
pub struct Restaurant {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub cuisine_type: &'static str,
    pub min_order: u32,
    pub delivery_fee: u32,
    pub delivery_time: &'static str,
    pub rating: f64,
    pub shuttle_link: Option<&'static str>,
    pub baemin_link: Option<&'static str>,
    pub coupang_link: Option<&'static str>,
    pub popular_items: &'static [&'static str],
}

fn restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: "kyochon-hongdae",
            name: "Kyochon Chicken (교촌치킨)",
            category: "chicken",
            cuisine_type: "Korean Fried Chicken",
            min_order: 17000,
            delivery_fee: 3000,
            delivery_time: "30-45 min",
            rating: 4.7,
            shuttle_link: Some("https://www.shuttledelivery.co.kr/"),
            baemin_link: Some("baemin://restaurant/kyochon"),
            coupang_link: None,
            popular_items: &["Honey Combo", "Red Combo", "Soy Garlic"],
        },
        Restaurant {
            id: "bbq-gangnam",
            name: "BBQ Chicken",
            category: "chicken",
            cuisine_type: "Korean Fried Chicken",
            min_order: 18000,
            delivery_fee: 3000,
            delivery_time: "35-50 min",
            rating: 4.6,
            shuttle_link: Some("https://www.shuttledelivery.co.kr/"),
            baemin_link: Some("baemin://restaurant/bbq"),
            coupang_link: Some("coupangeats://restaurant/bbq"),
            popular_items: &["Golden Olive", "Cheese Ball", "Hot Wing"],
        },
        Restaurant {
            id: "pizzahut-seoul",
            name: "Pizza Hut Korea",
            category: "pizza",
            cuisine_type: "Western Pizza",
            min_order: 15000,
            delivery_fee: 2000,
            delivery_time: "40-55 min",
            rating: 4.4,
            shuttle_link: Some("https://www.shuttledelivery.co.kr/"),
            baemin_link: Some("baemin://restaurant/pizzahut"),
            coupang_link: Some("coupangeats://restaurant/pizzahut"),
            popular_items: &["Super Supreme", "Cheese Lover", "Pepperoni"],
        },
        Restaurant {
            id: "dominos-myeongdong",
            name: "Domino's Pizza",
            category: "pizza",
            cuisine_type: "Western Pizza",
            min_order: 14000,
            delivery_fee: 2000,
            delivery_time: "30-45 min",
            rating: 4.5,
            shuttle_link: Some("https://www.shuttledelivery.co.kr/"),
            baemin_link: Some("baemin://restaurant/dominos"),
            coupang_link: None,
            popular_items: &["New York Pizza", "Potato Pizza", "Bulgogi Pizza"],
        },
        Restaurant {
            id: "mcdonalds-gangnam",
            name: "McDonald's",
            category: "western",
            cuisine_type: "Fast Food",
            min_order: 10000,
            delivery_fee: 2000,
            delivery_time: "25-35 min",
            rating: 4.3,
            shuttle_link: Some("https://www.shuttledelivery.co.kr/"),
            baemin_link: Some("baemin://restaurant/mcdonalds"),
            coupang_link: Some("coupangeats://restaurant/mcdonalds"),
            popular_items: &["Big Mac", "Bulgogi Burger", "McNuggets"],
        },
        Restaurant {
            id: "burgerking-hongdae",
            name: "Burger King",
            category: "western",
            cuisine_type: "Fast Food",
            min_order: 9000,
            delivery_fee: 2000,
            delivery_time: "30-40 min",
            rating: 4.4,
            shuttle_link: Some("https://www.shuttledelivery.co.kr/"),
            baemin_link: Some("baemin://restaurant/burgerking"),
            coupang_link: Some("coupangeats://restaurant/burgerking"),
            popular_items: &["Whopper", "Cheese Whopper", "Onion Rings"],
        },
    ]
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct RestaurantsQuery {
    pub category: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub(crate) fn filter_and_paginate(
    all: Vec<Restaurant>,
    category: Option<&str>,
    page: u32,
    limit: u32,
) -> (usize, Vec<Restaurant>) {
    let filtered: Vec<Restaurant> = match category {
        Some(cat) => all.into_iter().filter(|r| r.category == cat).collect(),
        None => all,
    };
    let total = filtered.len();
    let start = ((page - 1) * limit) as usize;
    let paginated = filtered
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();
    (total, paginated)
}

/// GET /api/v1/delivery/restaurants
#[tracing::instrument]
pub async fn list_restaurants(
    Query(q): Query<RestaurantsQuery>,
) -> Result<Json<Value>, ApiError> {
    if q.page < 1 {
        return Err(ApiError::invalid_field("page", "must be at least 1"));
    }
    if !(1..=50).contains(&q.limit) {
        return Err(ApiError::invalid_field("limit", "must be between 1 and 50"));
    }

    let (total, paginated) =
        filter_and_paginate(restaurants(), q.category.as_deref(), q.page, q.limit);

    Ok(Json(json!({
        "total": total,
        "page": q.page,
        "limit": q.limit,
        "restaurants": paginated,
    })))
}

/// GET /api/v1/delivery/categories
pub async fn list_categories() -> Json<Value> {
    Json(json!({
        "categories": [
            {"id": "chicken", "name": "Korean Fried Chicken", "description": "Famous Korean Fried Chicken chains"},
            {"id": "pizza", "name": "Pizza & Italian", "description": "Pizza and Italian cuisine"},
            {"id": "western", "name": "Western Fast Food", "description": "Burgers and fast food"},
            {"id": "korean", "name": "Korean Traditional", "description": "Korean traditional dishes"},
            {"id": "chinese", "name": "Chinese Food", "description": "Chinese restaurants"},
            {"id": "japanese", "name": "Japanese Food", "description": "Sushi, ramen and more"},
        ]
    }))
}

/// GET /api/v1/delivery/partners — foreigner-friendly delivery services
pub async fn list_partners() -> Json<Value> {
    Json(json!({
        "partners": [
            {
                "id": "shuttle",
                "name": "Shuttle Delivery",
                "description": "Foreign-friendly delivery service",
                "features": [
                    "No Korean phone number required",
                    "International cards accepted",
                    "English support",
                ],
                "website": "https://www.shuttledelivery.co.kr/",
            },
            {
                "id": "baemin",
                "name": "Baemin (배달의민족)",
                "description": "Korea's largest delivery platform",
                "features": [
                    "Largest restaurant selection",
                    "Korean language only",
                ],
                "website": "https://www.baemin.com/",
            },
            {
                "id": "coupang",
                "name": "Coupang Eats",
                "description": "Fast delivery with English interface",
                "features": [
                    "English interface available",
                    "Fast delivery",
                ],
                "website": "https://www.coupangeats.com/",
            },
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_category() {
        let (total, rows) = filter_and_paginate(restaurants(), Some("chicken"), 1, 20);
        assert_eq!(total, 2);
        assert!(rows.iter().all(|r| r.category == "chicken"));
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let (total, rows) = filter_and_paginate(restaurants(), Some("vegan"), 1, 20);
        assert_eq!(total, 0);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_pagination_slices_results() {
        let (total, page1) = filter_and_paginate(restaurants(), None, 1, 4);
        assert_eq!(total, 6);
        assert_eq!(page1.len(), 4);

        let (_, page2) = filter_and_paginate(restaurants(), None, 2, 4);
        assert_eq!(page2.len(), 2);
        // Pages do not overlap
        assert!(page1.iter().all(|a| page2.iter().all(|b| a.id != b.id)));

        let (_, page3) = filter_and_paginate(restaurants(), None, 3, 4);
        assert!(page3.is_empty());
    }
}
