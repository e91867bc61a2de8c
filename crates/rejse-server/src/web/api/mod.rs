pub mod auth;
pub mod budgets;
pub mod currency;
pub mod delivery;
pub mod itineraries;
pub mod items;
pub mod middleware;
pub mod places;
pub mod tour;
pub mod users;

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use rejse_db::{ItineraryRepo, ItineraryRow, UserRow};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Social login + token refresh (public)
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/{provider}", post(auth::social_login))
        // Current user profile
        .route(
            "/users/me",
            get(users::get_me).put(users::update_me).delete(users::delete_me),
        )
        // Itineraries
        .route(
            "/itineraries",
            get(itineraries::list_itineraries).post(itineraries::create_itinerary),
        )
        .route("/itineraries/{id}", get(itineraries::get_itinerary))
        // Items nested under an owned itinerary
        .route(
            "/itineraries/{id}/items",
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/itineraries/{id}/items/{item_id}",
            put(items::update_item).delete(items::delete_item),
        )
        // Budgets nested under an owned itinerary
        .route(
            "/itineraries/{id}/budgets",
            get(budgets::list_budgets).post(budgets::create_budget),
        )
        // Currency proxy
        .route("/currency/rates", get(currency::get_rates))
        .route("/currency/convert", get(currency::convert))
        .route("/currency/supported", get(currency::supported))
        // Kakao Local proxy
        .route("/places/keyword", get(places::search_keyword))
        .route("/places/address", get(places::search_address))
        .route("/places/coord", get(places::coord_to_address))
        .route("/places/category", get(places::search_category))
        // TourAPI proxy
        .route("/tour/search", get(tour::search))
        .route("/tour/detail/{content_id}", get(tour::detail))
        .route("/tour/popular", get(tour::popular))
        // Curated delivery data
        .route("/delivery/restaurants", get(delivery::list_restaurants))
        .route("/delivery/categories", get(delivery::list_categories))
        .route("/delivery/partners", get(delivery::list_partners))
        .with_state(state)
}

pub(crate) fn default_list_limit() -> i64 {
    10
}

/// Pagination bounds shared by the list endpoints
pub(crate) fn validate_pagination(limit: i64, offset: i64) -> Result<(), ApiError> {
    if !(1..=100).contains(&limit) {
        return Err(ApiError::invalid_field("limit", "must be between 1 and 100"));
    }
    if offset < 0 {
        return Err(ApiError::invalid_field("offset", "must not be negative"));
    }
    Ok(())
}

/// Resolve an itinerary only if the caller owns it.
///
/// This is the single authorization gate shared by the itinerary, item and
/// budget handlers. Missing and not-owned are both 404: existence is never
/// revealed to non-owners.
pub(crate) async fn resolve_owned_itinerary(
    pool: &PgPool,
    itinerary_id: Uuid,
    user: &UserRow,
) -> Result<ItineraryRow, ApiError> {
    let itinerary = ItineraryRepo::get_owned(pool, itinerary_id, user.user_id).await?;
    itinerary.ok_or_else(|| ApiError::not_found("Itinerary not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pagination_bounds() {
        assert!(validate_pagination(1, 0).is_ok());
        assert!(validate_pagination(100, 500).is_ok());
        assert!(validate_pagination(0, 0).is_err());
        assert!(validate_pagination(101, 0).is_err());
        assert!(validate_pagination(10, -1).is_err());
    }
}
