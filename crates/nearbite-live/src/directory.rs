//! Data-provider seam.
//!
//! Ranking and caching components take a [`PlaceDirectory`] instead of a
//! global client, so tests can swap in an in-memory fake.

use async_trait::async_trait;
use nearbite_api::{ApiClient, ApiError};
use nearbite_core::{Coordinate, Place};

/// Read-only access to restaurants and their physical locations.
#[async_trait]
pub trait PlaceDirectory: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn nearby(&self, at: Coordinate, radius_km: f64) -> Result<Vec<Place>, Self::Error>;

    async fn by_id(&self, id: i64) -> Result<Option<Place>, Self::Error>;

    async fn by_category(&self, category_id: i64) -> Result<Vec<Place>, Self::Error>;

    /// Physical locations of a restaurant, each as a [`Place`] with hours.
    async fn locations_for(&self, restaurant_id: i64) -> Result<Vec<Place>, Self::Error>;

    /// Authoritative live status of one location.
    async fn is_location_open_now(&self, location_id: i64) -> Result<bool, Self::Error>;
}

#[async_trait]
impl PlaceDirectory for ApiClient {
    type Error = ApiError;

    async fn nearby(&self, at: Coordinate, radius_km: f64) -> Result<Vec<Place>, ApiError> {
        let restaurants = self
            .nearby_restaurants(at.latitude, at.longitude, radius_km)
            .await?;
        Ok(restaurants.iter().map(nearbite_api::Restaurant::to_place).collect())
    }

    async fn by_id(&self, id: i64) -> Result<Option<Place>, ApiError> {
        Ok(self.restaurant_by_id(id).await?.map(|r| r.to_place()))
    }

    async fn by_category(&self, category_id: i64) -> Result<Vec<Place>, ApiError> {
        let restaurants = self.restaurants_by_category(category_id).await?;
        Ok(restaurants.iter().map(nearbite_api::Restaurant::to_place).collect())
    }

    async fn locations_for(&self, restaurant_id: i64) -> Result<Vec<Place>, ApiError> {
        let locations = self.restaurant_locations(restaurant_id).await?;
        Ok(locations
            .iter()
            .map(nearbite_api::RestaurantLocation::to_place)
            .collect())
    }

    async fn is_location_open_now(&self, location_id: i64) -> Result<bool, ApiError> {
        self.location_open_now(location_id).await
    }
}
