//! HTTP client for the restaurant REST API.
//!
//! Wraps `reqwest` with envelope unwrapping, inactive-record filtering, and
//! typed deserialization. No retries and no caching: a failed call surfaces
//! as an [`ApiError`] and the caller decides how to degrade.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::{Category, OpenStatusPayload, Restaurant, RestaurantLocation};

/// Client for the restaurant REST API.
///
/// Use [`ApiClient::new`] with the configured base URL, e.g.
/// `http://localhost:3000/api`, or a wiremock server URI in tests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so `Url::join` appends
        // endpoint paths instead of replacing the last segment (`/api`).
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Restaurants near a point, as filtered by the backend.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] if the API reports failure.
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the payload has an unexpected shape.
    pub async fn nearby_restaurants(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<Restaurant>, ApiError> {
        self.nearby_restaurants_in_category(latitude, longitude, radius_km, None)
            .await
    }

    /// [`ApiClient::nearby_restaurants`], optionally narrowed server-side to
    /// one category.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`].
    pub async fn nearby_restaurants_in_category(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        category_id: Option<i64>,
    ) -> Result<Vec<Restaurant>, ApiError> {
        let lat = latitude.to_string();
        let lng = longitude.to_string();
        let radius = radius_km.to_string();
        let category = category_id.map(|id| id.to_string());

        let mut query = vec![
            ("lat", lat.as_str()),
            ("lng", lng.as_str()),
            ("radius", radius.as_str()),
        ];
        if let Some(category) = category.as_deref() {
            query.push(("categoryId", category));
        }

        let url = self.build_url("restaurants/nearby", &query)?;
        let restaurants: Vec<Restaurant> = self.get_list(&url).await?;
        Ok(restaurants.into_iter().filter(|r| r.active).collect())
    }

    /// Backend text search over restaurant names and categories. With a
    /// position, the backend may use it to order or bound results.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`].
    pub async fn search_restaurants(
        &self,
        text: &str,
        near: Option<(f64, f64)>,
    ) -> Result<Vec<Restaurant>, ApiError> {
        let position = near.map(|(lat, lng)| (lat.to_string(), lng.to_string()));

        let mut query = vec![("q", text)];
        if let Some((lat, lng)) = &position {
            query.push(("lat", lat.as_str()));
            query.push(("lng", lng.as_str()));
        }

        let url = self.build_url("restaurants/search", &query)?;
        let restaurants: Vec<Restaurant> = self.get_list(&url).await?;
        Ok(restaurants.into_iter().filter(|r| r.active).collect())
    }

    /// A single restaurant, or `None` when the API answers 404 or an empty
    /// envelope.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`], except that 404 is `Ok(None)`.
    pub async fn restaurant_by_id(&self, id: i64) -> Result<Option<Restaurant>, ApiError> {
        let url = self.build_url(&format!("restaurants/{id}"), &[])?;
        match self.get_data(&url).await {
            Ok(serde_json::Value::Null) | Err(ApiError::NotFound { .. }) => Ok(None),
            Ok(data) => decode(data, &url).map(Some),
            Err(e) => Err(e),
        }
    }

    /// Active restaurants in a category.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`].
    pub async fn restaurants_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Restaurant>, ApiError> {
        let url = self.build_url(
            &format!("restaurants/category/{category_id}"),
            &[("includeInactive", "false")],
        )?;
        let restaurants: Vec<Restaurant> = self.get_list(&url).await?;
        Ok(restaurants.into_iter().filter(|r| r.active).collect())
    }

    /// Active physical locations of a restaurant.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`].
    pub async fn restaurant_locations(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<RestaurantLocation>, ApiError> {
        let url = self.build_url(&format!("restaurants/{restaurant_id}/locations"), &[])?;
        let locations: Vec<RestaurantLocation> = self.get_list(&url).await?;
        Ok(locations.into_iter().filter(|l| l.active).collect())
    }

    /// Authoritative "is this location open right now" check.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`]; a 404 is
    /// [`ApiError::NotFound`].
    pub async fn location_open_now(&self, location_id: i64) -> Result<bool, ApiError> {
        let url = self.build_url(
            &format!("restaurants/locations/{location_id}/open-status"),
            &[],
        )?;
        let data = self.get_data(&url).await?;
        let payload: OpenStatusPayload = decode(data, &url)?;
        Ok(payload.is_open())
    }

    /// Every location the backend currently reports as open.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`].
    pub async fn currently_open_locations(&self) -> Result<Vec<RestaurantLocation>, ApiError> {
        let url = self.build_url("restaurants/locations/currently-open", &[])?;
        self.get_list(&url).await
    }

    /// Active categories.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::nearby_restaurants`].
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.build_url("categories", &[])?;
        let categories: Vec<Category> = self.get_list(&url).await?;
        Ok(categories.into_iter().filter(|c| c.active).collect())
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Fetches a list payload; a `null` or missing `data` is an empty list.
    async fn get_list<T: DeserializeOwned>(&self, url: &Url) -> Result<Vec<T>, ApiError> {
        match self.get_data(url).await? {
            serde_json::Value::Null => Ok(Vec::new()),
            data => decode(data, url),
        }
    }

    /// Sends a GET, checks the status, and returns the unwrapped payload.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] on 404, [`ApiError::Http`] on other non-2xx
    /// statuses or network failure, [`ApiError::Deserialize`] if the body is
    /// not JSON, [`ApiError::Api`] if the envelope reports failure.
    async fn get_data(&self, url: &Url) -> Result<serde_json::Value, ApiError> {
        tracing::debug!(url = %url, "restaurant API request");
        let response = self.client.get(url.clone()).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                url: url.to_string(),
            });
        }
        let response = response.error_for_status()?;
        tracing::debug!(url = %url, status = response.status().as_u16(), "restaurant API response");

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        unwrap_envelope(value)
    }
}

/// Strips the `{success, data, message}` envelope when present.
///
/// A bare payload (array, scalar, or object without `data`/`success`) is
/// returned unchanged.
fn unwrap_envelope(body: serde_json::Value) -> Result<serde_json::Value, ApiError> {
    let mut map = match body {
        serde_json::Value::Object(map) => map,
        other => return Ok(other),
    };

    if map.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
        let message = map
            .get("message")
            .and_then(serde_json::Value::as_str)
            .or_else(|| {
                map.get("errors")
                    .and_then(|e| e.get(0))
                    .and_then(|e| e.get("message"))
                    .and_then(serde_json::Value::as_str)
            })
            .unwrap_or("unknown error")
            .to_string();
        return Err(ApiError::Api(message));
    }

    if map.contains_key("data") || map.contains_key("success") {
        return Ok(map.remove("data").unwrap_or(serde_json::Value::Null));
    }

    Ok(serde_json::Value::Object(map))
}

fn decode<T: DeserializeOwned>(data: serde_json::Value, url: &Url) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::Deserialize {
        context: url.to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
