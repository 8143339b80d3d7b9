//! In-memory [`PlaceDirectory`] for unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use nearbite_core::{Coordinate, Place};

use crate::directory::PlaceDirectory;

#[derive(Debug, thiserror::Error)]
#[error("fake directory failure: {0}")]
pub struct FakeError(pub String);

/// A scripted answer for one `nearby` call.
pub struct NearbyReply {
    pub delay: Duration,
    pub result: Result<Vec<Place>, String>,
}

#[derive(Default)]
pub struct FakeDirectory {
    nearby: Mutex<VecDeque<NearbyReply>>,
    categories: HashMap<i64, Vec<Place>>,
    locations: HashMap<i64, Vec<Place>>,
    failing_restaurants: HashSet<i64>,
    open_locations: HashSet<i64>,
    failing_locations: HashSet<i64>,
    check_delay: Duration,
    pub location_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub nearby_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nearby(self, delay: Duration, result: Result<Vec<Place>, String>) -> Self {
        self.nearby
            .lock()
            .unwrap()
            .push_back(NearbyReply { delay, result });
        self
    }

    pub fn with_category(mut self, category_id: i64, places: Vec<Place>) -> Self {
        self.categories.insert(category_id, places);
        self
    }

    /// Registers locations for a restaurant; `open` lists the ones the
    /// open-status endpoint reports as open.
    pub fn with_locations(mut self, restaurant_id: i64, locations: &[(i64, bool)]) -> Self {
        let places = locations
            .iter()
            .map(|&(id, open)| {
                if open {
                    self.open_locations.insert(id);
                }
                Place::new(id, "location", Coordinate::new(0.0, 0.0))
            })
            .collect();
        self.locations.insert(restaurant_id, places);
        self
    }

    pub fn failing_locations_for(mut self, restaurant_id: i64) -> Self {
        self.failing_restaurants.insert(restaurant_id);
        self
    }

    pub fn failing_status_for(mut self, location_id: i64) -> Self {
        self.failing_locations.insert(location_id);
        self
    }

    pub fn with_check_delay(mut self, delay: Duration) -> Self {
        self.check_delay = delay;
        self
    }
}

#[async_trait]
impl PlaceDirectory for FakeDirectory {
    type Error = FakeError;

    async fn nearby(&self, _at: Coordinate, _radius_km: f64) -> Result<Vec<Place>, FakeError> {
        self.nearby_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.nearby.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            return Ok(Vec::new());
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result.map_err(FakeError)
    }

    async fn by_id(&self, id: i64) -> Result<Option<Place>, FakeError> {
        Ok(self
            .categories
            .values()
            .flatten()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn by_category(&self, category_id: i64) -> Result<Vec<Place>, FakeError> {
        Ok(self.categories.get(&category_id).cloned().unwrap_or_default())
    }

    async fn locations_for(&self, restaurant_id: i64) -> Result<Vec<Place>, FakeError> {
        self.location_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_restaurants.contains(&restaurant_id) {
            return Err(FakeError(format!("locations for {restaurant_id}")));
        }
        Ok(self.locations.get(&restaurant_id).cloned().unwrap_or_default())
    }

    async fn is_location_open_now(&self, location_id: i64) -> Result<bool, FakeError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.check_delay.is_zero() {
            tokio::time::sleep(self.check_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_locations.contains(&location_id) {
            return Err(FakeError(format!("status for {location_id}")));
        }
        Ok(self.open_locations.contains(&location_id))
    }
}
