//! Cached open-status for a set of places.
//!
//! [`OpenStatusCache::refresh_all`] checks places in fixed-size concurrent
//! batches with a pause between batches, so a long list never floods the
//! backend. Each check asks the directory for the place's locations and
//! uses the live status of the first one; when that is impossible the
//! place's static flag is used instead.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use futures::future::join_all;
use nearbite_core::{AppConfig, Clock, Place};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::directory::PlaceDirectory;

/// Cached status of one place.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenStatusEntry {
    pub place_id: i64,
    /// `None` until the first check completes.
    pub is_open: Option<bool>,
    pub loading: bool,
    pub last_checked_at: Option<DateTime<FixedOffset>>,
}

impl OpenStatusEntry {
    fn unknown(place_id: i64) -> Self {
        Self {
            place_id,
            is_open: None,
            loading: false,
            last_checked_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCacheConfig {
    /// Places checked concurrently per batch. Values below 1 act as 1.
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub refresh_interval: Duration,
}

impl Default for StatusCacheConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            batch_delay: Duration::from_millis(100),
            refresh_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl StatusCacheConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.status_batch_size,
            batch_delay: Duration::from_millis(config.status_batch_delay_ms),
            refresh_interval: Duration::from_secs(config.status_refresh_secs),
        }
    }
}

pub struct OpenStatusCache<D: ?Sized> {
    directory: Arc<D>,
    clock: Arc<dyn Clock>,
    config: StatusCacheConfig,
    entries: RwLock<HashMap<i64, OpenStatusEntry>>,
}

impl<D> OpenStatusCache<D>
where
    D: PlaceDirectory + ?Sized + 'static,
{
    pub fn new(directory: Arc<D>, clock: Arc<dyn Clock>, config: StatusCacheConfig) -> Self {
        Self {
            directory,
            clock,
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Entry for `place_id`; a place never checked reads as unknown and not
    /// loading.
    #[must_use]
    pub fn get(&self, place_id: i64) -> OpenStatusEntry {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&place_id)
            .cloned()
            .unwrap_or_else(|| OpenStatusEntry::unknown(place_id))
    }

    /// Copy of every entry recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<i64, OpenStatusEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `true` while any entry is mid-check.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .any(|e| e.loading)
    }

    /// Checks every place, batch by batch.
    ///
    /// Entries in a batch are marked loading (keeping any previous value)
    /// when the batch starts, and replaced as the batch completes. Failures
    /// never abort the pass.
    pub async fn refresh_all(&self, places: &[Place]) {
        if places.is_empty() {
            return;
        }

        let batch_size = self.config.batch_size.max(1);
        let batch_count = places.len().div_ceil(batch_size);
        tracing::debug!(
            places = places.len(),
            batches = batch_count,
            "refreshing open status"
        );

        for (index, batch) in places.chunks(batch_size).enumerate() {
            self.mark_loading(batch);
            let pending = PendingBatch {
                entries: &self.entries,
                place_ids: batch.iter().map(|p| p.id).collect(),
            };

            let checked = join_all(batch.iter().map(|place| self.check(place))).await;
            {
                let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
                for entry in checked {
                    entries.insert(entry.place_id, entry);
                }
            }
            drop(pending);

            let is_last = index + 1 == batch_count;
            if !is_last && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }
    }

    fn mark_loading(&self, batch: &[Place]) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for place in batch {
            let entry = entries
                .entry(place.id)
                .or_insert_with(|| OpenStatusEntry::unknown(place.id));
            entry.loading = true;
        }
    }

    async fn check(&self, place: &Place) -> OpenStatusEntry {
        let is_open = match self.live_status(place).await {
            Ok(Some(open)) => open,
            Ok(None) => place.static_open(),
            Err(e) => {
                tracing::warn!(
                    place_id = place.id,
                    error = %e,
                    "open-status check failed, using static flag"
                );
                place.static_open()
            }
        };

        OpenStatusEntry {
            place_id: place.id,
            is_open: Some(is_open),
            loading: false,
            last_checked_at: Some(self.clock.now()),
        }
    }

    /// Live status of the place's first location, `None` if it has none.
    async fn live_status(&self, place: &Place) -> Result<Option<bool>, D::Error> {
        let locations = self.directory.locations_for(place.id).await?;
        match locations.first() {
            Some(first) => self.directory.is_location_open_now(first.id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Refreshes `places` now and then every `refresh_interval` on a
    /// background task.
    ///
    /// Replacing the place list through [`RefreshHandle::set_places`]
    /// triggers an immediate refresh. Dropping the handle stops the task,
    /// including a pass in progress.
    pub fn spawn_refresh(self: &Arc<Self>, places: Vec<Place>) -> RefreshHandle {
        let (places_tx, mut places_rx) = watch::channel(places);
        let (passes_tx, passes_rx) = watch::channel(0_u64);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let cache = Arc::clone(self);
        // `interval` panics on a zero period.
        let period = self.config.refresh_interval.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                    changed = places_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        ticker.reset();
                    }
                }

                let current = places_rx.borrow_and_update().clone();
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    () = cache.refresh_all(&current) => {}
                }
                if !current.is_empty() {
                    passes_tx.send_modify(|passes| *passes += 1);
                }
            }
            tracing::debug!("open-status refresh stopped");
        });

        RefreshHandle {
            places: places_tx,
            passes: passes_rx,
            _guard: token.drop_guard(),
        }
    }
}

/// Clears the `loading` flag of a batch's entries when dropped, so a pass
/// cancelled mid-batch leaves no entry stuck loading.
struct PendingBatch<'a> {
    entries: &'a RwLock<HashMap<i64, OpenStatusEntry>>,
    place_ids: Vec<i64>,
}

impl Drop for PendingBatch<'_> {
    fn drop(&mut self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for id in &self.place_ids {
            if let Some(entry) = entries.get_mut(id) {
                entry.loading = false;
            }
        }
    }
}

/// Controls a background refresh started by
/// [`OpenStatusCache::spawn_refresh`].
#[derive(Debug)]
pub struct RefreshHandle {
    places: watch::Sender<Vec<Place>>,
    passes: watch::Receiver<u64>,
    _guard: DropGuard,
}

impl RefreshHandle {
    /// Replaces the tracked places and refreshes them right away.
    pub fn set_places(&self, places: Vec<Place>) {
        self.places.send_replace(places);
    }

    /// Count of completed passes over a non-empty place list. Changes each
    /// time fresh statuses land in the cache.
    #[must_use]
    pub fn passes(&self) -> watch::Receiver<u64> {
        self.passes.clone()
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
