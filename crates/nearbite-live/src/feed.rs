//! Nearby feed: the user's position, the places around it, and load state.
//!
//! Every transition publishes a fresh [`FeedState`] on a watch channel.
//! Fetches are tagged with a generation number; a fetch that has been
//! superseded by a newer one never publishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nearbite_core::{base_order, AppConfig, Clock, Coordinate, RankedPlace};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::directory::PlaceDirectory;
use crate::location::{resolve_location, LocationProvider};

pub const LOCATION_UNAVAILABLE: &str = "Location not available";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// Places in ascending distance order.
    pub places: Vec<RankedPlace>,
    /// First load in progress.
    pub loading: bool,
    /// Reload in progress while previous places stay visible.
    pub refreshing: bool,
    pub error: Option<String>,
    pub location: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub radius_km: f64,
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            radius_km: 10.0,
            auto_refresh: true,
            refresh_interval: Duration::from_secs(30),
        }
    }
}

impl FeedConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            radius_km: config.search_radius_km,
            auto_refresh: true,
            refresh_interval: Duration::from_secs(config.feed_refresh_secs),
        }
    }
}

pub struct NearbyFeed<D: ?Sized, L: ?Sized> {
    directory: Arc<D>,
    locator: Arc<L>,
    clock: Arc<dyn Clock>,
    config: FeedConfig,
    state: watch::Sender<FeedState>,
    generation: AtomicU64,
}

impl<D, L> NearbyFeed<D, L>
where
    D: PlaceDirectory + ?Sized + 'static,
    L: LocationProvider + ?Sized + 'static,
{
    pub fn new(
        directory: Arc<D>,
        locator: Arc<L>,
        clock: Arc<dyn Clock>,
        config: FeedConfig,
    ) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            directory,
            locator,
            clock,
            config,
            state,
            generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Resolves the position and reloads nearby places.
    ///
    /// With `refreshing` set, the previous places stay in the state and the
    /// `refreshing` flag is raised instead of `loading`.
    pub async fn fetch(&self, refreshing: bool) {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(location) = resolve_location(&*self.locator).await else {
            self.publish(ticket, |prev| FeedState {
                loading: false,
                refreshing: false,
                error: Some(LOCATION_UNAVAILABLE.to_owned()),
                ..prev.clone()
            });
            return;
        };

        self.publish(ticket, |prev| FeedState {
            places: prev.places.clone(),
            loading: !refreshing,
            refreshing,
            error: None,
            location: Some(location),
        });

        let radius_km = self.config.radius_km;
        let next = match self.directory.nearby(location, radius_km).await {
            Ok(places) => {
                let now = self.clock.now();
                let ranked = base_order(places, Some(location), Some(radius_km))
                    .into_iter()
                    .map(|candidate| {
                        let is_open = candidate.place.open_status_at(&now);
                        candidate.into_ranked(is_open)
                    })
                    .collect::<Vec<_>>();
                tracing::debug!(count = ranked.len(), %location, "nearby feed loaded");
                FeedState {
                    places: ranked,
                    loading: false,
                    refreshing: false,
                    error: None,
                    location: Some(location),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "nearby feed fetch failed");
                FeedState {
                    places: Vec::new(),
                    loading: false,
                    refreshing: false,
                    error: Some(e.to_string()),
                    location: Some(location),
                }
            }
        };

        if !self.publish(ticket, |_| next) {
            tracing::debug!(ticket, "dropping superseded nearby feed result");
        }
    }

    /// Replaces the state unless a newer fetch has started since `ticket`.
    fn publish(&self, ticket: u64, next: impl FnOnce(&FeedState) -> FeedState) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *state = next(state);
            true
        })
    }

    /// Reloads every `refresh_interval` while a location is known.
    ///
    /// A tick is skipped while another fetch is in flight. Returns `None`
    /// when auto refresh is disabled. Dropping the handle stops the task.
    pub fn spawn_auto_refresh(self: &Arc<Self>) -> Option<AutoRefreshHandle> {
        if !self.config.auto_refresh {
            return None;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let feed = Arc::clone(self);
        let period = self.config.refresh_interval.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let state = feed.state();
                if state.location.is_none() || state.loading || state.refreshing {
                    tracing::debug!("skipping nearby feed auto refresh");
                    continue;
                }

                tokio::select! {
                    () = cancelled.cancelled() => break,
                    () = feed.fetch(true) => {}
                }
            }
            tracing::debug!("nearby feed auto refresh stopped");
        });

        Some(AutoRefreshHandle {
            _guard: token.drop_guard(),
        })
    }
}

/// Stops the auto-refresh task when dropped.
#[derive(Debug)]
pub struct AutoRefreshHandle {
    _guard: DropGuard,
}
