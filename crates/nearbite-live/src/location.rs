//! User position providers.
//!
//! A [`LocationProvider`] answers "where is the user now". The CLI uses
//! [`FixedLocation`] built from command-line coordinates; tests script
//! positions directly. [`watch_position`] polls a provider and reports
//! movement beyond a distance threshold.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nearbite_core::{distance_km, Coordinate, LocationError};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// One-shot position request.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] when the position cannot be determined.
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// Always fails with the given error.
#[derive(Debug, Clone)]
pub struct NoLocation(pub LocationError);

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(self.0.clone())
    }
}

/// Asks `provider` for a position, degrading failures to `None`.
///
/// Ranking without a location is a supported mode, so errors are logged and
/// swallowed here rather than propagated.
pub async fn resolve_location<P>(provider: &P) -> Option<Coordinate>
where
    P: LocationProvider + ?Sized,
{
    match provider.current_position().await {
        Ok(position) => Some(position),
        Err(e) => {
            tracing::warn!(error = %e, "location unavailable, ranking without position");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Time between position polls.
    pub interval: Duration,
    /// Minimum movement, in metres, before the callback fires again.
    pub min_distance_m: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            min_distance_m: 100.0,
        }
    }
}

/// Stops the watch task when dropped.
#[derive(Debug)]
pub struct WatchHandle {
    _guard: DropGuard,
}

/// Polls `provider` every `options.interval` and calls `on_change` with the
/// first position and with every later position at least
/// `options.min_distance_m` away from the last reported one.
///
/// Must be called inside a Tokio runtime.
pub fn watch_position<P, F>(provider: Arc<P>, options: WatchOptions, mut on_change: F) -> WatchHandle
where
    P: LocationProvider + ?Sized + 'static,
    F: FnMut(Coordinate) + Send + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_reported: Option<Coordinate> = None;

        loop {
            tokio::select! {
                () = cancelled.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let position = match provider.current_position().await {
                Ok(position) => position,
                Err(e) => {
                    tracing::warn!(error = %e, "position watch poll failed");
                    continue;
                }
            };

            let moved = last_reported.is_none_or(|prev| {
                distance_km(prev, position) * 1000.0 >= options.min_distance_m
            });
            if moved {
                tracing::debug!(%position, "position changed");
                last_reported = Some(position);
                on_change(position);
            }
        }
        tracing::debug!("position watch stopped");
    });

    WatchHandle {
        _guard: token.drop_guard(),
    }
}
