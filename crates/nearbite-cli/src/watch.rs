//! `watch` command: a self-refreshing nearby feed with cached live status.

use std::sync::Arc;

use nearbite_api::ApiClient;
use nearbite_core::{AppConfig, Clock, Coordinate, Place, SystemClock};
use nearbite_live::{
    FeedConfig, FeedState, FixedLocation, NearbyFeed, OpenStatusCache, StatusCacheConfig,
};

use crate::listing::format_row;

fn places_of(state: &FeedState) -> Vec<Place> {
    state.places.iter().map(|r| r.place.clone()).collect()
}

fn print_state(state: &FeedState, cache: &OpenStatusCache<ApiClient>) {
    println!();
    if let Some(error) = &state.error {
        println!("error: {error}");
        return;
    }
    if state.places.is_empty() {
        println!("no restaurants found");
        return;
    }
    for ranked in &state.places {
        let mut row = ranked.clone();
        let cached = cache.get(ranked.place.id);
        if let Some(open) = cached.is_open {
            row.is_open = open;
        }
        let pending = if cached.loading { " (checking)" } else { "" };
        println!("{}{pending}", format_row(&row));
    }
}

/// Runs the nearby feed and the status cache until ctrl-c.
///
/// The list is printed when the feed reloads and again when the cache has
/// checked the new places against the backend.
///
/// # Errors
///
/// Returns an error if the ctrl-c handler cannot be installed.
pub(crate) async fn run_watch(
    client: ApiClient,
    config: &AppConfig,
    location: Coordinate,
) -> anyhow::Result<()> {
    let directory = Arc::new(client);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let feed = Arc::new(NearbyFeed::new(
        Arc::clone(&directory),
        Arc::new(FixedLocation(location)),
        Arc::clone(&clock),
        FeedConfig::from_app_config(config),
    ));
    let cache = Arc::new(OpenStatusCache::new(
        directory,
        clock,
        StatusCacheConfig::from_app_config(config),
    ));

    let mut updates = feed.subscribe();
    let refresh = cache.spawn_refresh(Vec::new());
    let mut passes = refresh.passes();
    let _auto_refresh = feed.spawn_auto_refresh();
    tracing::info!(%location, radius_km = config.search_radius_km, "watching nearby restaurants");

    feed.fetch(false).await;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("interrupted, stopping watch");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.loading || state.refreshing {
                    continue;
                }
                refresh.set_places(places_of(&state));
                print_state(&state, &cache);
            }
            changed = passes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = feed.state();
                if !(state.loading || state.refreshing) {
                    print_state(&state, &cache);
                }
            }
        }
    }

    Ok(())
}
