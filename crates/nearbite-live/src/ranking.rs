//! Ranking with a remote open-status source.

use futures::future::{join_all, try_join_all};
use nearbite_core::{base_order, prioritize_open, Coordinate, Place, RankedPlace};

use crate::directory::PlaceDirectory;
use crate::location::{resolve_location, LocationProvider};

/// Open status of a restaurant for listing purposes.
///
/// A static flag on the record wins. Otherwise the restaurant is open when
/// any of its locations reports open. No locations, or any failed lookup,
/// counts as closed.
pub async fn restaurant_open_status<D>(directory: &D, place: &Place) -> bool
where
    D: PlaceDirectory + ?Sized,
{
    if let Some(open) = place.is_open {
        return open;
    }
    match any_location_open(directory, place.id).await {
        Ok(open) => open,
        Err(e) => {
            tracing::warn!(
                restaurant_id = place.id,
                error = %e,
                "location status lookup failed, treating as closed"
            );
            false
        }
    }
}

async fn any_location_open<D>(directory: &D, restaurant_id: i64) -> Result<bool, D::Error>
where
    D: PlaceDirectory + ?Sized,
{
    let locations = directory.locations_for(restaurant_id).await?;
    if locations.is_empty() {
        return Ok(false);
    }
    let statuses =
        try_join_all(locations.iter().map(|l| directory.is_location_open_now(l.id))).await?;
    Ok(statuses.into_iter().any(|open| open))
}

/// Full ranking pass with statuses fetched concurrently from `directory`.
///
/// Status lookups run for surviving candidates only; the result order
/// matches [`nearbite_core::rank`] for the same statuses.
pub async fn rank_live<D>(
    directory: &D,
    places: Vec<Place>,
    user_location: Option<Coordinate>,
    radius_km: Option<f64>,
) -> Vec<RankedPlace>
where
    D: PlaceDirectory + ?Sized,
{
    let candidates = base_order(places, user_location, radius_km);
    let statuses = join_all(
        candidates
            .iter()
            .map(|c| restaurant_open_status(directory, &c.place)),
    )
    .await;
    prioritize_open(candidates.into_iter().zip(statuses).collect())
}

/// Restaurants in a category, ranked around the user's position if one is
/// available.
///
/// # Errors
///
/// Returns the directory error if the category listing itself fails.
pub async fn category_listing<D, L>(
    directory: &D,
    locator: &L,
    category_id: i64,
    radius_km: Option<f64>,
) -> Result<Vec<RankedPlace>, D::Error>
where
    D: PlaceDirectory + ?Sized,
    L: LocationProvider + ?Sized,
{
    let location = resolve_location(locator).await;
    let places = directory.by_category(category_id).await?;
    tracing::debug!(
        category_id,
        count = places.len(),
        located = location.is_some(),
        "ranking category listing"
    );
    Ok(rank_live(directory, places, location, radius_km).await)
}
