//! Listing commands: nearby, category, and categories.

use nearbite_api::{ApiClient, Restaurant};
use nearbite_core::{Coordinate, LocationError, RankFilters, RankedPlace};
use nearbite_live::{category_listing, rank_live, FixedLocation, NoLocation};

/// One display line for a ranked place.
pub(crate) fn format_row(ranked: &RankedPlace) -> String {
    let status = if ranked.is_open { "OPEN  " } else { "closed" };
    let rating = ranked
        .place
        .rating
        .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
    format!(
        "{status}  {distance:>8}  {rating:>4}  {name}",
        distance = ranked.formatted_distance,
        name = ranked.place.name,
    )
}

fn print_ranked(ranked: &[RankedPlace]) {
    if ranked.is_empty() {
        println!("no restaurants found");
        return;
    }
    for place in ranked {
        println!("{}", format_row(place));
    }
}

/// Restaurants around `location`, ranked open-first, then filtered.
///
/// # Errors
///
/// Returns an error if the nearby request fails. Per-restaurant status
/// lookups that fail are logged and count as closed.
pub(crate) async fn run_nearby(
    client: &ApiClient,
    location: Coordinate,
    radius_km: f64,
    category_id: Option<i64>,
    filters: &RankFilters,
) -> anyhow::Result<()> {
    let places: Vec<_> = client
        .nearby_restaurants_in_category(
            location.latitude,
            location.longitude,
            radius_km,
            category_id,
        )
        .await?
        .iter()
        .map(Restaurant::to_place)
        .collect();
    tracing::info!(count = places.len(), radius_km, "fetched nearby restaurants");

    let ranked = rank_live(client, places, Some(location), Some(radius_km)).await;
    print_ranked(&filters.apply(ranked));
    Ok(())
}

/// Backend text search, ranked around `location` when given.
///
/// # Errors
///
/// Returns an error if the search request fails.
pub(crate) async fn run_search(
    client: &ApiClient,
    text: &str,
    location: Option<Coordinate>,
) -> anyhow::Result<()> {
    let near = location.map(|c| (c.latitude, c.longitude));
    let places: Vec<_> = client
        .search_restaurants(text, near)
        .await?
        .iter()
        .map(Restaurant::to_place)
        .collect();
    tracing::info!(count = places.len(), text, "fetched search results");

    let ranked = rank_live(client, places, location, None).await;
    print_ranked(&ranked);
    Ok(())
}

/// Restaurants in one category, ranked around `location` when given.
///
/// # Errors
///
/// Returns an error if the category request fails.
pub(crate) async fn run_category(
    client: &ApiClient,
    category_id: i64,
    location: Option<Coordinate>,
    radius_km: f64,
    filters: &RankFilters,
) -> anyhow::Result<()> {
    let ranked = match location {
        Some(position) => {
            category_listing(client, &FixedLocation(position), category_id, Some(radius_km))
                .await?
        }
        None => {
            let locator = NoLocation(LocationError::PositionUnavailable);
            category_listing(client, &locator, category_id, None).await?
        }
    };
    print_ranked(&filters.apply(ranked));
    Ok(())
}

/// # Errors
///
/// Returns an error if the categories request fails.
pub(crate) async fn run_categories(client: &ApiClient) -> anyhow::Result<()> {
    let categories = client.categories().await?;
    if categories.is_empty() {
        println!("no categories found");
    }
    for category in categories {
        println!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}
