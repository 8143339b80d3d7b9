//! `hours` command: weekly schedule of each location of a restaurant.

use nearbite_api::ApiClient;
use nearbite_core::{group_week, Clock, ScheduleGroup, SystemClock};
use nearbite_live::PlaceDirectory;

/// One display line for a schedule group, marking the group containing today.
pub(crate) fn format_group(group: &ScheduleGroup) -> String {
    let marker = if group.includes_today { "*" } else { " " };
    format!(
        "{marker} {label:<9} {hours}",
        label = group.day_range_label,
        hours = group.schedule.display_hours(),
    )
}

/// Prints each active location with grouped hours and its open status.
///
/// Open status is computed locally from the hours and then confirmed
/// against the backend; a failed confirmation is logged and skipped.
///
/// # Errors
///
/// Returns an error if the restaurant or its locations cannot be fetched.
pub(crate) async fn run_hours(client: &ApiClient, restaurant_id: i64) -> anyhow::Result<()> {
    let Some(restaurant) = client.by_id(restaurant_id).await? else {
        anyhow::bail!("restaurant {restaurant_id} not found");
    };
    let locations = client.restaurant_locations(restaurant_id).await?;
    let now = SystemClock.now();

    println!("{}", restaurant.name);
    if locations.is_empty() {
        println!("  no active locations");
        return Ok(());
    }

    for location in &locations {
        let place = location.to_place();
        println!();
        println!(
            "  {}",
            location.address.as_deref().unwrap_or(place.name.as_str())
        );

        let Some(schedule) = place.schedule.as_ref() else {
            println!("    hours not available");
            continue;
        };
        for group in group_week(schedule, &now) {
            println!("    {}", format_group(&group));
        }

        let local = place.open_status_at(&now);
        let live = match client.location_open_now(location.id).await {
            Ok(open) => Some(open),
            Err(e) => {
                tracing::warn!(location_id = location.id, error = %e, "live status check failed");
                None
            }
        };
        let status = match live {
            Some(true) => "open now",
            Some(false) => "closed now",
            None if local => "open now (by posted hours)",
            None => "closed now (by posted hours)",
        };
        println!("    {status}");
    }
    Ok(())
}
