//! Async side of proximity ranking.
//!
//! Provider seams ([`PlaceDirectory`], [`LocationProvider`]) plus the
//! components that talk to them: live ranking, the open-status cache, the
//! nearby feed, and position watching.

pub mod directory;
pub mod feed;
pub mod location;
pub mod ranking;
pub mod status;

#[cfg(test)]
mod testing;

pub use directory::PlaceDirectory;
pub use feed::{AutoRefreshHandle, FeedConfig, FeedState, NearbyFeed, LOCATION_UNAVAILABLE};
pub use location::{
    resolve_location, watch_position, FixedLocation, LocationProvider, NoLocation, WatchHandle,
    WatchOptions,
};
pub use ranking::{category_listing, rank_live, restaurant_open_status};
pub use status::{OpenStatusCache, OpenStatusEntry, RefreshHandle, StatusCacheConfig};
