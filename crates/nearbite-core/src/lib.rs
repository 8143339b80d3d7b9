//! Geo-proximity ranking for restaurant discovery.
//!
//! Pure, synchronous building blocks: haversine distance, weekly schedule
//! resolution, and the proximity ranker, plus configuration loading shared
//! by the async crates.

pub mod app_config;
pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod place;
pub mod rank;
pub mod schedule;

pub use app_config::{AppConfig, Environment};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, LocationError};
pub use geo::{distance_km, format_distance, Coordinate};
pub use place::{Place, RankedPlace};
pub use rank::{base_order, nearest, prioritize_open, rank, Candidate, RankFilters};
pub use schedule::{
    current_day_key, day_abbrev, group_week, is_open_now, schedules_equal, DaySchedule,
    ScheduleGroup, WeeklySchedule,
};
