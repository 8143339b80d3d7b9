//! Place records consumed and produced by ranking.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::schedule::{is_open_now, WeeklySchedule};

/// A restaurant or one physical location of a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub coordinate: Coordinate,
    /// Weekly operating hours. When absent, open status comes from `is_open`.
    #[serde(default)]
    pub schedule: Option<WeeklySchedule>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Static open flag, used only as a fallback.
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Place {
    #[must_use]
    pub fn new(id: i64, name: &str, coordinate: Coordinate) -> Self {
        Self {
            id,
            name: name.to_owned(),
            coordinate,
            schedule: None,
            rating: None,
            is_open: None,
            cuisine: None,
            description: None,
        }
    }

    /// Case-insensitive substring match on name, cuisine, or description.
    /// A blank needle matches everything.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(self.name.as_str()),
            self.cuisine.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Static fallback open flag, `false` when unknown.
    #[must_use]
    pub fn static_open(&self) -> bool {
        self.is_open.unwrap_or(false)
    }

    /// Open status derived locally from the schedule, or the static flag.
    #[must_use]
    pub fn open_status_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        is_open_now(self.schedule.as_ref(), now, self.static_open())
    }
}

/// A place annotated for display by a ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlace {
    pub place: Place,
    /// `None` when ranking ran without a user location.
    pub distance_km: Option<f64>,
    /// `"Unknown"` when `distance_km` is `None`.
    pub formatted_distance: String,
    pub is_open: bool,
}
