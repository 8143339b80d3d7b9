//! Restaurant API response types.
//!
//! The API wraps most payloads in a `{"success": true, "data": ...}`
//! envelope, but some deployments return the bare payload. The client
//! unwraps either shape before deserializing into these types.

use nearbite_core::WeeklySchedule;
use serde::Deserialize;

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// A restaurant as returned by the list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    #[serde(default = "active_by_default")]
    pub active: bool,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Static open flag precomputed by the backend.
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// The owning restaurant embedded in a location record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestaurantRef {
    pub id: i64,
    pub name: String,
}

/// One physical location of a restaurant, with its weekly hours.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantLocation {
    pub id: i64,
    #[serde(default = "active_by_default")]
    pub active: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub operating_hours: Option<WeeklySchedule>,
    #[serde(default)]
    pub restaurant: Option<RestaurantRef>,
    #[serde(default)]
    pub is_currently_open: Option<bool>,
}

/// Body of the per-location open-status endpoint.
///
/// Accepts `true`, `{"isOpen": true}`, or `{"isCurrentlyOpen": true}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OpenStatusPayload {
    Flag(bool),
    Object {
        #[serde(rename = "isOpen", alias = "isCurrentlyOpen")]
        is_open: bool,
    },
}

impl OpenStatusPayload {
    pub(crate) fn is_open(&self) -> bool {
        match self {
            Self::Flag(open) | Self::Object { is_open: open } => *open,
        }
    }
}
