//! Typed client for the restaurant discovery REST API.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{Category, Restaurant, RestaurantLocation, RestaurantRef};
