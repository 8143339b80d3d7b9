//! Conversion of API records into ranking [`Place`]s.

use nearbite_core::{Coordinate, Place};

use crate::types::{Restaurant, RestaurantLocation};

impl Restaurant {
    /// Restaurant-level place. Restaurants carry no weekly schedule, so open
    /// status falls back to the static `isOpen` flag unless a live check is
    /// made.
    #[must_use]
    pub fn to_place(&self) -> Place {
        Place {
            id: self.id,
            name: self.name.clone(),
            coordinate: Coordinate::new(self.latitude, self.longitude),
            schedule: None,
            rating: self.rating,
            is_open: self.is_open,
            cuisine: self.cuisine.clone(),
            description: self.description.clone(),
        }
    }
}

impl RestaurantLocation {
    /// Location-level place carrying the weekly operating hours.
    ///
    /// Named after the owning restaurant when embedded, otherwise after the
    /// street address, otherwise `"Location <id>"`.
    #[must_use]
    pub fn to_place(&self) -> Place {
        let name = self
            .restaurant
            .as_ref()
            .map(|r| r.name.clone())
            .or_else(|| self.address.clone())
            .unwrap_or_else(|| format!("Location {}", self.id));

        Place {
            id: self.id,
            name,
            coordinate: Coordinate::new(self.latitude, self.longitude),
            schedule: self.operating_hours.clone(),
            rating: None,
            is_open: self.is_currently_open,
            cuisine: None,
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use nearbite_core::{DaySchedule, WeeklySchedule};

    use super::*;
    use crate::types::RestaurantRef;

    fn location(restaurant: Option<RestaurantRef>, address: Option<&str>) -> RestaurantLocation {
        RestaurantLocation {
            id: 7,
            active: true,
            address: address.map(str::to_owned),
            phone: None,
            latitude: 40.7,
            longitude: -73.9,
            operating_hours: Some(WeeklySchedule::uniform(&DaySchedule::new("09:00", "17:00"))),
            restaurant,
            is_currently_open: Some(true),
        }
    }

    #[test]
    fn restaurant_to_place_keeps_rating_and_static_flag() {
        let restaurant = Restaurant {
            id: 1,
            name: "The Burger Joint".to_owned(),
            active: true,
            latitude: 40.7489,
            longitude: -73.9857,
            rating: Some(4.8),
            is_open: Some(false),
            cuisine: Some("American".to_owned()),
            description: Some("Smash burgers".to_owned()),
            address: None,
            category: None,
        };

        let place = restaurant.to_place();

        assert_eq!(place.id, 1);
        assert_eq!(place.rating, Some(4.8));
        assert_eq!(place.is_open, Some(false));
        assert!(place.schedule.is_none());
        assert!(place.matches_text("smash"));
        assert!(place.matches_text("american"));
        assert_eq!(place.coordinate, Coordinate::new(40.7489, -73.9857));
    }

    #[test]
    fn location_to_place_prefers_restaurant_name() {
        let loc = location(
            Some(RestaurantRef {
                id: 1,
                name: "Sakura Sushi".to_owned(),
            }),
            Some("456 East 42nd St"),
        );

        let place = loc.to_place();

        assert_eq!(place.name, "Sakura Sushi");
        assert!(place.schedule.is_some());
        assert_eq!(place.is_open, Some(true));
    }

    #[test]
    fn location_to_place_falls_back_to_address_then_id() {
        assert_eq!(location(None, Some("789 Little Italy St")).to_place().name, "789 Little Italy St");
        assert_eq!(location(None, None).to_place().name, "Location 7");
    }
}
