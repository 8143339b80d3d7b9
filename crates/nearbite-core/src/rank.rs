//! Proximity ranking.
//!
//! A ranking pass runs in four steps:
//! 1. radius filter (only with both a user location and a radius),
//! 2. base sort: distance with a location, rating then name without,
//! 3. open-status annotation,
//! 4. stable partition putting open places first.
//!
//! Steps 1-2 and step 4 are exposed separately ([`base_order`],
//! [`prioritize_open`]) so async callers can run step 3 against a remote
//! status source and still share the ordering rules.

use std::cmp::Ordering;

use crate::geo::{distance_km, format_distance, Coordinate};
use crate::place::{Place, RankedPlace};

const UNKNOWN_DISTANCE: &str = "Unknown";

/// A place that survived filtering, in base order, before status annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub place: Place,
    pub distance_km: Option<f64>,
}

impl Candidate {
    #[must_use]
    pub fn into_ranked(self, is_open: bool) -> RankedPlace {
        let formatted_distance = self
            .distance_km
            .map_or_else(|| UNKNOWN_DISTANCE.to_owned(), format_distance);
        RankedPlace {
            place: self.place,
            distance_km: self.distance_km,
            formatted_distance,
            is_open,
        }
    }
}

/// Client-side filters applied after ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankFilters {
    /// Drop places rated below this value. Unrated places count as `0`.
    pub min_rating: Option<f64>,
    pub open_only: bool,
    /// Keep places whose name, cuisine, or description contains this text,
    /// ignoring case.
    pub query: Option<String>,
}

impl RankFilters {
    #[must_use]
    pub fn matches(&self, ranked: &RankedPlace) -> bool {
        if self.open_only && !ranked.is_open {
            return false;
        }
        if let Some(query) = &self.query {
            if !ranked.place.matches_text(query) {
                return false;
            }
        }
        match self.min_rating {
            Some(min) => ranked.place.rating.unwrap_or(0.0) >= min,
            None => true,
        }
    }

    /// Keeps matching places, preserving order.
    #[must_use]
    pub fn apply(&self, ranked: Vec<RankedPlace>) -> Vec<RankedPlace> {
        ranked.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Full ranking pass with a synchronous open-status source.
pub fn rank<F>(
    places: Vec<Place>,
    user_location: Option<Coordinate>,
    radius_km: Option<f64>,
    mut open_status_of: F,
) -> Vec<RankedPlace>
where
    F: FnMut(&Place) -> bool,
{
    let annotated = base_order(places, user_location, radius_km)
        .into_iter()
        .map(|candidate| {
            let is_open = open_status_of(&candidate.place);
            (candidate, is_open)
        })
        .collect();
    prioritize_open(annotated)
}

/// Steps 1-2: radius filter and base sort.
///
/// With a location, places sort by ascending distance. Without one they sort
/// by descending rating (missing = `0`), then by case-sensitive name. Every
/// remaining tie keeps input order because the sort is stable.
#[must_use]
pub fn base_order(
    places: Vec<Place>,
    user_location: Option<Coordinate>,
    radius_km: Option<f64>,
) -> Vec<Candidate> {
    let Some(origin) = user_location else {
        let mut candidates: Vec<Candidate> = places
            .into_iter()
            .map(|place| Candidate {
                place,
                distance_km: None,
            })
            .collect();
        candidates.sort_by(|a, b| by_rating_then_name(&a.place, &b.place));
        return candidates;
    };

    let mut candidates: Vec<Candidate> = places
        .into_iter()
        .map(|place| {
            let d = distance_km(origin, place.coordinate);
            Candidate {
                place,
                distance_km: Some(d),
            }
        })
        .filter(|c| match (radius_km, c.distance_km) {
            (Some(radius), Some(d)) => d <= radius,
            _ => true,
        })
        .collect();

    candidates.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::INFINITY);
        let db = b.distance_km.unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });
    candidates
}

fn by_rating_then_name(a: &Place, b: &Place) -> Ordering {
    let ra = a.rating.unwrap_or(0.0);
    let rb = b.rating.unwrap_or(0.0);
    rb.total_cmp(&ra).then_with(|| a.name.cmp(&b.name))
}

/// Step 4: stable partition, open places first.
///
/// Relative order inside the open group and inside the closed group is the
/// input order. This is a partition, not a re-sort on any other key.
#[must_use]
pub fn prioritize_open(annotated: Vec<(Candidate, bool)>) -> Vec<RankedPlace> {
    let (open, closed): (Vec<_>, Vec<_>) = annotated.into_iter().partition(|(_, is_open)| *is_open);
    open.into_iter()
        .chain(closed)
        .map(|(candidate, is_open)| candidate.into_ranked(is_open))
        .collect()
}

/// The closest place to `user_location`, or `None` for an empty input.
#[must_use]
pub fn nearest(places: Vec<Place>, user_location: Coordinate) -> Option<Candidate> {
    base_order(places, Some(user_location), None).into_iter().next()
}

#[cfg(test)]
#[path = "rank_test.rs"]
mod tests;
