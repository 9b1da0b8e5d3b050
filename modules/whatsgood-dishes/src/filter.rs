use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{DataAccessError, Result};

/// A point supplied by whoever owns geolocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(DataAccessError::invalid(format!(
                "Latitude out of range: {}",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(DataAccessError::invalid(format!(
                "Longitude out of range: {}",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Opaque restaurant identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Trims the input; a blank id is no id at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything that decides what the dish feed shows.
///
/// Owned by the caller. Any field differing from the previous snapshot counts
/// as a new query.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// `None` until geolocation has produced a fix.
    pub location: Option<Location>,
    pub radius_miles: f64,
    /// `None` means all categories.
    pub category: Option<Category>,
    /// When set, the feed is scoped to this restaurant and location/radius
    /// are ignored.
    pub restaurant_id: Option<RestaurantId>,
}

impl FilterState {
    pub fn new(radius_miles: f64) -> Self {
        Self {
            location: None,
            radius_miles,
            category: None,
            restaurant_id: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_restaurant(mut self, restaurant_id: RestaurantId) -> Self {
        self.restaurant_id = Some(restaurant_id);
        self
    }

    pub fn is_restaurant_scoped(&self) -> bool {
        self.restaurant_id.is_some()
    }
}
