use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::filter::RestaurantId;
use crate::traits::DishSource;
use crate::types::RestaurantSummary;

/// Most matches a search returns.
pub const MAX_MATCHES: usize = 5;

/// The restaurant list behind the restaurant picker. Loaded once, searched
/// locally.
#[derive(Debug, Clone, Default)]
pub struct RestaurantDirectory {
    restaurants: Vec<RestaurantSummary>,
}

impl RestaurantDirectory {
    pub async fn load(source: Arc<dyn DishSource>) -> Result<Self> {
        let restaurants = source.restaurants().await?;
        info!(count = restaurants.len(), "Loaded restaurant directory");
        Ok(Self { restaurants })
    }

    pub fn from_restaurants(restaurants: Vec<RestaurantSummary>) -> Self {
        Self { restaurants }
    }

    /// All restaurants, in the store's name order.
    pub fn all(&self) -> &[RestaurantSummary] {
        &self.restaurants
    }

    /// Case-insensitive substring match on the name, at most [`MAX_MATCHES`].
    /// An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&RestaurantSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.restaurants
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .take(MAX_MATCHES)
            .collect()
    }

    pub fn get(&self, id: &RestaurantId) -> Option<&RestaurantSummary> {
        self.restaurants.iter().find(|r| r.id == id.as_str())
    }
}
