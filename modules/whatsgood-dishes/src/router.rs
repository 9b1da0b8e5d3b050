use std::sync::Arc;

use crate::category::Category;
use crate::error::Result;
use crate::filter::{FilterState, Location, RestaurantId};
use crate::normalize::normalize;
use crate::strategy::{RadiusRankedStrategy, RestaurantScopedStrategy};
use crate::traits::DishSource;
use crate::types::Dish;

/// Which strategy a filter snapshot resolves to, with the arguments it gets.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan {
    /// Location and radius are ignored here but stay in the filter state.
    RestaurantScoped {
        restaurant_id: RestaurantId,
        category: Option<Category>,
    },
    RadiusRanked {
        location: Location,
        radius_miles: f64,
        category: Option<Category>,
    },
    /// No restaurant and no location yet: nothing can be fetched.
    AwaitingLocation,
}

impl FetchPlan {
    pub fn name(&self) -> &'static str {
        match self {
            FetchPlan::RestaurantScoped { .. } => "restaurant_scoped",
            FetchPlan::RadiusRanked { .. } => "radius_ranked",
            FetchPlan::AwaitingLocation => "awaiting_location",
        }
    }
}

/// Restaurant scope wins; otherwise rank around the location if there is one.
pub fn select(filters: &FilterState) -> FetchPlan {
    if let Some(restaurant_id) = &filters.restaurant_id {
        return FetchPlan::RestaurantScoped {
            restaurant_id: restaurant_id.clone(),
            category: filters.category,
        };
    }
    match filters.location {
        Some(location) => FetchPlan::RadiusRanked {
            location,
            radius_miles: filters.radius_miles,
            category: filters.category,
        },
        None => FetchPlan::AwaitingLocation,
    }
}

/// Runs a plan through its strategy and the normalizer.
pub struct QueryRouter {
    restaurant: RestaurantScopedStrategy,
    ranked: RadiusRankedStrategy,
}

impl QueryRouter {
    pub fn new(source: Arc<dyn DishSource>) -> Self {
        Self {
            restaurant: RestaurantScopedStrategy::new(source.clone()),
            ranked: RadiusRankedStrategy::new(source),
        }
    }

    /// `AwaitingLocation` resolves to no dishes without touching the store;
    /// callers are expected to short-circuit before getting here.
    pub async fn execute(&self, plan: &FetchPlan) -> Result<Vec<Dish>> {
        let raw = match plan {
            FetchPlan::RestaurantScoped {
                restaurant_id,
                category,
            } => self.restaurant.fetch(restaurant_id, *category).await?,
            FetchPlan::RadiusRanked {
                location,
                radius_miles,
                category,
            } => self.ranked.fetch(*location, *radius_miles, *category).await?,
            FetchPlan::AwaitingLocation => return Ok(Vec::new()),
        };
        Ok(normalize(raw))
    }
}
