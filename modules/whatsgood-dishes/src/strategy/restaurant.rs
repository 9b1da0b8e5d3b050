use std::sync::Arc;

use tracing::debug;

use crate::category::Category;
use crate::error::Result;
use crate::filter::RestaurantId;
use crate::normalize::RawDishes;
use crate::traits::DishSource;

/// Reads every dish of one restaurant, optionally narrowed to a category.
/// Computes no aggregates.
pub struct RestaurantScopedStrategy {
    source: Arc<dyn DishSource>,
}

impl RestaurantScopedStrategy {
    pub fn new(source: Arc<dyn DishSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(
        &self,
        restaurant_id: &RestaurantId,
        category: Option<Category>,
    ) -> Result<RawDishes> {
        debug!(
            restaurant_id = %restaurant_id,
            category = category.map(Category::id),
            "Fetching restaurant dishes"
        );
        let rows = self.source.restaurant_dishes(restaurant_id, category).await?;
        Ok(RawDishes::RestaurantScoped(rows))
    }
}
