use async_trait::async_trait;

use crate::category::Category;
use crate::error::Result;
use crate::filter::RestaurantId;
use crate::types::{RankedDishRow, RankedDishesParams, RestaurantDishRow, RestaurantSummary};

/// Read access to the remote store. Injected into every strategy so tests can
/// substitute an in-memory source.
#[async_trait]
pub trait DishSource: Send + Sync {
    /// Dishes of one restaurant with the restaurant embedded, optionally
    /// restricted to an exact category match. No rows is not an error.
    async fn restaurant_dishes(
        &self,
        restaurant_id: &RestaurantId,
        category: Option<Category>,
    ) -> Result<Vec<RestaurantDishRow>>;

    /// Invoke the ranking procedure. Rows come back in the procedure's order.
    async fn ranked_dishes(&self, params: &RankedDishesParams) -> Result<Vec<RankedDishRow>>;

    /// Every restaurant as `{id, name}`, ordered by name.
    async fn restaurants(&self) -> Result<Vec<RestaurantSummary>>;
}
