use std::sync::Arc;

use async_trait::async_trait;
use supabase_client::{SelectQuery, SupabaseClient};

use crate::category::Category;
use crate::error::Result;
use crate::filter::RestaurantId;
use crate::traits::DishSource;
use crate::types::{RankedDishRow, RankedDishesParams, RestaurantDishRow, RestaurantSummary};

const RANKING_PROCEDURE: &str = "get_ranked_dishes";

const DISH_COLUMNS: &str = "
    id,
    name,
    category,
    price,
    photo_url,
    restaurant_id,
    restaurants (
        id,
        name,
        address,
        lat,
        lng
    )";

/// [`DishSource`] backed by a Supabase project.
pub struct SupabaseDishSource {
    client: Arc<SupabaseClient>,
}

impl SupabaseDishSource {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    pub(crate) fn restaurant_dishes_query(
        restaurant_id: &RestaurantId,
        category: Option<Category>,
    ) -> SelectQuery {
        let query = SelectQuery::new("dishes")
            .columns(DISH_COLUMNS)
            .eq("restaurant_id", restaurant_id.as_str());
        match category {
            Some(category) => query.eq("category", category.id()),
            None => query,
        }
    }

    pub(crate) fn restaurants_query() -> SelectQuery {
        SelectQuery::new("restaurants")
            .columns("id, name")
            .order("name", true)
    }
}

#[async_trait]
impl DishSource for SupabaseDishSource {
    async fn restaurant_dishes(
        &self,
        restaurant_id: &RestaurantId,
        category: Option<Category>,
    ) -> Result<Vec<RestaurantDishRow>> {
        let query = Self::restaurant_dishes_query(restaurant_id, category);
        Ok(self.client.select(&query).await?)
    }

    async fn ranked_dishes(&self, params: &RankedDishesParams) -> Result<Vec<RankedDishRow>> {
        Ok(self.client.rpc(RANKING_PROCEDURE, params).await?)
    }

    async fn restaurants(&self) -> Result<Vec<RestaurantSummary>> {
        Ok(self.client.select(&Self::restaurants_query()).await?)
    }
}
