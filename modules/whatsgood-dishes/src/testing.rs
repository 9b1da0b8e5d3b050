// In-memory DishSource for tests.
//
// Behaves like the Supabase store where it matters to callers: restaurant
// reads filter by exact category, the directory comes back ordered by name,
// ranked rows come back in registration order. Every call is recorded, calls
// can be made to fail, and individual calls can be held behind a gate to
// force out-of-order completion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::category::Category;
use crate::error::{DataAccessError, Result};
use crate::filter::RestaurantId;
use crate::traits::DishSource;
use crate::types::{
    RankedDishRow, RankedDishesParams, RestaurantDishRow, RestaurantRef, RestaurantSummary,
};

/// One recorded call into the source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    RestaurantDishes {
        restaurant_id: String,
        category: Option<String>,
    },
    RankedDishes(RankedDishesParams),
    Restaurants,
}

#[derive(Default)]
struct Inner {
    restaurant_dishes: HashMap<String, Vec<RestaurantDishRow>>,
    /// Keyed by `filter_category`; `None` is the "all" ranking.
    ranked: HashMap<Option<String>, Vec<RankedDishRow>>,
    restaurants: Vec<RestaurantSummary>,
    restaurant_failure: Option<DataAccessError>,
    ranked_failure: Option<DataAccessError>,
    directory_failure: Option<DataAccessError>,
    ranked_gates: HashMap<Option<String>, Arc<Notify>>,
    restaurant_gates: HashMap<String, Arc<Notify>>,
    calls: Vec<SourceCall>,
}

pub struct MockDishSource {
    inner: Mutex<Inner>,
}

impl Default for MockDishSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDishSource {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn on_restaurant_dishes(&self, restaurant_id: &str, rows: Vec<RestaurantDishRow>) {
        self.lock()
            .restaurant_dishes
            .insert(restaurant_id.to_string(), rows);
    }

    pub fn on_ranked(&self, category: Option<Category>, rows: Vec<RankedDishRow>) {
        self.lock()
            .ranked
            .insert(category.map(|c| c.id().to_string()), rows);
    }

    pub fn on_restaurants(&self, restaurants: Vec<RestaurantSummary>) {
        self.lock().restaurants = restaurants;
    }

    pub fn fail_restaurant_dishes(&self, error: Option<DataAccessError>) {
        self.lock().restaurant_failure = error;
    }

    pub fn fail_ranked(&self, error: Option<DataAccessError>) {
        self.lock().ranked_failure = error;
    }

    pub fn fail_restaurants(&self, error: Option<DataAccessError>) {
        self.lock().directory_failure = error;
    }

    /// Hold ranked calls for `category` until the returned gate is notified.
    /// Each `notify_one` releases one call.
    pub fn gate_ranked(&self, category: Option<Category>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock()
            .ranked_gates
            .insert(category.map(|c| c.id().to_string()), gate.clone());
        gate
    }

    /// Hold restaurant reads for `restaurant_id` until the gate is notified.
    pub fn gate_restaurant(&self, restaurant_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock()
            .restaurant_gates
            .insert(restaurant_id.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.lock().calls.clone()
    }

    pub fn ranked_calls(&self) -> Vec<RankedDishesParams> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SourceCall::RankedDishes(params) => Some(params),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl DishSource for MockDishSource {
    async fn restaurant_dishes(
        &self,
        restaurant_id: &RestaurantId,
        category: Option<Category>,
    ) -> Result<Vec<RestaurantDishRow>> {
        let gate = {
            let mut inner = self.lock();
            inner.calls.push(SourceCall::RestaurantDishes {
                restaurant_id: restaurant_id.to_string(),
                category: category.map(|c| c.id().to_string()),
            });
            inner.restaurant_gates.get(restaurant_id.as_str()).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let inner = self.lock();
        if let Some(err) = &inner.restaurant_failure {
            return Err(err.clone());
        }
        let rows = inner
            .restaurant_dishes
            .get(restaurant_id.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(match category {
            Some(category) => rows
                .into_iter()
                .filter(|row| row.category == category.id())
                .collect(),
            None => rows,
        })
    }

    async fn ranked_dishes(&self, params: &RankedDishesParams) -> Result<Vec<RankedDishRow>> {
        let gate = {
            let mut inner = self.lock();
            inner.calls.push(SourceCall::RankedDishes(params.clone()));
            inner.ranked_gates.get(&params.filter_category).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let inner = self.lock();
        if let Some(err) = &inner.ranked_failure {
            return Err(err.clone());
        }
        Ok(inner
            .ranked
            .get(&params.filter_category)
            .cloned()
            .unwrap_or_default())
    }

    async fn restaurants(&self) -> Result<Vec<RestaurantSummary>> {
        let mut inner = self.lock();
        inner.calls.push(SourceCall::Restaurants);
        if let Some(err) = &inner.directory_failure {
            return Err(err.clone());
        }
        let mut restaurants = inner.restaurants.clone();
        restaurants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(restaurants)
    }
}

// ---------------------------------------------------------------------------
// Row builders
// ---------------------------------------------------------------------------

/// A dish row at `restaurant_id` with the restaurant embedded.
pub fn restaurant_dish(
    id: &str,
    category: &str,
    restaurant_id: &str,
    restaurant_name: &str,
) -> RestaurantDishRow {
    RestaurantDishRow {
        id: id.to_string(),
        name: format!("Dish {id}"),
        category: category.to_string(),
        price: Some(15.0),
        photo_url: Some(format!("https://images.example/{id}.jpg")),
        restaurant_id: restaurant_id.to_string(),
        restaurants: Some(RestaurantRef {
            id: restaurant_id.to_string(),
            name: restaurant_name.to_string(),
            address: Some("12 Harbor St".to_string()),
            lat: Some(41.52),
            lng: Some(-70.67),
        }),
    }
}

/// A ranked row with the given aggregates.
pub fn ranked_dish(id: &str, category: &str, percent_worth_it: f64, total_votes: i64) -> RankedDishRow {
    RankedDishRow {
        dish_id: id.to_string(),
        dish_name: format!("Dish {id}"),
        restaurant_name: format!("Restaurant of {id}"),
        category: category.to_string(),
        price: Some(18.0),
        photo_url: None,
        total_votes,
        yes_votes: (total_votes as f64 * percent_worth_it / 100.0).round() as i64,
        percent_worth_it,
        distance_miles: 1.5,
    }
}

pub fn restaurant(id: &str, name: &str) -> RestaurantSummary {
    RestaurantSummary {
        id: id.to_string(),
        name: name.to_string(),
    }
}
