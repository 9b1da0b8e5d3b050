//! The single place canonical [`Dish`] records are produced.

use crate::types::{Dish, RankedDishRow, RestaurantDishRow};

/// Raw output of one strategy. A fetch produces exactly one variant, so a
/// normalized result set can never mix both shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDishes {
    RestaurantScoped(Vec<RestaurantDishRow>),
    RadiusRanked(Vec<RankedDishRow>),
}

impl RawDishes {
    pub fn len(&self) -> usize {
        match self {
            RawDishes::RestaurantScoped(rows) => rows.len(),
            RawDishes::RadiusRanked(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map a strategy's rows onto canonical dishes, preserving order.
pub fn normalize(raw: RawDishes) -> Vec<Dish> {
    match raw {
        RawDishes::RestaurantScoped(rows) => rows.into_iter().map(from_restaurant_row).collect(),
        RawDishes::RadiusRanked(rows) => rows.into_iter().map(from_ranked_row).collect(),
    }
}

/// Restaurant-scoped reads carry no aggregates, so every ranking field is
/// zero. A row whose restaurant failed to embed keeps an empty name.
pub fn from_restaurant_row(row: RestaurantDishRow) -> Dish {
    Dish {
        dish_id: row.id,
        dish_name: row.name,
        restaurant_name: row.restaurants.map(|r| r.name).unwrap_or_default(),
        category: row.category,
        price: row.price,
        photo_url: row.photo_url,
        total_votes: 0,
        yes_votes: 0,
        percent_worth_it: 0.0,
        distance_miles: 0.0,
    }
}

pub fn from_ranked_row(row: RankedDishRow) -> Dish {
    Dish {
        dish_id: row.dish_id,
        dish_name: row.dish_name,
        restaurant_name: row.restaurant_name,
        category: row.category,
        price: row.price,
        photo_url: row.photo_url,
        total_votes: row.total_votes,
        yes_votes: row.yes_votes,
        percent_worth_it: row.percent_worth_it,
        distance_miles: row.distance_miles,
    }
}
