use serde::{Deserialize, Deserializer, Serialize};

// --- Canonical output ---

/// One dish as the feed presents it.
///
/// Ranking fields are authoritative when the record came from the ranking
/// procedure and zero when it came from a restaurant-scoped read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub dish_id: String,
    pub dish_name: String,
    pub restaurant_name: String,
    pub category: String,
    pub price: Option<f64>,
    pub photo_url: Option<String>,
    pub total_votes: i64,
    pub yes_votes: i64,
    pub percent_worth_it: f64,
    pub distance_miles: f64,
}

// --- get_ranked_dishes ---

/// Parameters for the `get_ranked_dishes` procedure, serialized verbatim as
/// its JSON argument object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDishesParams {
    pub user_lat: f64,
    pub user_lng: f64,
    pub radius_miles: f64,
    pub filter_category: Option<String>,
}

/// A row returned by `get_ranked_dishes`, already aggregated and ordered
/// server-side. Aggregates may come back `null` for dishes nobody voted on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankedDishRow {
    #[serde(deserialize_with = "string_or_number")]
    pub dish_id: String,
    pub dish_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub restaurant_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_votes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub yes_votes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub percent_worth_it: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance_miles: f64,
}

// --- dishes ⋈ restaurants ---

/// A `dishes` row with its restaurant embedded under `restaurants`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RestaurantDishRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub restaurant_id: String,
    #[serde(default)]
    pub restaurants: Option<RestaurantRef>,
}

/// The embedded restaurant on a dish row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RestaurantRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

// --- restaurant directory ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ids are uuids in practice but bigint keys are accepted too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}
