pub mod category;
pub mod config;
pub mod directory;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod query;
pub mod router;
pub mod store;
pub mod strategy;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod types;

pub use category::Category;
pub use config::{Config, ConfigError, QueryConfig};
pub use directory::RestaurantDirectory;
pub use error::{DataAccessError, DataAccessKind, Result};
pub use filter::{FilterState, Location, RestaurantId};
pub use normalize::{normalize, RawDishes};
pub use query::{DishQuery, QueryResult, QueryStatus};
pub use router::{FetchPlan, QueryRouter};
pub use store::SupabaseDishSource;
pub use traits::DishSource;
pub use types::{Dish, RankedDishRow, RankedDishesParams, RestaurantDishRow, RestaurantSummary};
