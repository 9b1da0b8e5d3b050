pub mod ranked;
pub mod restaurant;

pub use ranked::RadiusRankedStrategy;
pub use restaurant::RestaurantScopedStrategy;
