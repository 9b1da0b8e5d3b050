use std::sync::Arc;

use tracing::debug;

use crate::category::Category;
use crate::error::{DataAccessError, Result};
use crate::filter::Location;
use crate::normalize::RawDishes;
use crate::traits::DishSource;
use crate::types::RankedDishesParams;

/// Hands location, radius and category to the ranking procedure and returns
/// whatever it ranked, untouched.
pub struct RadiusRankedStrategy {
    source: Arc<dyn DishSource>,
}

impl RadiusRankedStrategy {
    pub fn new(source: Arc<dyn DishSource>) -> Self {
        Self { source }
    }

    /// Validate and marshal the procedure arguments. Nothing is sent when
    /// this fails.
    pub fn params(
        location: Location,
        radius_miles: f64,
        category: Option<Category>,
    ) -> Result<RankedDishesParams> {
        location.validate()?;
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(DataAccessError::invalid(format!(
                "Search radius must be a positive number of miles, got {radius_miles}"
            )));
        }
        Ok(RankedDishesParams {
            user_lat: location.lat,
            user_lng: location.lng,
            radius_miles,
            filter_category: category.map(|c| c.id().to_string()),
        })
    }

    pub async fn fetch(
        &self,
        location: Location,
        radius_miles: f64,
        category: Option<Category>,
    ) -> Result<RawDishes> {
        let params = Self::params(location, radius_miles, category)?;
        debug!(
            lat = params.user_lat,
            lng = params.user_lng,
            radius_miles = params.radius_miles,
            category = params.filter_category.as_deref(),
            "Fetching ranked dishes"
        );
        let rows = self.source.ranked_dishes(&params).await?;
        Ok(RawDishes::RadiusRanked(rows))
    }
}
