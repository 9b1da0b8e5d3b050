use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use supabase_client::SupabaseClient;
use whatsgood_dishes::{
    Category, Config, Dish, DishQuery, DishSource, FilterState, Location, QueryConfig, QueryStatus,
    RestaurantDirectory, RestaurantId, SupabaseDishSource,
};

#[derive(Parser)]
#[command(name = "dishes", about = "Find dishes worth ordering nearby")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ranked dishes within a radius of a point
    Near {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in miles (defaults to WHATSGOOD_DEFAULT_RADIUS_MILES)
        #[arg(long)]
        radius: Option<f64>,
        /// Category id, e.g. "burger" or "lobster roll"
        #[arg(long)]
        category: Option<String>,
    },
    /// Every dish at one restaurant
    Restaurant {
        id: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// List restaurants, optionally searching by name
    Restaurants {
        #[arg(long)]
        search: Option<String>,
    },
    /// List the dish categories
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("whatsgood=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Categories => {
            for category in Category::ALL {
                println!("{:<14} {}", category.id(), category.label());
            }
            Ok(())
        }
        Commands::Restaurants { search } => {
            let (_, source) = connect()?;
            let directory = RestaurantDirectory::load(source).await?;
            let restaurants: Vec<_> = match search.as_deref() {
                Some(query) => directory.search(query),
                None => directory.all().iter().collect(),
            };
            for restaurant in restaurants {
                println!("{}  {}", restaurant.id, restaurant.name);
            }
            Ok(())
        }
        Commands::Near {
            lat,
            lng,
            radius,
            category,
        } => {
            let (config, source) = connect()?;
            let mut filters = FilterState::new(radius.unwrap_or(config.default_radius_miles))
                .with_location(Location::new(lat, lng));
            if let Some(category) = category {
                filters = filters.with_category(category.parse()?);
            }
            print_dishes(source, filters, config.query).await
        }
        Commands::Restaurant { id, category } => {
            let Some(restaurant_id) = RestaurantId::parse(&id) else {
                bail!("Restaurant id must not be blank");
            };
            let (config, source) = connect()?;
            let mut filters =
                FilterState::new(config.default_radius_miles).with_restaurant(restaurant_id);
            if let Some(category) = category {
                filters = filters.with_category(category.parse()?);
            }
            print_dishes(source, filters, config.query).await
        }
    }
}

/// Load configuration and build the Supabase-backed source.
fn connect() -> Result<(Config, Arc<dyn DishSource>)> {
    let config = Config::from_env()?;
    config.log_redacted();

    let client = SupabaseClient::new(
        &config.supabase_url,
        &config.supabase_anon_key,
        config.query.fetch_timeout,
    )?;
    let source: Arc<dyn DishSource> = Arc::new(SupabaseDishSource::new(Arc::new(client)));
    Ok((config, source))
}

async fn print_dishes(
    source: Arc<dyn DishSource>,
    filters: FilterState,
    query_config: QueryConfig,
) -> Result<()> {
    let query = DishQuery::new(source, filters, query_config);
    query.mount().await;

    let result = query.snapshot();
    match result.status {
        QueryStatus::Success => {
            info!(count = result.dishes.len(), "Query complete");
            if result.dishes.is_empty() {
                println!("No dishes found. Try a larger radius or another category.");
            }
            for (rank, dish) in result.dishes.iter().enumerate() {
                println!("{:>3}. {}", rank + 1, format_dish(dish));
            }
            Ok(())
        }
        QueryStatus::Error => bail!(
            "Unable to load dishes: {}",
            result.error.unwrap_or_default()
        ),
        status => bail!("Query ended in unexpected state {status:?}"),
    }
}

fn format_dish(dish: &Dish) -> String {
    let price = dish
        .price
        .map(|p| format!("${p:.2}"))
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "{} @ {} [{}] {}",
        dish.dish_name, dish.restaurant_name, dish.category, price
    );
    if dish.total_votes > 0 {
        line.push_str(&format!(
            " | {:.0}% worth it ({} votes)",
            dish.percent_worth_it, dish.total_votes
        ));
    }
    if dish.distance_miles > 0.0 {
        line.push_str(&format!(" | {:.1} mi", dish.distance_miles));
    }
    line
}
