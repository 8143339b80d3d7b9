mod hours;
mod listing;
mod watch;

use clap::{Parser, Subcommand};
use nearbite_api::ApiClient;
use nearbite_core::{Coordinate, RankFilters};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nearbite")]
#[command(about = "Find restaurants near you, open ones first")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Optional user position. Both coordinates or neither.
#[derive(Debug, Clone, Copy, PartialEq, clap::Args)]
struct PositionArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    lat: Option<f64>,
    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lng: Option<f64>,
}

impl PositionArgs {
    fn coordinate(self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List restaurants near a position, open ones first
    Nearby {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in km (defaults to `NEARBITE_SEARCH_RADIUS_KM`)
        #[arg(long)]
        radius: Option<f64>,
        /// Hide restaurants that are currently closed
        #[arg(long)]
        open_only: bool,
        /// Hide restaurants rated below this value
        #[arg(long)]
        min_rating: Option<f64>,
        /// Keep restaurants whose name, cuisine, or description contains this text
        #[arg(long)]
        query: Option<String>,
        /// Only restaurants in this category
        #[arg(long)]
        category: Option<i64>,
    },
    /// Search restaurants by text, open ones first
    Search {
        /// Text to search for
        text: String,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// List restaurants in a category
    Category {
        /// Category id
        id: i64,
        #[command(flatten)]
        position: PositionArgs,
        /// Search radius in km (defaults to `NEARBITE_CATEGORY_RADIUS_KM`)
        #[arg(long)]
        radius: Option<f64>,
        /// Keep restaurants whose name, cuisine, or description contains this text
        #[arg(long)]
        query: Option<String>,
    },
    /// List active categories
    Categories,
    /// Show the weekly hours of each location of a restaurant
    Hours {
        /// Restaurant id
        restaurant_id: i64,
    },
    /// Keep a live nearby feed on screen until interrupted
    Watch {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = nearbite_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, api = %config.api_base_url, "nearbite starting");

    let client = ApiClient::new(
        &config.api_base_url,
        config.http_timeout_secs,
        &config.user_agent,
    )?;

    match cli.command {
        Commands::Nearby {
            lat,
            lng,
            radius,
            open_only,
            min_rating,
            query,
            category,
        } => {
            let filters = RankFilters {
                min_rating,
                open_only,
                query,
            };
            let radius_km = radius.unwrap_or(config.search_radius_km);
            let location = Coordinate::new(lat, lng);
            listing::run_nearby(&client, location, radius_km, category, &filters).await?;
        }
        Commands::Search { text, position } => {
            listing::run_search(&client, &text, position.coordinate()).await?;
        }
        Commands::Category {
            id,
            position,
            radius,
            query,
        } => {
            let radius_km = radius.unwrap_or(config.category_radius_km);
            let filters = RankFilters {
                query,
                ..RankFilters::default()
            };
            listing::run_category(&client, id, position.coordinate(), radius_km, &filters).await?;
        }
        Commands::Categories => listing::run_categories(&client).await?,
        Commands::Hours { restaurant_id } => hours::run_hours(&client, restaurant_id).await?,
        Commands::Watch { lat, lng } => {
            watch::run_watch(client, &config, Coordinate::new(lat, lng)).await?;
        }
    }

    Ok(())
}
