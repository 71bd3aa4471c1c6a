#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line tools for the Sydney property dashboard.
//!
//! ```text
//! sydney_property serve [--bind 0.0.0.0] [--port 8080] [--geojson path]
//! sydney_property summaries [--min-price N] [--max-price N] [--search TERM]
//! sydney_property suburb <name> [--type house] [--smoothed]
//! sydney_property compare <a> <b> ... [--period 5yr] [--type all]
//! sydney_property search <query> [--limit 20]
//! sydney_property map [--geojson path] [--type unit]
//! sydney_property locate <lon> <lat> [--geojson path]
//! ```
//!
//! Every command talks to the analytics backend at `--api-url`, falling
//! back to `SYDNEY_PROPERTY_API_URL` and then `http://localhost:8000`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sydney_property_analytics::chart::{comparison_rows, sales_per_quarter};
use sydney_property_analytics::filters::{
    MAX_PRICE_RANGE, PriceRange, SuburbFilter, filter_suburbs, normalize_suburb_name,
    suburb_price_map,
};
use sydney_property_analytics::format::{format_days, format_percentage, format_price, format_sales};
use sydney_property_analytics::growth::growth_bars;
use sydney_property_analytics_models::{GrowthPeriod, TimePeriod};
use sydney_property_client::fetch::{
    fetch_bulk_suburbs_data, fetch_property_type_analytics, fetch_suburb_data,
    fetch_suburb_summaries,
};
use sydney_property_client::{AnalyticsApi, ApiClient, DEFAULT_SEARCH_LIMIT};
use sydney_property_geography::{PriceBucket, SuburbBoundaries};
use sydney_property_models::PropertyType;
use sydney_property_server::{DEFAULT_GEOJSON_PATH, ServerConfig};

#[derive(Parser)]
#[command(
    name = "sydney_property",
    about = "Explore Sydney suburb property analytics"
)]
struct Cli {
    /// Analytics backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard route server
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
        /// Suburb boundary file (overrides `SUBURB_GEOJSON_PATH`)
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// List suburb summaries, optionally filtered
    Summaries {
        #[arg(long, default_value_t = 0.0)]
        min_price: f64,
        #[arg(long, default_value_t = MAX_PRICE_RANGE)]
        max_price: f64,
        /// Case-insensitive suburb name filter
        #[arg(long, default_value = "")]
        search: String,
        /// Property type used for the price filter
        #[arg(long = "type", default_value = "all")]
        property_type: PropertyType,
    },
    /// Show analytics and recent sales for one suburb
    Suburb {
        name: String,
        #[arg(long = "type", default_value = "all")]
        property_type: PropertyType,
        /// Use smoothed growth figures
        #[arg(long)]
        smoothed: bool,
        /// Sales window (1yr, 3yr, 5yr, max)
        #[arg(long, default_value = "1yr")]
        period: TimePeriod,
        /// Print the raw suburb data as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare growth across suburbs
    Compare {
        #[arg(required = true)]
        suburbs: Vec<String>,
        #[arg(long = "type", default_value = "all")]
        property_type: PropertyType,
        /// Growth horizon (1yr, 3yr, 5yr, all)
        #[arg(long, default_value = "5yr")]
        period: GrowthPeriod,
        #[arg(long)]
        smoothed: bool,
    },
    /// Search suburb names
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
    /// Print each boundary suburb with its median price bucket
    Map {
        #[arg(long, default_value = DEFAULT_GEOJSON_PATH)]
        geojson: PathBuf,
        #[arg(long = "type", default_value = "all")]
        property_type: PropertyType,
    },
    /// Find the suburb containing a point
    Locate {
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, default_value = DEFAULT_GEOJSON_PATH)]
        geojson: PathBuf,
    },
}

#[allow(clippy::too_many_lines, clippy::cast_precision_loss)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let client = cli.api_url.map_or_else(ApiClient::from_env, ApiClient::new);
    log::debug!("Using analytics API at {}", client.base_url());
    let api: Arc<dyn AnalyticsApi> = Arc::new(client);

    match cli.command {
        Commands::Serve {
            bind,
            port,
            geojson,
        } => {
            let defaults = ServerConfig::from_env();
            let config = ServerConfig {
                bind_addr: bind.unwrap_or(defaults.bind_addr),
                port: port.unwrap_or(defaults.port),
                geojson_path: geojson.unwrap_or(defaults.geojson_path),
            };
            log::info!(
                "Serving dashboard routes on {}:{} (boundaries: {})",
                config.bind_addr,
                config.port,
                config.geojson_path.display()
            );

            // The server uses actix-web's runtime, so it runs on its own
            // system inside a blocking task.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(sydney_property_server::run_server(config, api))
            })
            .await??;
        }
        Commands::Summaries {
            min_price,
            max_price,
            search,
            property_type,
        } => {
            log::info!("Listing suburb summaries ({property_type})");
            let summaries = fetch_suburb_summaries(api.as_ref()).await?;
            let type_analytics = fetch_property_type_analytics(api.as_ref(), property_type).await;
            let filter = SuburbFilter {
                search_term: search,
                price_range: PriceRange::new(min_price, max_price),
                property_type,
            };
            let matching = filter_suburbs(&summaries, &filter, &type_analytics);

            println!("{:<28} {:>12} {:>10} {:>10}", "SUBURB", "MEDIAN", "5YR", "CTSD");
            println!("{}", "-".repeat(63));

            for summary in summaries
                .iter()
                .filter(|s| matching.contains(&normalize_suburb_name(&s.suburb)))
            {
                println!(
                    "{:<28} {:>12} {:>10} {:>10}",
                    summary.suburb,
                    format_price(summary.current_median_price),
                    format_percentage(summary.growth_5yr_percentage),
                    format_days(summary.current_avg_ctsd),
                );
            }

            println!("\n{} of {} suburb(s)", matching.len(), summaries.len());
        }
        Commands::Suburb {
            name,
            property_type,
            smoothed,
            period,
            json,
        } => {
            log::info!("Fetching {property_type} data for suburb {name}");
            let Some(data) = fetch_suburb_data(api.as_ref(), &name, property_type).await? else {
                eprintln!("No data found for suburb: {name}");
                std::process::exit(1);
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
                return Ok(());
            }

            let analytics = data.analytics.analytics();
            println!("{} ({})", analytics.suburb, analytics.property_type);
            println!(
                "  Median price:  {}",
                format_price(analytics.current_median_price)
            );
            println!(
                "  Sales:         {}",
                format_sales(analytics.current_num_sales.map(|n| n as f64))
            );
            println!(
                "  Avg CTSD:      {}",
                format_days(analytics.current_avg_ctsd)
            );

            println!("\nGrowth");
            for bar in growth_bars(analytics, smoothed) {
                println!("  {:<12} {:>10}", bar.period, format_percentage(Some(bar.growth)));
            }

            println!("\nSales per quarter ({period})");
            for point in sales_per_quarter(&data.quarterly, period) {
                println!("  {:<10} {:>8}", point.quarter, point.sales);
            }
        }
        Commands::Compare {
            suburbs,
            property_type,
            period,
            smoothed,
        } => {
            log::info!("Comparing {} suburb(s) over {period}", suburbs.len());
            let data = fetch_bulk_suburbs_data(api.as_ref(), &suburbs, property_type).await;
            if data.is_empty() {
                eprintln!("No data found for any of: {}", suburbs.join(", "));
                std::process::exit(1);
            }

            println!(
                "{:<28} {:>12} {:>18} {:>10} {:>8}",
                "SUBURB",
                "MEDIAN",
                period.label(),
                "CTSD",
                "SALES"
            );
            println!("{}", "-".repeat(80));

            for row in comparison_rows(&data, period, smoothed) {
                println!(
                    "{:<28} {:>12} {:>18} {:>10} {:>8}",
                    row.suburb,
                    format_price(row.median_price),
                    format_percentage(row.growth),
                    format_days(row.avg_ctsd),
                    format_sales(row.num_sales.map(|n| n as f64)),
                );
            }
        }
        Commands::Search { query, limit } => {
            let results = api.search_suburbs(&query, limit).await?;
            for suburb in &results.suburbs {
                println!("{suburb}");
            }
            println!("\n{} match(es)", results.total);
        }
        Commands::Map {
            geojson,
            property_type,
        } => {
            log::info!("Loading suburb boundaries from {}", geojson.display());
            let boundaries = SuburbBoundaries::load(&geojson).await?;
            let summaries = fetch_suburb_summaries(api.as_ref()).await?;
            let type_analytics = fetch_property_type_analytics(api.as_ref(), property_type).await;
            let prices = suburb_price_map(&summaries, property_type, &type_analytics);

            for suburb in boundaries.suburb_names() {
                let price = prices.get(&suburb).copied().flatten();
                let bucket = PriceBucket::of(price);
                println!(
                    "{:<28} {:>12} {:<11} {}",
                    suburb,
                    format_price(price),
                    bucket,
                    bucket.color()
                );
            }
        }
        Commands::Locate {
            longitude,
            latitude,
            geojson,
        } => {
            log::info!("Locating ({longitude}, {latitude}) in {}", geojson.display());
            let boundaries = SuburbBoundaries::load(&geojson).await?;
            let Some(suburb) = boundaries.suburb_at(longitude, latitude) else {
                eprintln!("No suburb contains ({longitude}, {latitude})");
                std::process::exit(1);
            };
            println!("{suburb}");
        }
    }

    Ok(())
}
