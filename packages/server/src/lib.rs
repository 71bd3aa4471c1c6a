#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web route server for the Sydney property dashboard.
//!
//! Sits between the dashboard and the analytics backend. Suburb detail and
//! bulk comparison routes validate their input, fan out to the backend
//! through [`AnalyticsApi`], and return shaped JSON. The suburb boundary
//! `GeoJSON` file is served as a static asset.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use sydney_property_client::AnalyticsApi;

/// Boundary file served when `SUBURB_GEOJSON_PATH` is unset.
pub const DEFAULT_GEOJSON_PATH: &str = "data/sydney_suburbs.geojson";

/// Shared application state.
pub struct AppState {
    /// Analytics backend.
    pub api: Arc<dyn AnalyticsApi>,
    /// Suburb boundary file served at `/sydney_suburbs.geojson`.
    pub boundaries_path: PathBuf,
}

/// Listener and asset settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub geojson_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            geojson_path: PathBuf::from(DEFAULT_GEOJSON_PATH),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT` and `SUBURB_GEOJSON_PATH`, keeping the
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            geojson_path: std::env::var("SUBURB_GEOJSON_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.geojson_path),
        }
    }
}

/// Registers every route. Shared by [`run_server`] and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/suburb/{suburb_name}", web::get().to(handlers::suburb))
            .route("/suburbs-analytics", web::get().to(handlers::suburbs_analytics))
            .route("/summaries", web::get().to(handlers::summaries))
            .route("/search", web::get().to(handlers::search))
            .route("/property-counts", web::get().to(handlers::property_counts))
            .route("/comparison", web::get().to(handlers::comparison)),
    )
    .route("/sydney_suburbs.geojson", web::get().to(handlers::boundaries));
}

/// Starts the HTTP server.
///
/// The caller provides the async runtime (e.g. via `#[actix_web::main]`)
/// and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig, api: Arc<dyn AnalyticsApi>) -> std::io::Result<()> {
    if !config.geojson_path.exists() {
        log::warn!(
            "Suburb boundaries not found at {}; /sydney_suburbs.geojson will return 404",
            config.geojson_path.display()
        );
    }

    let state = web::Data::new(AppState {
        api,
        boundaries_path: config.geojson_path.clone(),
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
