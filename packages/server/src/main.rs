#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the dashboard route server.

use std::sync::Arc;

use sydney_property_client::ApiClient;
use sydney_property_server::{ServerConfig, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let api = Arc::new(ApiClient::from_env());
    run_server(ServerConfig::from_env(), api).await
}
