#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sydney suburb boundaries.
//!
//! Loads the suburb boundary `GeoJSON` from disk or over HTTP, extracts
//! normalized suburb names from feature properties, resolves points to
//! suburbs, and buckets median prices into map colours.

pub mod boundaries;
pub mod color;

use thiserror::Error;

pub use boundaries::{SuburbBoundaries, suburb_name_from_feature};
pub use color::{PriceBucket, price_color};

/// Errors that can occur while loading boundary data.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// Reading the boundary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but has an unexpected shape.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
