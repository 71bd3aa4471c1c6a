#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the suburb analytics backend.
//!
//! The four backend endpoints sit behind the [`AnalyticsApi`] trait.
//! [`ApiClient`] implements it over HTTP; the orchestration in [`fetch`]
//! (combined house/unit views, bulk fan-out, paginated summaries) works
//! against any implementation.

pub mod api;
pub mod fetch;
pub mod pagination;

use async_trait::async_trait;
use sydney_property_models::{
    AnalyticsListResponse, AnalyticsQuery, PropertyType, QuarterlyStat, SuburbAnalytics,
    SuburbSearchResponse,
};

pub use api::ApiClient;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "SYDNEY_PROPERTY_API_URL";

/// Backend base URL used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default number of suburb search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Errors that can occur when talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested suburb has no records.
    #[error("{message}")]
    NotFound {
        /// Always contains "not found".
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("{message} (status {status})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// What was being requested.
        message: String,
    },

    /// The configured base URL cannot be used.
    #[error("Invalid URL: {message}")]
    InvalidUrl {
        /// Description of what went wrong.
        message: String,
    },
}

impl ClientError {
    /// Returns whether this error means the suburb does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The backend analytics endpoints.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Lists analytics records (`GET /api/analytics`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or returns a non-2xx
    /// status.
    async fn list_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsListResponse, ClientError>;

    /// Analytics for one suburb (`GET /api/analytics/{suburb}`).
    ///
    /// [`PropertyType::All`] sends no filter and returns every type.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the suburb has no analytics,
    /// or another [`ClientError`] if the request fails.
    async fn suburb_analytics(
        &self,
        suburb: &str,
        property_type: PropertyType,
    ) -> Result<Vec<SuburbAnalytics>, ClientError>;

    /// Quarterly records for one suburb (`GET /api/quarterly/{suburb}`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the suburb has no quarterly
    /// records, or another [`ClientError`] if the request fails.
    async fn suburb_quarterly(
        &self,
        suburb: &str,
        property_type: PropertyType,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<Vec<QuarterlyStat>, ClientError>;

    /// Suburb name search (`GET /api/analytics/search/suburbs`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or returns a non-2xx
    /// status.
    async fn search_suburbs(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<SuburbSearchResponse, ClientError>;
}
