#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the dashboard server routes.
//!
//! Successful responses reuse the domain types (`SuburbData`,
//! `BulkSuburbsData`, ...) directly. Failures are always an
//! [`ApiErrorResponse`] with the matching HTTP status.

use serde::{Deserialize, Serialize};
use sydney_property_analytics_models::{
    ComparisonRow, GrowthPeriod, SalesGrowthBar, TimeSeriesTable,
};
use sydney_property_models::PropertyType;

/// Most suburbs accepted by the bulk and comparison routes.
pub const MAX_BULK_SUBURBS: usize = 5;

/// Error body returned by every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Message shown to the user.
    pub error: String,
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Underlying cause, present on server errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorResponse {
    #[must_use]
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
            details: None,
        }
    }

    #[must_use]
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(400, error)
    }

    #[must_use]
    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(404, error)
    }

    #[must_use]
    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(500, error)
        }
    }

    /// Maps an upstream failure: messages mentioning "not found" become a
    /// 404 carrying that message, anything else a 500 with
    /// `default_message` and the cause in `details`.
    #[must_use]
    pub fn from_failure(message: &str, default_message: &str) -> Self {
        if message.contains("not found") {
            Self::not_found(message)
        } else {
            Self::internal(default_message, message)
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

/// Query parameters for `GET /api/suburb/{suburb_name}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuburbParams {
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
}

/// Query parameters for `GET /api/suburbs-analytics`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkSuburbsParams {
    /// Comma-separated suburb names.
    pub suburbs: Option<String>,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
}

/// Query parameters for `GET /api/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u32>,
}

/// Query parameters for `GET /api/property-counts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyCountsParams {
    /// Comma-separated suburb names.
    pub suburbs: Option<String>,
}

/// Query parameters for `GET /api/comparison`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComparisonParams {
    /// Comma-separated suburb names.
    pub suburbs: Option<String>,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub period: GrowthPeriod,
    #[serde(default)]
    pub smoothed: bool,
}

/// Side-by-side view of several suburbs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub period: GrowthPeriod,
    /// Column heading for the growth figures.
    pub period_label: String,
    pub rows: Vec<ComparisonRow>,
    /// Median price per quarter, one column per suburb.
    pub prices: TimeSeriesTable,
    pub sales_growth: Vec<SalesGrowthBar>,
}

/// Splits a comma-separated suburb list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn split_suburbs(param: &str) -> Vec<String> {
    param
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
