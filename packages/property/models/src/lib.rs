#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Suburb analytics and quarterly statistics types.
//!
//! These types mirror the records served by the backend analytics API
//! (field names stay `snake_case` to match its JSON) plus the derived
//! "all properties" view built by combining house and unit records.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Property type filter.
///
/// Backend records are always [`PropertyType::House`] or
/// [`PropertyType::Unit`]; [`PropertyType::All`] marks views derived by
/// combining the two.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PropertyType {
    /// Houses and units combined.
    #[default]
    All,
    /// Free-standing houses.
    House,
    /// Units and apartments.
    Unit,
}

impl PropertyType {
    /// Returns the value to send as the backend's `property_type` query
    /// parameter. `All` is expressed by omitting the filter.
    #[must_use]
    pub const fn as_filter(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::House => Some("house"),
            Self::Unit => Some("unit"),
        }
    }
}

/// One quarter of sales statistics for a suburb and property type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyStat {
    pub id: i64,
    pub suburb: String,
    pub property_type: PropertyType,
    pub year: i32,
    /// Quarter of the year, 1-4.
    pub quarter: u8,
    pub quarter_start: NaiveDate,
    pub num_sales: u64,
    pub median_price: Option<f64>,
    pub median_price_smoothed: Option<f64>,
    pub mean_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_stddev: Option<f64>,
    pub price_p25: Option<f64>,
    pub price_p75: Option<f64>,
    /// Median contract-to-settlement days.
    pub median_ctsd: Option<f64>,
    /// Mean contract-to-settlement days.
    pub mean_ctsd: Option<f64>,
    pub fast_sales_percentage: Option<f64>,
    pub fast_settlements_percentage: Option<f64>,
    pub liquidity_score: Option<f64>,
    pub contract_to_settlement_score: Option<f64>,
    pub qoq_price_change_percentage: Option<f64>,
    pub yoy_price_change_percentage: Option<f64>,
    pub created_at: Option<String>,
}

/// Point-in-time analytics snapshot for a suburb and property type.
///
/// Counts such as ranks and recovery quarters are carried as `f64` because
/// the combined view stores sales-weighted averages of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuburbAnalytics {
    pub suburb: String,
    pub property_type: PropertyType,
    pub last_updated: Option<String>,
    /// Label of the latest quarter with data (e.g. `"2024-Q3"`).
    pub current_quarter: Option<String>,

    // Current metrics
    pub current_median_price: Option<f64>,
    pub current_median_price_smoothed: Option<f64>,
    pub current_avg_ctsd: Option<f64>,
    pub current_num_sales: Option<u64>,

    // Growth rates
    pub growth_1yr_percentage: Option<f64>,
    pub growth_3yr_percentage: Option<f64>,
    pub growth_5yr_percentage: Option<f64>,
    pub growth_10yr_percentage: Option<f64>,
    pub growth_since_2005_percentage: Option<f64>,
    pub cagr_5yr: Option<f64>,
    pub cagr_10yr: Option<f64>,
    pub growth_1yr_percentage_smoothed: Option<f64>,
    pub growth_3yr_percentage_smoothed: Option<f64>,
    pub growth_5yr_percentage_smoothed: Option<f64>,
    pub growth_10yr_percentage_smoothed: Option<f64>,
    pub growth_since_2005_percentage_smoothed: Option<f64>,
    pub cagr_5yr_smoothed: Option<f64>,
    pub cagr_10yr_smoothed: Option<f64>,

    // Risk & market health
    pub volatility_score: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
    pub recovery_quarters: Option<f64>,
    pub avg_quarterly_volume: Option<f64>,
    pub overall_liquidity_score: Option<f64>,
    pub market_health_score: Option<f64>,

    // Seasonal patterns
    pub q1_avg_premium_percentage: Option<f64>,
    pub q2_avg_premium_percentage: Option<f64>,
    pub q3_avg_premium_percentage: Option<f64>,
    pub q4_avg_premium_percentage: Option<f64>,
    pub best_quarter_to_sell: Option<String>,

    // Forecasts (80% confidence bounds)
    pub forecast_q1_price: Option<f64>,
    pub forecast_q1_lower: Option<f64>,
    pub forecast_q1_upper: Option<f64>,
    pub forecast_q2_price: Option<f64>,
    pub forecast_q2_lower: Option<f64>,
    pub forecast_q2_upper: Option<f64>,

    // Percentile ranks among suburbs
    pub price_rank: Option<f64>,
    pub growth_rank: Option<f64>,
    pub speed_rank: Option<f64>,

    // Data quality
    pub total_quarters_with_data: Option<f64>,
    pub data_completeness_percentage: Option<f64>,
    /// JSON-encoded quarterly price series.
    pub price_quarterly: Option<String>,
    /// JSON-encoded quarterly settlement-days series.
    pub ctsd_quarterly: Option<String>,
}

/// Analytics combined across house and unit records.
///
/// `combined.property_type` is always [`PropertyType::All`]. The source
/// records are kept so detail views can still break figures down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSuburbAnalytics {
    #[serde(flatten)]
    pub combined: SuburbAnalytics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_analytics: Option<SuburbAnalytics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_analytics: Option<SuburbAnalytics>,
}

/// Either a single property type's analytics or the combined view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyticsView {
    /// Combined house + unit analytics.
    Aggregated(AggregatedSuburbAnalytics),
    /// Analytics for one property type.
    Single(SuburbAnalytics),
}

impl AnalyticsView {
    /// Returns the headline analytics regardless of variant.
    #[must_use]
    pub const fn analytics(&self) -> &SuburbAnalytics {
        match self {
            Self::Aggregated(aggregated) => &aggregated.combined,
            Self::Single(single) => single,
        }
    }
}

/// Analytics and quarterly history for one suburb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuburbData {
    pub analytics: AnalyticsView,
    pub quarterly: Vec<QuarterlyStat>,
}

/// Suburb name to its data, for multi-suburb comparisons.
pub type BulkSuburbsData = BTreeMap<String, SuburbData>;

/// Per-suburb rollup used for the initial map paint and filter thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuburbSummary {
    pub suburb: String,
    pub current_median_price: Option<f64>,
    pub growth_5yr_percentage: Option<f64>,
    pub current_avg_ctsd: Option<f64>,
}

/// Sales counts across a set of selected suburbs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCounts {
    pub all: u64,
    pub house: u64,
    pub unit: u64,
}

/// Page of analytics records from `GET /api/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsListResponse {
    pub items: Vec<SuburbAnalytics>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Result of `GET /api/analytics/search/suburbs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuburbSearchResponse {
    pub suburbs: Vec<String>,
    pub total: u64,
}

/// Filters for the analytics listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsQuery {
    /// Suburb name filter.
    pub suburb: Option<String>,
    /// Property type filter (`All` sends no filter).
    pub property_type: PropertyType,
    /// Minimum current median price.
    pub min_price: Option<f64>,
    /// Sort column understood by the backend.
    pub sort_by: Option<String>,
    /// Page size.
    pub limit: Option<u64>,
    /// Page offset.
    pub offset: Option<u64>,
}

impl AnalyticsQuery {
    /// Builds the query-string pairs for this filter set, omitting unset
    /// values. Zero `limit`/`offset` values are omitted as well.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(suburb) = self.suburb.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("suburb", suburb.to_string()));
        }
        if let Some(property_type) = self.property_type.as_filter() {
            pairs.push(("property_type", property_type.to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("min_price", min_price.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sort_by", sort_by.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            pairs.push(("offset", offset.to_string()));
        }

        pairs
    }
}
