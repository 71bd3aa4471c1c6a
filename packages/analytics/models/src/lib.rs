#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived-view types for quarterly analytics.
//!
//! Quarter coordinates, time-period selectors, and the row shapes produced
//! when quarterly series are reshaped for charts and comparison tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A calendar quarter.
///
/// Ordering is chronological (year first, then quarter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuarterDate {
    /// Calendar year.
    pub year: i32,
    /// Quarter of the year, 1-4.
    pub quarter: u8,
}

impl QuarterDate {
    /// Creates a quarter coordinate. No range check is applied to `quarter`.
    #[must_use]
    pub const fn new(year: i32, quarter: u8) -> Self {
        Self { year, quarter }
    }

    /// Returns the quarter `n` quarters before this one, rolling back across
    /// year boundaries.
    #[must_use]
    pub const fn quarters_back(self, n: u32) -> Self {
        self.offset(-(n as i64))
    }

    /// Returns the quarter `n` quarters after this one.
    #[must_use]
    pub const fn quarters_ahead(self, n: u32) -> Self {
        self.offset(n as i64)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    const fn offset(self, n: i64) -> Self {
        let index = self.year as i64 * 4 + (self.quarter as i64 - 1) + n;
        Self {
            year: index.div_euclid(4) as i32,
            quarter: (index.rem_euclid(4) + 1) as u8,
        }
    }
}

impl std::fmt::Display for QuarterDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.year)
    }
}

/// Time window selector used by charts.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimePeriod {
    /// Last year.
    #[serde(rename = "1yr")]
    #[strum(serialize = "1yr")]
    OneYear,
    /// Last three years.
    #[serde(rename = "3yr")]
    #[strum(serialize = "3yr")]
    ThreeYears,
    /// Last five years.
    #[serde(rename = "5yr")]
    #[strum(serialize = "5yr")]
    FiveYears,
    /// Everything available.
    #[default]
    #[serde(rename = "max")]
    #[strum(serialize = "max")]
    Max,
}

impl TimePeriod {
    /// Number of years covered, or `None` for [`TimePeriod::Max`].
    #[must_use]
    pub const fn years(self) -> Option<i32> {
        match self {
            Self::OneYear => Some(1),
            Self::ThreeYears => Some(3),
            Self::FiveYears => Some(5),
            Self::Max => None,
        }
    }
}

/// Growth horizon shown in comparison views.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum GrowthPeriod {
    #[serde(rename = "1yr")]
    #[strum(serialize = "1yr")]
    OneYear,
    #[serde(rename = "3yr")]
    #[strum(serialize = "3yr")]
    ThreeYears,
    #[default]
    #[serde(rename = "5yr")]
    #[strum(serialize = "5yr")]
    FiveYears,
    /// Since 2005, the start of the dataset.
    #[serde(rename = "all")]
    #[strum(serialize = "all")]
    All,
}

impl GrowthPeriod {
    /// Human-readable column label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneYear => "1-Year Growth",
            Self::ThreeYears => "3-Year Growth",
            Self::FiveYears => "5-Year Growth",
            Self::All => "Growth Since 2005",
        }
    }
}

impl From<TimePeriod> for GrowthPeriod {
    fn from(period: TimePeriod) -> Self {
        match period {
            TimePeriod::OneYear => Self::OneYear,
            TimePeriod::ThreeYears => Self::ThreeYears,
            TimePeriod::FiveYears => Self::FiveYears,
            TimePeriod::Max => Self::All,
        }
    }
}

/// Quarterly field plotted by a time-series chart.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SeriesField {
    /// Median sale price.
    #[default]
    MedianPrice,
    /// Number of sales.
    NumSales,
}

/// One quarter of a multi-suburb time-series table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesRow {
    /// Quarter label (`"Q3 2024"`).
    pub quarter: String,
    /// Suburb name to its value for this quarter (`None` when missing or
    /// invalid).
    pub values: BTreeMap<String, Option<f64>>,
}

/// Quarter-indexed table with one column per suburb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesTable {
    /// Column order.
    pub suburbs: Vec<String>,
    /// Rows in chronological order.
    pub rows: Vec<TimeSeriesRow>,
}

/// A bar in the sales-per-quarter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    pub quarter: String,
    pub sales: u64,
    pub year: i32,
    pub quarter_num: u8,
}

/// A point on a single-suburb price trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTrendPoint {
    pub quarter: String,
    pub price: f64,
    pub year: i32,
    pub quarter_num: u8,
    /// Quarter-over-quarter change, percent.
    pub qoq_change: Option<f64>,
}

/// A historical or forecast point on the forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub quarter: String,
    pub price: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub is_forecast: bool,
}

/// Sales-volume growth between the current and a past four-quarter window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesGrowth {
    /// Percent change, `None` when either window lacks data.
    pub growth: Option<f64>,
    pub recent_sales: u64,
    pub past_sales: u64,
}

/// Sales growth for one suburb, ready for a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesGrowthBar {
    pub suburb: String,
    pub growth: f64,
    pub recent_sales: u64,
    pub past_sales: u64,
}

/// A horizon/value pair for the growth bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthBar {
    /// Horizon label (`"1yr"`, `"Since 2005"`, ...).
    pub period: String,
    pub growth: f64,
}

/// One suburb's row in the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub suburb: String,
    pub median_price: Option<f64>,
    /// Growth computed from the quarterly series.
    pub growth: Option<f64>,
    /// Growth as precomputed by the backend, for reference.
    pub backend_growth: Option<f64>,
    pub avg_ctsd: Option<f64>,
    pub num_sales: Option<u64>,
    pub market_health_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_arithmetic_rolls_over_years() {
        let q1 = QuarterDate::new(2024, 1);
        assert_eq!(q1.quarters_back(1), QuarterDate::new(2023, 4));
        assert_eq!(q1.quarters_back(3), QuarterDate::new(2023, 2));
        assert_eq!(q1.quarters_back(4), QuarterDate::new(2023, 1));
        assert_eq!(QuarterDate::new(2023, 4).quarters_ahead(1), q1);
        assert_eq!(QuarterDate::new(2023, 3).quarters_ahead(2), q1);
    }

    #[test]
    fn quarters_order_chronologically() {
        assert!(QuarterDate::new(2023, 4) < QuarterDate::new(2024, 1));
        assert!(QuarterDate::new(2024, 1) < QuarterDate::new(2024, 2));
    }

    #[test]
    fn time_period_string_forms() {
        assert_eq!("3yr".parse::<TimePeriod>().unwrap(), TimePeriod::ThreeYears);
        assert_eq!(TimePeriod::Max.to_string(), "max");
        assert_eq!(
            serde_json::to_string(&TimePeriod::OneYear).unwrap(),
            "\"1yr\""
        );
        assert_eq!(GrowthPeriod::from(TimePeriod::Max), GrowthPeriod::All);
        assert_eq!(GrowthPeriod::All.label(), "Growth Since 2005");
    }
}
