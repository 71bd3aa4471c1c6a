//! Growth metrics derived from quarterly series.
//!
//! Both price and sales growth compare a four-quarter window ending at the
//! current quarter with the same four quarter slots some years earlier.

use sydney_property_analytics_models::{
    GrowthBar, GrowthPeriod, QuarterDate, SalesGrowth, TimePeriod,
};
use sydney_property_models::{QuarterlyStat, SuburbAnalytics};

use crate::guards::{is_valid_price, number};
use crate::quarter::current_quarter;

/// First year of the dataset, the anchor for "since" growth figures.
pub const DATASET_START_YEAR: i32 = 2005;

/// Sales growth for [`TimePeriod::Max`] looks back this many years.
pub const MAX_SALES_LOOKBACK_YEARS: i32 = 20;

const WINDOW_QUARTERS: u32 = 4;
const MIN_WINDOW_QUARTERS: usize = 2;

fn find_quarter(series: &[QuarterlyStat], slot: QuarterDate) -> Option<&QuarterlyStat> {
    series
        .iter()
        .find(|q| q.year == slot.year && q.quarter == slot.quarter)
}

/// The four quarter slots ending at `current`'s quarter, `years_ago` years
/// back.
fn window(current: QuarterDate, years_ago: i32) -> impl Iterator<Item = QuarterDate> {
    let end = QuarterDate::new(current.year - years_ago, current.quarter);
    (0..WINDOW_QUARTERS).map(move |i| end.quarters_back(i))
}

fn window_average_price(
    series: &[QuarterlyStat],
    current: QuarterDate,
    years_ago: i32,
    use_smoothed: bool,
) -> Option<f64> {
    let prices: Vec<f64> = window(current, years_ago)
        .filter_map(|slot| find_quarter(series, slot))
        .filter_map(|q| {
            let price = if use_smoothed {
                q.median_price_smoothed.or(q.median_price)
            } else {
                q.median_price
            };
            price.filter(|p| is_valid_price(Some(*p)))
        })
        .collect();

    if prices.len() < MIN_WINDOW_QUARTERS {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// Percentage change in average median price over `years` years.
///
/// Returns `None` when either window has fewer than two valid prices or
/// the past average is zero.
#[must_use]
pub fn calculate_price_growth(
    series: &[QuarterlyStat],
    years: i32,
    use_smoothed: bool,
) -> Option<f64> {
    calculate_price_growth_at(series, years, use_smoothed, current_quarter())
}

/// [`calculate_price_growth`] relative to an explicit current quarter.
#[must_use]
pub fn calculate_price_growth_at(
    series: &[QuarterlyStat],
    years: i32,
    use_smoothed: bool,
    current: QuarterDate,
) -> Option<f64> {
    let recent = window_average_price(series, current, 0, use_smoothed)?;
    let past = window_average_price(series, current, years, use_smoothed)?;

    if past == 0.0 {
        return None;
    }

    Some((recent - past) / past * 100.0)
}

fn window_sales(series: &[QuarterlyStat], current: QuarterDate, years_ago: i32) -> u64 {
    let found: Vec<u64> = window(current, years_ago)
        .filter_map(|slot| find_quarter(series, slot))
        .map(|q| q.num_sales)
        .collect();

    if found.len() < MIN_WINDOW_QUARTERS {
        0
    } else {
        found.iter().sum()
    }
}

/// Percentage change in sales volume between the current four quarters and
/// the same quarters `period` years earlier.
#[must_use]
pub fn calculate_sales_growth(series: &[QuarterlyStat], period: TimePeriod) -> SalesGrowth {
    calculate_sales_growth_at(series, period, current_quarter())
}

/// [`calculate_sales_growth`] relative to an explicit current quarter.
#[must_use]
pub fn calculate_sales_growth_at(
    series: &[QuarterlyStat],
    period: TimePeriod,
    current: QuarterDate,
) -> SalesGrowth {
    let years_ago = period.years().unwrap_or(MAX_SALES_LOOKBACK_YEARS);
    let recent_sales = window_sales(series, current, 0);
    let past_sales = window_sales(series, current, years_ago);

    let growth = if recent_sales == 0 || past_sales == 0 {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        let (recent, past) = (recent_sales as f64, past_sales as f64);
        Some((recent - past) / past * 100.0)
    };

    SalesGrowth {
        growth,
        recent_sales,
        past_sales,
    }
}

/// Looks up the backend's precomputed growth figure for `period`.
#[must_use]
pub const fn backend_growth(
    analytics: &SuburbAnalytics,
    period: GrowthPeriod,
    use_smoothed: bool,
) -> Option<f64> {
    match (period, use_smoothed) {
        (GrowthPeriod::OneYear, false) => analytics.growth_1yr_percentage,
        (GrowthPeriod::OneYear, true) => analytics.growth_1yr_percentage_smoothed,
        (GrowthPeriod::ThreeYears, false) => analytics.growth_3yr_percentage,
        (GrowthPeriod::ThreeYears, true) => analytics.growth_3yr_percentage_smoothed,
        (GrowthPeriod::FiveYears, false) => analytics.growth_5yr_percentage,
        (GrowthPeriod::FiveYears, true) => analytics.growth_5yr_percentage_smoothed,
        (GrowthPeriod::All, false) => analytics.growth_since_2005_percentage,
        (GrowthPeriod::All, true) => analytics.growth_since_2005_percentage_smoothed,
    }
}

/// Growth for a comparison column, computed from the quarterly series.
#[must_use]
pub fn comparison_growth(
    series: &[QuarterlyStat],
    period: GrowthPeriod,
    use_smoothed: bool,
) -> Option<f64> {
    comparison_growth_at(series, period, use_smoothed, current_quarter())
}

/// [`comparison_growth`] relative to an explicit current quarter.
#[must_use]
pub fn comparison_growth_at(
    series: &[QuarterlyStat],
    period: GrowthPeriod,
    use_smoothed: bool,
    current: QuarterDate,
) -> Option<f64> {
    let years = match period {
        GrowthPeriod::OneYear => 1,
        GrowthPeriod::ThreeYears => 3,
        GrowthPeriod::FiveYears => 5,
        GrowthPeriod::All => current.year - DATASET_START_YEAR,
    };
    calculate_price_growth_at(series, years, use_smoothed, current)
}

/// Growth at each horizon the backend reports, skipping missing values.
#[must_use]
pub fn growth_bars(analytics: &SuburbAnalytics, use_smoothed: bool) -> Vec<GrowthBar> {
    let horizons = if use_smoothed {
        [
            ("1yr", analytics.growth_1yr_percentage_smoothed),
            ("3yr", analytics.growth_3yr_percentage_smoothed),
            ("5yr", analytics.growth_5yr_percentage_smoothed),
            ("10yr", analytics.growth_10yr_percentage_smoothed),
            ("Since 2005", analytics.growth_since_2005_percentage_smoothed),
        ]
    } else {
        [
            ("1yr", analytics.growth_1yr_percentage),
            ("3yr", analytics.growth_3yr_percentage),
            ("5yr", analytics.growth_5yr_percentage),
            ("10yr", analytics.growth_10yr_percentage),
            ("Since 2005", analytics.growth_since_2005_percentage),
        ]
    };

    horizons
        .into_iter()
        .filter_map(|(period, growth)| {
            number(growth).map(|growth| GrowthBar {
                period: period.to_string(),
                growth,
            })
        })
        .collect()
}
