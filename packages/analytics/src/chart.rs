//! Reshaping quarterly series into chart- and table-ready rows.

use std::collections::{BTreeMap, BTreeSet};

use sydney_property_analytics_models::{
    ComparisonRow, ForecastPoint, GrowthPeriod, PriceTrendPoint, QuarterDate, SalesGrowthBar,
    SalesPoint, SeriesField, TimePeriod, TimeSeriesRow, TimeSeriesTable,
};
use sydney_property_models::{BulkSuburbsData, PropertyType, QuarterlyStat, SuburbAnalytics};

use crate::growth::{backend_growth, calculate_sales_growth_at, comparison_growth_at};
use crate::guards::{is_valid_price, is_valid_sales, number};
use crate::merge::merge_quarterly_data;
use crate::quarter::{
    DEFAULT_START_YEAR, calculate_cutoff_date_at, current_quarter, filter_quarters_by_date_range,
    format_quarter_string, is_quarter_in_range, sort_quarters,
};

/// Sales-per-quarter charts start here for [`TimePeriod::Max`].
pub const SALES_CHART_START_YEAR: i32 = 2005;

/// Number of historical quarters shown before a forecast.
pub const FORECAST_HISTORY_QUARTERS: usize = 8;

fn field_value(stat: &QuarterlyStat, field: SeriesField, use_smoothed: bool) -> Option<f64> {
    let value = match field {
        SeriesField::MedianPrice if use_smoothed => {
            stat.median_price_smoothed.or(stat.median_price)
        }
        SeriesField::MedianPrice => stat.median_price,
        #[allow(clippy::cast_precision_loss)]
        SeriesField::NumSales => Some(stat.num_sales as f64),
    };

    let valid = match field {
        SeriesField::MedianPrice => is_valid_price(value),
        SeriesField::NumSales => is_valid_sales(value),
    };

    if valid { value } else { None }
}

/// Pivots bulk suburb data into one row per quarter with a column per
/// suburb.
///
/// Only quarters where at least one suburb has a valid value are included,
/// restricted to `period`. `use_smoothed` only affects
/// [`SeriesField::MedianPrice`], falling back to the raw price.
#[must_use]
pub fn time_series_table(
    data: &BulkSuburbsData,
    field: SeriesField,
    period: TimePeriod,
    use_smoothed: bool,
) -> TimeSeriesTable {
    time_series_table_at(data, field, period, use_smoothed, current_quarter())
}

/// [`time_series_table`] relative to an explicit current quarter.
#[must_use]
pub fn time_series_table_at(
    data: &BulkSuburbsData,
    field: SeriesField,
    period: TimePeriod,
    use_smoothed: bool,
    current: QuarterDate,
) -> TimeSeriesTable {
    let labels: Vec<String> = data
        .values()
        .flat_map(|suburb| suburb.quarterly.iter())
        .filter(|q| field_value(q, field, use_smoothed).is_some())
        .map(|q| format_quarter_string(q.year, q.quarter))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let cutoff = calculate_cutoff_date_at(period, DEFAULT_START_YEAR, current);
    let quarters = filter_quarters_by_date_range(&sort_quarters(&labels), cutoff, period);

    // Suburb name to its values keyed by quarter label.
    let lookup: BTreeMap<&str, BTreeMap<String, Option<f64>>> = data
        .iter()
        .map(|(suburb, suburb_data)| {
            let mut by_quarter = BTreeMap::new();
            for q in &suburb_data.quarterly {
                by_quarter
                    .entry(format_quarter_string(q.year, q.quarter))
                    .or_insert_with(|| field_value(q, field, use_smoothed));
            }
            (suburb.as_str(), by_quarter)
        })
        .collect();

    let rows = quarters
        .into_iter()
        .map(|quarter| {
            let values = lookup
                .iter()
                .map(|(suburb, by_quarter)| {
                    (
                        (*suburb).to_string(),
                        by_quarter.get(&quarter).copied().flatten(),
                    )
                })
                .collect();
            TimeSeriesRow { quarter, values }
        })
        .collect();

    TimeSeriesTable {
        suburbs: data.keys().cloned().collect(),
        rows,
    }
}

/// Median price comparison across suburbs.
#[must_use]
pub fn comparison_chart(
    data: &BulkSuburbsData,
    period: TimePeriod,
    use_smoothed: bool,
) -> TimeSeriesTable {
    time_series_table(data, SeriesField::MedianPrice, period, use_smoothed)
}

/// Quarterly sales counts inside `period`, oldest first.
///
/// Records sharing a quarter, as in a combined house and unit series, are
/// merged into one point with their sales summed.
#[must_use]
pub fn sales_per_quarter(series: &[QuarterlyStat], period: TimePeriod) -> Vec<SalesPoint> {
    sales_per_quarter_at(series, period, current_quarter())
}

/// [`sales_per_quarter`] relative to an explicit current quarter.
#[must_use]
pub fn sales_per_quarter_at(
    series: &[QuarterlyStat],
    period: TimePeriod,
    current: QuarterDate,
) -> Vec<SalesPoint> {
    let cutoff = calculate_cutoff_date_at(period, SALES_CHART_START_YEAR, current);

    let mut points: Vec<SalesPoint> = merge_quarterly_data(series, PropertyType::All)
        .iter()
        .filter(|q| is_quarter_in_range(q.year, q.quarter, cutoff, period))
        .map(|q| SalesPoint {
            quarter: format_quarter_string(q.year, q.quarter),
            sales: q.num_sales,
            year: q.year,
            quarter_num: q.quarter,
        })
        .collect();

    points.sort_by_key(|p| (p.year, p.quarter_num));
    points
}

/// Median price trend for one suburb inside `period`, oldest first.
///
/// Records sharing a quarter are merged first, so a combined house and
/// unit series yields the mean of their median prices.
#[must_use]
pub fn price_trend(series: &[QuarterlyStat], period: TimePeriod) -> Vec<PriceTrendPoint> {
    price_trend_at(series, period, current_quarter())
}

/// [`price_trend`] relative to an explicit current quarter.
#[must_use]
pub fn price_trend_at(
    series: &[QuarterlyStat],
    period: TimePeriod,
    current: QuarterDate,
) -> Vec<PriceTrendPoint> {
    let cutoff = calculate_cutoff_date_at(period, DEFAULT_START_YEAR, current);

    let mut points: Vec<PriceTrendPoint> = merge_quarterly_data(series, PropertyType::All)
        .iter()
        .filter(|q| is_quarter_in_range(q.year, q.quarter, cutoff, period))
        .filter_map(|q| {
            number(q.median_price).map(|price| PriceTrendPoint {
                quarter: format_quarter_string(q.year, q.quarter),
                price,
                year: q.year,
                quarter_num: q.quarter,
                qoq_change: number(q.qoq_price_change_percentage),
            })
        })
        .collect();

    points.sort_by_key(|p| (p.year, p.quarter_num));
    points
}

/// Recent history followed by the backend's two-quarter forecast.
///
/// History is the last [`FORECAST_HISTORY_QUARTERS`] quarters with a valid
/// price. Forecast points are placed one and two quarters after the latest
/// of them and only when their price is present. Returns an empty series
/// when there is no valid history.
#[must_use]
pub fn forecast_series(
    historical: &[QuarterlyStat],
    analytics: &SuburbAnalytics,
) -> Vec<ForecastPoint> {
    let mut valid: Vec<&QuarterlyStat> = historical
        .iter()
        .filter(|q| is_valid_price(q.median_price))
        .collect();
    valid.sort_by_key(|q| (q.year, q.quarter));

    let Some(last) = valid.last() else {
        return Vec::new();
    };
    let last = QuarterDate::new(last.year, last.quarter);

    let start = valid.len().saturating_sub(FORECAST_HISTORY_QUARTERS);
    let mut points: Vec<ForecastPoint> = valid[start..]
        .iter()
        .map(|q| ForecastPoint {
            quarter: format_quarter_string(q.year, q.quarter),
            price: q.median_price,
            lower: q.median_price,
            upper: q.median_price,
            is_forecast: false,
        })
        .collect();

    let forecasts = [
        (
            1,
            analytics.forecast_q1_price,
            analytics.forecast_q1_lower,
            analytics.forecast_q1_upper,
        ),
        (
            2,
            analytics.forecast_q2_price,
            analytics.forecast_q2_lower,
            analytics.forecast_q2_upper,
        ),
    ];

    for (ahead, price, lower, upper) in forecasts {
        if price.is_none() {
            continue;
        }
        let quarter = last.quarters_ahead(ahead);
        points.push(ForecastPoint {
            quarter: format_quarter_string(quarter.year, quarter.quarter),
            price,
            lower,
            upper,
            is_forecast: true,
        });
    }

    points
}

/// Sales growth per suburb. Suburbs without a growth figure are omitted.
#[must_use]
pub fn sales_growth_bars(data: &BulkSuburbsData, period: TimePeriod) -> Vec<SalesGrowthBar> {
    sales_growth_bars_at(data, period, current_quarter())
}

/// [`sales_growth_bars`] relative to an explicit current quarter.
#[must_use]
pub fn sales_growth_bars_at(
    data: &BulkSuburbsData,
    period: TimePeriod,
    current: QuarterDate,
) -> Vec<SalesGrowthBar> {
    data.iter()
        .filter_map(|(suburb, suburb_data)| {
            let result = calculate_sales_growth_at(&suburb_data.quarterly, period, current);
            result.growth.map(|growth| SalesGrowthBar {
                suburb: suburb.clone(),
                growth,
                recent_sales: result.recent_sales,
                past_sales: result.past_sales,
            })
        })
        .collect()
}

/// One comparison-table row per suburb.
#[must_use]
pub fn comparison_rows(
    data: &BulkSuburbsData,
    period: GrowthPeriod,
    use_smoothed: bool,
) -> Vec<ComparisonRow> {
    comparison_rows_at(data, period, use_smoothed, current_quarter())
}

/// [`comparison_rows`] relative to an explicit current quarter.
#[must_use]
pub fn comparison_rows_at(
    data: &BulkSuburbsData,
    period: GrowthPeriod,
    use_smoothed: bool,
    current: QuarterDate,
) -> Vec<ComparisonRow> {
    data.iter()
        .map(|(suburb, suburb_data)| {
            let analytics = suburb_data.analytics.analytics();
            ComparisonRow {
                suburb: suburb.clone(),
                median_price: if use_smoothed {
                    analytics
                        .current_median_price_smoothed
                        .or(analytics.current_median_price)
                } else {
                    analytics.current_median_price
                },
                growth: comparison_growth_at(&suburb_data.quarterly, period, use_smoothed, current),
                backend_growth: backend_growth(analytics, period, use_smoothed),
                avg_ctsd: analytics.current_avg_ctsd,
                num_sales: analytics.current_num_sales,
                market_health_score: analytics.market_health_score,
            }
        })
        .collect()
}
