//! Sales-weighted combination of house and unit analytics.

use sydney_property_models::{AggregatedSuburbAnalytics, PropertyType, SuburbAnalytics};

/// Per-source weights derived from current sales volume.
#[derive(Debug, Clone, Copy)]
struct Weights {
    house: f64,
    unit: f64,
}

impl Weights {
    fn combine(self, house: Option<f64>, unit: Option<f64>) -> Option<f64> {
        match (house, unit) {
            (Some(h), Some(u)) => Some(h.mul_add(self.house, u * self.unit)),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }
}

fn as_all(analytics: &SuburbAnalytics) -> SuburbAnalytics {
    SuburbAnalytics {
        property_type: PropertyType::All,
        ..analytics.clone()
    }
}

/// Combines house and unit analytics for one suburb.
///
/// * Neither present: `None`.
/// * One present: that record relabelled as [`PropertyType::All`].
/// * Both present with no current sales: the house record with a simple
///   mean of the two current median prices.
/// * Otherwise every metric is the sales-weighted average of the two
///   values, or whichever value is present. `current_num_sales` is summed.
///
/// The JSON quarterly series are not combined and are left empty.
#[must_use]
pub fn aggregate_analytics(
    house: Option<&SuburbAnalytics>,
    unit: Option<&SuburbAnalytics>,
) -> Option<AggregatedSuburbAnalytics> {
    let (house, unit) = match (house, unit) {
        (None, None) => return None,
        (Some(house), None) => {
            return Some(AggregatedSuburbAnalytics {
                combined: as_all(house),
                house_analytics: Some(house.clone()),
                unit_analytics: None,
            });
        }
        (None, Some(unit)) => {
            return Some(AggregatedSuburbAnalytics {
                combined: as_all(unit),
                house_analytics: None,
                unit_analytics: Some(unit.clone()),
            });
        }
        (Some(house), Some(unit)) => (house, unit),
    };

    let house_sales = house.current_num_sales.unwrap_or(0);
    let unit_sales = unit.current_num_sales.unwrap_or(0);
    let total_sales = house_sales + unit_sales;

    if total_sales == 0 {
        let current_median_price = match (house.current_median_price, unit.current_median_price) {
            (Some(h), Some(u)) => Some(f64::midpoint(h, u)),
            (h, u) => h.or(u),
        };

        return Some(AggregatedSuburbAnalytics {
            combined: SuburbAnalytics {
                current_median_price,
                ..as_all(house)
            },
            house_analytics: Some(house.clone()),
            unit_analytics: Some(unit.clone()),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let w = Weights {
        house: house_sales as f64 / total_sales as f64,
        unit: unit_sales as f64 / total_sales as f64,
    };

    let combined = SuburbAnalytics {
        suburb: house.suburb.clone(),
        property_type: PropertyType::All,
        last_updated: house.last_updated.clone().or_else(|| unit.last_updated.clone()),
        current_quarter: house
            .current_quarter
            .clone()
            .or_else(|| unit.current_quarter.clone()),

        current_median_price: w.combine(house.current_median_price, unit.current_median_price),
        current_median_price_smoothed: w.combine(
            house.current_median_price_smoothed,
            unit.current_median_price_smoothed,
        ),
        current_avg_ctsd: w.combine(house.current_avg_ctsd, unit.current_avg_ctsd),
        current_num_sales: Some(total_sales),

        growth_1yr_percentage: w.combine(house.growth_1yr_percentage, unit.growth_1yr_percentage),
        growth_3yr_percentage: w.combine(house.growth_3yr_percentage, unit.growth_3yr_percentage),
        growth_5yr_percentage: w.combine(house.growth_5yr_percentage, unit.growth_5yr_percentage),
        growth_10yr_percentage: w.combine(
            house.growth_10yr_percentage,
            unit.growth_10yr_percentage,
        ),
        growth_since_2005_percentage: w.combine(
            house.growth_since_2005_percentage,
            unit.growth_since_2005_percentage,
        ),
        cagr_5yr: w.combine(house.cagr_5yr, unit.cagr_5yr),
        cagr_10yr: w.combine(house.cagr_10yr, unit.cagr_10yr),
        growth_1yr_percentage_smoothed: w.combine(
            house.growth_1yr_percentage_smoothed,
            unit.growth_1yr_percentage_smoothed,
        ),
        growth_3yr_percentage_smoothed: w.combine(
            house.growth_3yr_percentage_smoothed,
            unit.growth_3yr_percentage_smoothed,
        ),
        growth_5yr_percentage_smoothed: w.combine(
            house.growth_5yr_percentage_smoothed,
            unit.growth_5yr_percentage_smoothed,
        ),
        growth_10yr_percentage_smoothed: w.combine(
            house.growth_10yr_percentage_smoothed,
            unit.growth_10yr_percentage_smoothed,
        ),
        growth_since_2005_percentage_smoothed: w.combine(
            house.growth_since_2005_percentage_smoothed,
            unit.growth_since_2005_percentage_smoothed,
        ),
        cagr_5yr_smoothed: w.combine(house.cagr_5yr_smoothed, unit.cagr_5yr_smoothed),
        cagr_10yr_smoothed: w.combine(house.cagr_10yr_smoothed, unit.cagr_10yr_smoothed),

        volatility_score: w.combine(house.volatility_score, unit.volatility_score),
        max_drawdown_pct: w.combine(house.max_drawdown_pct, unit.max_drawdown_pct),
        recovery_quarters: w.combine(house.recovery_quarters, unit.recovery_quarters),
        avg_quarterly_volume: w.combine(house.avg_quarterly_volume, unit.avg_quarterly_volume),
        overall_liquidity_score: w.combine(
            house.overall_liquidity_score,
            unit.overall_liquidity_score,
        ),
        market_health_score: w.combine(house.market_health_score, unit.market_health_score),

        q1_avg_premium_percentage: w.combine(
            house.q1_avg_premium_percentage,
            unit.q1_avg_premium_percentage,
        ),
        q2_avg_premium_percentage: w.combine(
            house.q2_avg_premium_percentage,
            unit.q2_avg_premium_percentage,
        ),
        q3_avg_premium_percentage: w.combine(
            house.q3_avg_premium_percentage,
            unit.q3_avg_premium_percentage,
        ),
        q4_avg_premium_percentage: w.combine(
            house.q4_avg_premium_percentage,
            unit.q4_avg_premium_percentage,
        ),
        best_quarter_to_sell: house
            .best_quarter_to_sell
            .clone()
            .or_else(|| unit.best_quarter_to_sell.clone()),

        forecast_q1_price: w.combine(house.forecast_q1_price, unit.forecast_q1_price),
        forecast_q1_lower: w.combine(house.forecast_q1_lower, unit.forecast_q1_lower),
        forecast_q1_upper: w.combine(house.forecast_q1_upper, unit.forecast_q1_upper),
        forecast_q2_price: w.combine(house.forecast_q2_price, unit.forecast_q2_price),
        forecast_q2_lower: w.combine(house.forecast_q2_lower, unit.forecast_q2_lower),
        forecast_q2_upper: w.combine(house.forecast_q2_upper, unit.forecast_q2_upper),

        price_rank: w.combine(house.price_rank, unit.price_rank),
        growth_rank: w.combine(house.growth_rank, unit.growth_rank),
        speed_rank: w.combine(house.speed_rank, unit.speed_rank),

        total_quarters_with_data: w.combine(
            house.total_quarters_with_data,
            unit.total_quarters_with_data,
        ),
        data_completeness_percentage: w.combine(
            house.data_completeness_percentage,
            unit.data_completeness_percentage,
        ),
        price_quarterly: None,
        ctsd_quarterly: None,
    };

    Some(AggregatedSuburbAnalytics {
        combined,
        house_analytics: Some(house.clone()),
        unit_analytics: Some(unit.clone()),
    })
}
