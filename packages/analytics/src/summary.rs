//! Per-suburb rollups of analytics records.

use std::collections::BTreeMap;

use sydney_property_models::{SuburbAnalytics, SuburbSummary};

use crate::guards::number;

#[derive(Default)]
struct Accumulator {
    prices: Vec<f64>,
    growths: Vec<f64>,
    ctsds: Vec<f64>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Groups analytics records by suburb and averages price, 5-year growth and
/// settlement days across property types. Each metric ignores missing
/// values independently.
///
/// Summaries are returned in suburb-name order.
#[must_use]
pub fn summarize_by_suburb(records: &[SuburbAnalytics]) -> Vec<SuburbSummary> {
    let mut by_suburb: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for record in records {
        let acc = by_suburb.entry(record.suburb.as_str()).or_default();
        acc.prices.extend(number(record.current_median_price));
        acc.growths.extend(number(record.growth_5yr_percentage));
        acc.ctsds.extend(number(record.current_avg_ctsd));
    }

    by_suburb
        .into_iter()
        .map(|(suburb, acc)| SuburbSummary {
            suburb: suburb.to_string(),
            current_median_price: mean(&acc.prices),
            growth_5yr_percentage: mean(&acc.growths),
            current_avg_ctsd: mean(&acc.ctsds),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sydney_property_models::PropertyType;

    use super::*;

    fn record(
        suburb: &str,
        property_type: PropertyType,
        price: Option<f64>,
        growth: Option<f64>,
    ) -> SuburbAnalytics {
        SuburbAnalytics {
            suburb: suburb.to_string(),
            property_type,
            current_median_price: price,
            growth_5yr_percentage: growth,
            ..SuburbAnalytics::default()
        }
    }

    #[test]
    fn averages_each_metric_ignoring_nulls() {
        let records = vec![
            record("NEWTOWN", PropertyType::House, Some(1_800_000.0), None),
            record("NEWTOWN", PropertyType::Unit, Some(800_000.0), Some(12.0)),
            record("ASHFIELD", PropertyType::Unit, None, None),
        ];

        let summaries = summarize_by_suburb(&records);
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].suburb, "ASHFIELD");
        assert_eq!(summaries[0].current_median_price, None);

        assert_eq!(summaries[1].suburb, "NEWTOWN");
        assert_eq!(summaries[1].current_median_price, Some(1_300_000.0));
        assert_eq!(summaries[1].growth_5yr_percentage, Some(12.0));
        assert_eq!(summaries[1].current_avg_ctsd, None);
    }

    #[test]
    fn empty_input() {
        assert!(summarize_by_suburb(&[]).is_empty());
    }
}
