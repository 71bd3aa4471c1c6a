//! Combining house and unit quarterly series into one "all properties"
//! series.

use std::collections::BTreeMap;

use sydney_property_models::{PropertyType, QuarterlyStat};

use crate::guards::number;

fn mean_of<F>(items: &[&QuarterlyStat], field: F) -> Option<f64>
where
    F: Fn(&QuarterlyStat) -> Option<f64>,
{
    let values: Vec<f64> = items.iter().filter_map(|q| number(field(q))).collect();
    if values.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Collapses records sharing a (year, quarter) into one.
///
/// Only applies when `property_type` is [`PropertyType::All`]; other types
/// are returned unchanged. In a merged record the median and mean prices
/// and median settlement days are means of the non-null member values,
/// `num_sales` is summed, and every other field is taken from the first
/// member. Percentiles and spread are therefore approximate.
///
/// The result is sorted by (year, quarter).
#[must_use]
pub fn merge_quarterly_data(
    series: &[QuarterlyStat],
    property_type: PropertyType,
) -> Vec<QuarterlyStat> {
    if property_type != PropertyType::All {
        return series.to_vec();
    }

    let mut groups: BTreeMap<(i32, u8), Vec<&QuarterlyStat>> = BTreeMap::new();
    for stat in series {
        groups.entry((stat.year, stat.quarter)).or_default().push(stat);
    }

    groups
        .into_values()
        .filter_map(|members| {
            let (first, rest) = members.split_first()?;
            if rest.is_empty() {
                return Some((*first).clone());
            }

            Some(QuarterlyStat {
                median_price: mean_of(&members, |q| q.median_price),
                median_price_smoothed: mean_of(&members, |q| q.median_price_smoothed),
                mean_price: mean_of(&members, |q| q.mean_price),
                median_ctsd: mean_of(&members, |q| q.median_ctsd),
                num_sales: members.iter().map(|q| q.num_sales).sum(),
                ..(*first).clone()
            })
        })
        .collect()
}

/// Concatenates house and unit series, ordered by (year, quarter) with
/// house records first within a quarter.
#[must_use]
pub fn combine_quarterly(house: Vec<QuarterlyStat>, unit: Vec<QuarterlyStat>) -> Vec<QuarterlyStat> {
    let mut combined = house;
    combined.extend(unit);
    combined.sort_by_key(|q| (q.year, q.quarter));
    combined
}
