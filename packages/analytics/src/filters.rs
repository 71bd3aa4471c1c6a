//! Suburb search and price filtering for the map view.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sydney_property_models::{PropertyType, SuburbAnalytics, SuburbSummary};

/// Upper bound of the price filter, in dollars.
pub const MAX_PRICE_RANGE: f64 = 35_000_000.0;

/// Most suburbs that can be selected for comparison at once.
pub const MAX_SELECTED_SUBURBS: usize = 10;

/// Page size used when listing analytics from the backend.
pub const API_PAGE_LIMIT: u64 = 1000;

/// Autocomplete returns at most this many suggestions.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Suburb name to its analytics for a single property type.
pub type PropertyTypeAnalytics = BTreeMap<String, SuburbAnalytics>;

/// Inclusive median price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(0.0, MAX_PRICE_RANGE)
    }
}

/// Current map filter selections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuburbFilter {
    /// Case-insensitive substring of the suburb name. Empty matches all.
    pub search_term: String,
    pub price_range: PriceRange,
    pub property_type: PropertyType,
}

/// Trims and uppercases a suburb name to match boundary feature names.
#[must_use]
pub fn normalize_suburb_name(suburb: &str) -> String {
    suburb.trim().to_uppercase()
}

/// Median price used for filtering and colouring a suburb.
///
/// Uses the summary price for [`PropertyType::All`] and the property-type
/// analytics otherwise. Suburbs without a summary have no price.
#[must_use]
pub fn suburb_median_price(
    suburb: &str,
    property_type: PropertyType,
    summaries: &[SuburbSummary],
    type_analytics: &PropertyTypeAnalytics,
) -> Option<f64> {
    let summary = summaries.iter().find(|s| s.suburb == suburb)?;

    if property_type == PropertyType::All {
        return summary.current_median_price;
    }

    type_analytics
        .get(suburb)
        .and_then(|a| a.current_median_price)
}

/// Normalized names of the suburbs matching the search term whose price
/// lies inside the range. Suburbs without a price never match.
#[must_use]
pub fn filter_suburbs(
    summaries: &[SuburbSummary],
    filter: &SuburbFilter,
    type_analytics: &PropertyTypeAnalytics,
) -> BTreeSet<String> {
    let term = filter.search_term.to_lowercase();

    summaries
        .iter()
        .filter(|s| s.suburb.to_lowercase().contains(&term))
        .filter(|s| {
            suburb_median_price(&s.suburb, filter.property_type, summaries, type_analytics)
                .is_some_and(|price| filter.price_range.contains(price))
        })
        .map(|s| normalize_suburb_name(&s.suburb))
        .collect()
}

/// Autocomplete suggestions from an already-filtered set, alphabetical.
///
/// An empty term yields no suggestions.
#[must_use]
pub fn search_results(filtered: &BTreeSet<String>, search_term: &str) -> Vec<String> {
    if search_term.is_empty() {
        return Vec::new();
    }

    let term = search_term.to_lowercase();
    filtered
        .iter()
        .filter(|s| s.to_lowercase().contains(&term))
        .take(MAX_SEARCH_RESULTS)
        .cloned()
        .collect()
}

/// Normalized suburb name to the price shown on the map.
#[must_use]
pub fn suburb_price_map(
    summaries: &[SuburbSummary],
    property_type: PropertyType,
    type_analytics: &PropertyTypeAnalytics,
) -> BTreeMap<String, Option<f64>> {
    summaries
        .iter()
        .map(|s| {
            (
                normalize_suburb_name(&s.suburb),
                suburb_median_price(&s.suburb, property_type, summaries, type_analytics),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(suburb: &str, price: Option<f64>) -> SuburbSummary {
        SuburbSummary {
            suburb: suburb.to_string(),
            current_median_price: price,
            growth_5yr_percentage: None,
            current_avg_ctsd: None,
        }
    }

    fn summaries() -> Vec<SuburbSummary> {
        vec![
            summary("Glebe", Some(1_600_000.0)),
            summary("Glenfield", Some(850_000.0)),
            summary("Point Piper", Some(30_000_000.0)),
            summary("Pyrmont", None),
        ]
    }

    fn unit_analytics() -> PropertyTypeAnalytics {
        let mut map = PropertyTypeAnalytics::new();
        map.insert(
            "Glebe".to_string(),
            SuburbAnalytics {
                current_median_price: Some(700_000.0),
                ..SuburbAnalytics::default()
            },
        );
        map
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_suburb_name("  Surry Hills "), "SURRY HILLS");
    }

    #[test]
    fn median_price_by_property_type() {
        let summaries = summaries();
        let analytics = unit_analytics();
        assert_eq!(
            suburb_median_price("Glebe", PropertyType::All, &summaries, &analytics),
            Some(1_600_000.0)
        );
        assert_eq!(
            suburb_median_price("Glebe", PropertyType::Unit, &summaries, &analytics),
            Some(700_000.0)
        );
        assert_eq!(
            suburb_median_price("Glenfield", PropertyType::Unit, &summaries, &analytics),
            None
        );
        assert_eq!(
            suburb_median_price("Unknown", PropertyType::All, &summaries, &analytics),
            None
        );
    }

    #[test]
    fn filters_by_term_and_inclusive_range() {
        let filter = SuburbFilter {
            search_term: "gle".to_string(),
            price_range: PriceRange::new(850_000.0, 2_000_000.0),
            property_type: PropertyType::All,
        };
        let filtered = filter_suburbs(&summaries(), &filter, &PropertyTypeAnalytics::new());
        assert_eq!(
            filtered.into_iter().collect::<Vec<_>>(),
            vec!["GLEBE", "GLENFIELD"]
        );

        let all = filter_suburbs(
            &summaries(),
            &SuburbFilter::default(),
            &PropertyTypeAnalytics::new(),
        );
        assert_eq!(all.len(), 3);
        assert!(!all.contains("PYRMONT"));
    }

    #[test]
    fn search_results_are_capped() {
        let filtered: BTreeSet<String> = (0..15).map(|i| format!("SUBURB {i:02}")).collect();
        assert_eq!(search_results(&filtered, "suburb").len(), MAX_SEARCH_RESULTS);
        assert!(search_results(&filtered, "").is_empty());
        assert_eq!(search_results(&filtered, "14"), vec!["SUBURB 14"]);
    }

    #[test]
    fn price_map_uses_normalized_names() {
        let map = suburb_price_map(&summaries(), PropertyType::All, &PropertyTypeAnalytics::new());
        assert_eq!(map["POINT PIPER"], Some(30_000_000.0));
        assert_eq!(map["PYRMONT"], None);
    }
}
