//! Fetch orchestration on top of [`AnalyticsApi`].
//!
//! Parallel branches are joined with wait-for-all semantics. Where a
//! function tolerates partial failure, the failed branch is logged at
//! `warn` and replaced with an empty value.

use futures::future::{join, join_all, join4};
use sydney_property_analytics::filters::PropertyTypeAnalytics;
use sydney_property_analytics::{aggregate_analytics, combine_quarterly, summarize_by_suburb};
use sydney_property_models::{
    AnalyticsQuery, AnalyticsView, BulkSuburbsData, PropertyCounts, PropertyType, SuburbData,
    SuburbSummary,
};

use crate::pagination::fetch_all_analytics;
use crate::{AnalyticsApi, ClientError};

fn or_empty<T>(result: Result<Vec<T>, ClientError>, what: &str, suburb: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log::warn!("Failed to fetch {what} for {suburb}: {e}");
        Vec::new()
    })
}

/// Fetches analytics and quarterly history for one suburb.
///
/// For [`PropertyType::All`] the house and unit records are fetched in
/// parallel, each failure counting as "no records", and combined with
/// [`aggregate_analytics`]; the quarterly series is both types ordered by
/// quarter. For a single type, analytics and quarterly are fetched in
/// parallel and errors propagate.
///
/// Returns `Ok(None)` when there are no analytics for the suburb.
///
/// # Errors
///
/// Returns [`ClientError`] if a single-type request fails.
pub async fn fetch_suburb_data(
    api: &dyn AnalyticsApi,
    suburb: &str,
    property_type: PropertyType,
) -> Result<Option<SuburbData>, ClientError> {
    if property_type == PropertyType::All {
        let (house, unit, house_quarterly, unit_quarterly) = join4(
            api.suburb_analytics(suburb, PropertyType::House),
            api.suburb_analytics(suburb, PropertyType::Unit),
            api.suburb_quarterly(suburb, PropertyType::House, None, None),
            api.suburb_quarterly(suburb, PropertyType::Unit, None, None),
        )
        .await;

        let house = or_empty(house, "house analytics", suburb);
        let unit = or_empty(unit, "unit analytics", suburb);

        let Some(aggregated) = aggregate_analytics(house.first(), unit.first()) else {
            return Ok(None);
        };

        let quarterly = combine_quarterly(
            or_empty(house_quarterly, "house quarterly stats", suburb),
            or_empty(unit_quarterly, "unit quarterly stats", suburb),
        );

        return Ok(Some(SuburbData {
            analytics: AnalyticsView::Aggregated(aggregated),
            quarterly,
        }));
    }

    let (analytics, quarterly) = join(
        api.suburb_analytics(suburb, property_type),
        api.suburb_quarterly(suburb, property_type, None, None),
    )
    .await;

    let Some(analytics) = analytics?.into_iter().next() else {
        return Ok(None);
    };

    Ok(Some(SuburbData {
        analytics: AnalyticsView::Single(analytics),
        quarterly: quarterly?,
    }))
}

/// Fetches [`SuburbData`] for several suburbs in parallel.
///
/// Suburbs that fail or have no analytics are left out without affecting
/// the others.
pub async fn fetch_bulk_suburbs_data(
    api: &dyn AnalyticsApi,
    suburbs: &[String],
    property_type: PropertyType,
) -> BulkSuburbsData {
    let results = join_all(suburbs.iter().map(|suburb| async move {
        (suburb, fetch_suburb_data(api, suburb, property_type).await)
    }))
    .await;

    results
        .into_iter()
        .filter_map(|(suburb, result)| match result {
            Ok(Some(data)) => Some((suburb.clone(), data)),
            Ok(None) => {
                log::debug!("No analytics for {suburb}");
                None
            }
            Err(e) => {
                log::warn!("Failed to fetch data for {suburb}: {e}");
                None
            }
        })
        .collect()
}

/// Lists every analytics record and rolls them up per suburb.
///
/// # Errors
///
/// Returns [`ClientError`] if any page request fails.
pub async fn fetch_suburb_summaries(
    api: &dyn AnalyticsApi,
) -> Result<Vec<SuburbSummary>, ClientError> {
    let records = fetch_all_analytics(api, &AnalyticsQuery::default()).await?;
    let summaries = summarize_by_suburb(&records);
    log::info!(
        "Summarized {} analytics records into {} suburbs",
        records.len(),
        summaries.len()
    );
    Ok(summaries)
}

/// Maps each suburb to its analytics for one property type.
///
/// [`PropertyType::All`] and failed requests yield an empty map.
pub async fn fetch_property_type_analytics(
    api: &dyn AnalyticsApi,
    property_type: PropertyType,
) -> PropertyTypeAnalytics {
    if property_type == PropertyType::All {
        return PropertyTypeAnalytics::new();
    }

    let query = AnalyticsQuery {
        property_type,
        ..AnalyticsQuery::default()
    };

    match fetch_all_analytics(api, &query).await {
        Ok(records) => records.into_iter().map(|a| (a.suburb.clone(), a)).collect(),
        Err(e) => {
            log::warn!("Failed to fetch {property_type} analytics: {e}");
            PropertyTypeAnalytics::new()
        }
    }
}

async fn current_sales(api: &dyn AnalyticsApi, suburb: &str, property_type: PropertyType) -> u64 {
    match api.suburb_analytics(suburb, property_type).await {
        Ok(records) => records
            .first()
            .and_then(|a| a.current_num_sales)
            .unwrap_or(0),
        Err(e) => {
            log::warn!("Failed to fetch {property_type} sales for {suburb}: {e}");
            0
        }
    }
}

/// Sums current house and unit sales across the selected suburbs.
///
/// Each failed lookup counts as zero. Returns `None` for an empty
/// selection.
pub async fn fetch_property_counts(
    api: &dyn AnalyticsApi,
    suburbs: &[String],
) -> Option<PropertyCounts> {
    if suburbs.is_empty() {
        return None;
    }

    let (house, unit) = join(
        join_all(suburbs.iter().map(|s| current_sales(api, s, PropertyType::House))),
        join_all(suburbs.iter().map(|s| current_sales(api, s, PropertyType::Unit))),
    )
    .await;

    let house: u64 = house.into_iter().sum();
    let unit: u64 = unit.into_iter().sum();

    Some(PropertyCounts {
        all: house + unit,
        house,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use sydney_property_models::{
        AnalyticsListResponse, QuarterlyStat, SuburbAnalytics, SuburbSearchResponse,
    };

    use super::*;

    #[derive(Default)]
    struct FakeApi {
        analytics: Vec<SuburbAnalytics>,
        quarterly: Vec<QuarterlyStat>,
        failing: BTreeSet<String>,
        calls: AtomicUsize,
        list_offsets: Mutex<Vec<u64>>,
    }

    impl FakeApi {
        fn check(&self, suburb: &str) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(suburb) {
                return Err(ClientError::Status {
                    status: 500,
                    message: "backend down".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AnalyticsApi for FakeApi {
        async fn list_analytics(
            &self,
            query: &AnalyticsQuery,
        ) -> Result<AnalyticsListResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let offset = query.offset.unwrap_or(0);
            let limit = query.limit.unwrap_or(100);
            self.list_offsets.lock().unwrap().push(offset);

            let matching: Vec<_> = self
                .analytics
                .iter()
                .filter(|a| {
                    query.property_type == PropertyType::All
                        || a.property_type == query.property_type
                })
                .cloned()
                .collect();

            let items = matching
                .iter()
                .skip(usize::try_from(offset).unwrap())
                .take(usize::try_from(limit).unwrap())
                .cloned()
                .collect();

            Ok(AnalyticsListResponse {
                items,
                total: matching.len() as u64,
                limit,
                offset,
            })
        }

        async fn suburb_analytics(
            &self,
            suburb: &str,
            property_type: PropertyType,
        ) -> Result<Vec<SuburbAnalytics>, ClientError> {
            self.check(suburb)?;
            let found: Vec<_> = self
                .analytics
                .iter()
                .filter(|a| a.suburb == suburb && a.property_type == property_type)
                .cloned()
                .collect();
            if found.is_empty() {
                return Err(ClientError::NotFound {
                    message: format!("Analytics not found for suburb: {suburb}"),
                });
            }
            Ok(found)
        }

        async fn suburb_quarterly(
            &self,
            suburb: &str,
            property_type: PropertyType,
            _start_year: Option<i32>,
            _end_year: Option<i32>,
        ) -> Result<Vec<QuarterlyStat>, ClientError> {
            self.check(suburb)?;
            Ok(self
                .quarterly
                .iter()
                .filter(|q| q.suburb == suburb && q.property_type == property_type)
                .cloned()
                .collect())
        }

        async fn search_suburbs(
            &self,
            _query: &str,
            _limit: u32,
        ) -> Result<SuburbSearchResponse, ClientError> {
            Ok(SuburbSearchResponse::default())
        }
    }

    fn analytics(suburb: &str, property_type: PropertyType, sales: u64, price: f64) -> SuburbAnalytics {
        SuburbAnalytics {
            suburb: suburb.to_string(),
            property_type,
            current_num_sales: Some(sales),
            current_median_price: Some(price),
            ..SuburbAnalytics::default()
        }
    }

    fn quarter(suburb: &str, property_type: PropertyType, year: i32, q: u8) -> QuarterlyStat {
        QuarterlyStat {
            suburb: suburb.to_string(),
            property_type,
            year,
            quarter: q,
            num_sales: 5,
            ..QuarterlyStat::default()
        }
    }

    fn fake() -> FakeApi {
        FakeApi {
            analytics: vec![
                analytics("BONDI", PropertyType::House, 30, 1_000_000.0),
                analytics("BONDI", PropertyType::Unit, 10, 600_000.0),
                analytics("MANLY", PropertyType::Unit, 8, 900_000.0),
            ],
            quarterly: vec![
                quarter("BONDI", PropertyType::Unit, 2024, 1),
                quarter("BONDI", PropertyType::House, 2024, 1),
                quarter("BONDI", PropertyType::House, 2023, 4),
            ],
            ..FakeApi::default()
        }
    }

    #[tokio::test]
    async fn all_types_are_aggregated() {
        let api = fake();
        let data = fetch_suburb_data(&api, "BONDI", PropertyType::All)
            .await
            .unwrap()
            .unwrap();

        let AnalyticsView::Aggregated(aggregated) = &data.analytics else {
            panic!("expected aggregated analytics");
        };
        let price = aggregated.combined.current_median_price.unwrap();
        assert!((price - 900_000.0).abs() < 1e-6);
        assert_eq!(aggregated.combined.current_num_sales, Some(40));

        let order: Vec<_> = data
            .quarterly
            .iter()
            .map(|q| (q.year, q.quarter, q.property_type))
            .collect();
        assert_eq!(
            order,
            vec![
                (2023, 4, PropertyType::House),
                (2024, 1, PropertyType::House),
                (2024, 1, PropertyType::Unit),
            ]
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn all_types_tolerate_missing_side() {
        let api = fake();
        let data = fetch_suburb_data(&api, "MANLY", PropertyType::All)
            .await
            .unwrap()
            .unwrap();
        let view = data.analytics.analytics();
        assert_eq!(view.property_type, PropertyType::All);
        assert_eq!(view.current_median_price, Some(900_000.0));
    }

    #[tokio::test]
    async fn unknown_suburb_is_none_for_all_types() {
        let api = fake();
        assert!(
            fetch_suburb_data(&api, "NOWHERE", PropertyType::All)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn single_type_propagates_errors() {
        let api = fake();
        let err = fetch_suburb_data(&api, "MANLY", PropertyType::House)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found"));

        let data = fetch_suburb_data(&api, "MANLY", PropertyType::Unit)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(data.analytics, AnalyticsView::Single(_)));
    }

    #[tokio::test]
    async fn bulk_drops_failures_and_missing_suburbs() {
        let api = FakeApi {
            failing: ["MANLY".to_string()].into(),
            ..fake()
        };
        let suburbs = vec![
            "BONDI".to_string(),
            "MANLY".to_string(),
            "NOWHERE".to_string(),
        ];

        let bulk = fetch_bulk_suburbs_data(&api, &suburbs, PropertyType::All).await;
        assert_eq!(bulk.keys().collect::<Vec<_>>(), vec!["BONDI"]);

        let bulk = fetch_bulk_suburbs_data(&api, &suburbs, PropertyType::Unit).await;
        assert_eq!(bulk.keys().collect::<Vec<_>>(), vec!["BONDI"]);
    }

    #[tokio::test]
    async fn summaries_page_through_every_record() {
        let analytics: Vec<SuburbAnalytics> = (0..1157)
            .map(|i| analytics(&format!("SUBURB {i:04}"), PropertyType::House, 1, 1.0))
            .collect();
        let api = FakeApi {
            analytics,
            ..FakeApi::default()
        };

        let summaries = fetch_suburb_summaries(&api).await.unwrap();
        assert_eq!(summaries.len(), 1157);
        assert_eq!(*api.list_offsets.lock().unwrap(), vec![0, 1000]);
    }

    #[tokio::test]
    async fn summaries_average_across_types() {
        let summaries = fetch_suburb_summaries(&fake()).await.unwrap();
        let by_suburb: BTreeMap<_, _> = summaries
            .iter()
            .map(|s| (s.suburb.as_str(), s.current_median_price))
            .collect();
        assert_eq!(by_suburb["BONDI"], Some(800_000.0));
        assert_eq!(by_suburb["MANLY"], Some(900_000.0));
    }

    #[tokio::test]
    async fn property_type_analytics_map() {
        let api = fake();
        let units = fetch_property_type_analytics(&api, PropertyType::Unit).await;
        assert_eq!(units.len(), 2);
        assert_eq!(units["MANLY"].current_num_sales, Some(8));

        let calls = api.calls.load(Ordering::SeqCst);
        assert!(fetch_property_type_analytics(&api, PropertyType::All).await.is_empty());
        assert_eq!(api.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn property_counts_treat_failures_as_zero() {
        let api = fake();
        assert_eq!(fetch_property_counts(&api, &[]).await, None);

        let counts = fetch_property_counts(&api, &["BONDI".to_string(), "MANLY".to_string()])
            .await
            .unwrap();
        assert_eq!(
            counts,
            PropertyCounts {
                all: 48,
                house: 30,
                unit: 18,
            }
        );
    }
}
