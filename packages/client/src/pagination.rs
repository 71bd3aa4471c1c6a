//! Offset pagination over list endpoints.

use std::future::Future;

use sydney_property_analytics::filters::API_PAGE_LIMIT;
use sydney_property_models::{AnalyticsQuery, SuburbAnalytics};

use crate::{AnalyticsApi, ClientError};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total records reported by the server across all pages.
    pub total: u64,
}

/// Fetches pages until a short or empty page is returned or the
/// accumulated count reaches the reported total.
///
/// `fetch_page` receives the offset of the page to fetch.
///
/// # Errors
///
/// Returns the first error produced by `fetch_page`; records from earlier
/// pages are discarded.
pub async fn paginate<T, E, F, Fut>(page_size: u64, mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch_page(offset).await?;
        let count = page.items.len() as u64;
        items.extend(page.items);

        log::debug!(
            "Fetched page at offset {offset}: {count} records ({}/{})",
            items.len(),
            page.total
        );

        if count == 0 || count < page_size || items.len() as u64 >= page.total {
            break;
        }
        offset += count;
    }

    Ok(items)
}

/// Lists every analytics record matching `query`, ignoring its own
/// `limit` and `offset`.
///
/// # Errors
///
/// Returns [`ClientError`] if any page request fails.
pub async fn fetch_all_analytics(
    api: &dyn AnalyticsApi,
    query: &AnalyticsQuery,
) -> Result<Vec<SuburbAnalytics>, ClientError> {
    paginate(API_PAGE_LIMIT, |offset| {
        let page_query = AnalyticsQuery {
            limit: Some(API_PAGE_LIMIT),
            offset: Some(offset),
            ..query.clone()
        };
        async move {
            let resp = api.list_analytics(&page_query).await?;
            Ok(Page {
                items: resp.items,
                total: resp.total,
            })
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn pages(total: u64, page_size: u64) -> impl FnMut(u64) -> std::future::Ready<Result<Page<u64>, ()>> {
        move |offset| {
            let end = (offset + page_size).min(total);
            std::future::ready(Ok(Page {
                items: (offset..end).collect(),
                total,
            }))
        }
    }

    #[tokio::test]
    async fn stops_on_short_page() {
        let offsets = RefCell::new(Vec::new());
        let mut inner = pages(1157, 1000);
        let items = paginate(1000, |offset| {
            offsets.borrow_mut().push(offset);
            inner(offset)
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 1157);
        assert_eq!(offsets.into_inner(), vec![0, 1000]);
    }

    #[tokio::test]
    async fn stops_when_total_reached_on_full_page() {
        let offsets = RefCell::new(Vec::new());
        let mut inner = pages(2000, 1000);
        let items = paginate(1000, |offset| {
            offsets.borrow_mut().push(offset);
            inner(offset)
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 2000);
        assert_eq!(offsets.into_inner(), vec![0, 1000]);
    }

    #[tokio::test]
    async fn stops_on_empty_page_even_if_total_is_wrong() {
        let calls = RefCell::new(0);
        let items: Vec<u64> = paginate(10, |_| {
            *calls.borrow_mut() += 1;
            std::future::ready(Ok::<_, ()>(Page {
                items: Vec::new(),
                total: 500,
            }))
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(calls.into_inner(), 1);
    }

    #[tokio::test]
    async fn propagates_page_errors() {
        let result: Result<Vec<u64>, &str> = paginate(10, |offset| {
            std::future::ready(if offset == 0 {
                Ok(Page {
                    items: (0..10).collect(),
                    total: 30,
                })
            } else {
                Err("boom")
            })
        })
        .await;

        assert_eq!(result, Err("boom"));
    }
}
