//! HTTP implementation of [`AnalyticsApi`].

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use sydney_property_models::{
    AnalyticsListResponse, AnalyticsQuery, PropertyType, QuarterlyStat, SuburbAnalytics,
    SuburbSearchResponse,
};

use crate::{API_URL_ENV, AnalyticsApi, ClientError, DEFAULT_API_URL};

/// Backend client over `reqwest`.
///
/// No retries are attempted; every failure is returned to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Creates a client for the URL in `SYDNEY_PROPERTY_API_URL`, falling
    /// back to `http://localhost:8000`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        log::info!("Using analytics API at {base_url}");
        Self::new(base_url)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base_url}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl {
            message: format!("{}: {e}", self.base_url),
        })?;

        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                message: format!("{} cannot be a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        context: &str,
        not_found: Option<String>,
    ) -> Result<T, ClientError> {
        log::debug!("GET {url} {query:?}");
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND
            && let Some(message) = not_found
        {
            return Err(ClientError::NotFound { message });
        }

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: format!(
                    "{context}: {}",
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn property_type_pair(property_type: PropertyType) -> Option<(&'static str, String)> {
    property_type
        .as_filter()
        .map(|filter| ("property_type", filter.to_string()))
}

#[async_trait]
impl AnalyticsApi for ApiClient {
    async fn list_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsListResponse, ClientError> {
        let url = self.endpoint(&["api", "analytics"])?;
        self.get_json(url, &query.to_query_pairs(), "Failed to fetch analytics", None)
            .await
    }

    async fn suburb_analytics(
        &self,
        suburb: &str,
        property_type: PropertyType,
    ) -> Result<Vec<SuburbAnalytics>, ClientError> {
        let url = self.endpoint(&["api", "analytics", suburb])?;
        let query: Vec<_> = property_type_pair(property_type).into_iter().collect();
        self.get_json(
            url,
            &query,
            "Failed to fetch suburb analytics",
            Some(format!("Analytics not found for suburb: {suburb}")),
        )
        .await
    }

    async fn suburb_quarterly(
        &self,
        suburb: &str,
        property_type: PropertyType,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<Vec<QuarterlyStat>, ClientError> {
        let url = self.endpoint(&["api", "quarterly", suburb])?;

        let mut query: Vec<_> = property_type_pair(property_type).into_iter().collect();
        if let Some(start_year) = start_year {
            query.push(("start_year", start_year.to_string()));
        }
        if let Some(end_year) = end_year {
            query.push(("end_year", end_year.to_string()));
        }

        self.get_json(
            url,
            &query,
            "Failed to fetch quarterly stats",
            Some(format!("Quarterly stats not found for suburb: {suburb}")),
        )
        .await
    }

    async fn search_suburbs(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<SuburbSearchResponse, ClientError> {
        let url = self.endpoint(&["api", "analytics", "search", "suburbs"])?;
        self.get_json(
            url,
            &[("q", query.to_string()), ("limit", limit.to_string())],
            "Failed to search suburbs",
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, HttpServer, dev::ServerHandle, web};

    use super::*;

    /// Serves canned backend responses on an ephemeral local port.
    fn spawn_backend() -> (ApiClient, ServerHandle) {
        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/api/analytics",
                    web::get().to(|| async {
                        HttpResponse::Ok()
                            .content_type("application/json")
                            .body(r#"{"items":[],"total":0,"limit":1000,"offset":0}"#)
                    }),
                )
                .route(
                    "/api/analytics/search/suburbs",
                    web::get().to(|| async { HttpResponse::NotFound().finish() }),
                )
                .route(
                    "/api/analytics/{suburb}",
                    web::get().to(|| async { HttpResponse::NotFound().finish() }),
                )
                .route(
                    "/api/quarterly/{suburb}",
                    web::get().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (ApiClient::new(format!("http://{addr}")), handle)
    }

    #[actix_web::test]
    async fn maps_backend_statuses_to_errors() {
        let (client, handle) = spawn_backend();

        let list = client.list_analytics(&AnalyticsQuery::default()).await.unwrap();
        assert_eq!(list.total, 0);
        assert_eq!(list.limit, 1000);

        let err = client
            .suburb_analytics("BONDI", PropertyType::House)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            &err,
            ClientError::NotFound { message } if message == "Analytics not found for suburb: BONDI"
        ));

        let err = client
            .suburb_quarterly("BONDI", PropertyType::All, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            ClientError::Status { status: 503, message }
                if message == "Failed to fetch quarterly stats: Service Unavailable"
        ));

        let err = client.search_suburbs("bon", 5).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));

        handle.stop(true).await;
    }

    #[test]
    fn trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn encodes_suburb_path_segments() {
        let client = ApiClient::new("http://localhost:8000");
        let url = client.endpoint(&["api", "analytics", "ST IVES/CHASE"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/analytics/ST%20IVES%2FCHASE"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let client = ApiClient::new("https://example.com/backend");
        let url = client.endpoint(&["api", "quarterly", "BONDI"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/api/quarterly/BONDI");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let client = ApiClient::new("not a url");
        assert!(matches!(
            client.endpoint(&["api"]),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn property_type_filter_pairs() {
        assert_eq!(property_type_pair(PropertyType::All), None);
        assert_eq!(
            property_type_pair(PropertyType::Unit),
            Some(("property_type", "unit".to_string()))
        );
    }
}
