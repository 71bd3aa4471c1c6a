//! HTTP handler functions for the dashboard routes.

use actix_files::NamedFile;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, mime, web};
use sydney_property_analytics::chart::{comparison_chart, comparison_rows, sales_growth_bars};
use sydney_property_analytics::filters::MAX_SELECTED_SUBURBS;
use sydney_property_analytics_models::{GrowthPeriod, TimePeriod};
use sydney_property_client::DEFAULT_SEARCH_LIMIT;
use sydney_property_client::fetch::{
    fetch_bulk_suburbs_data, fetch_property_counts, fetch_suburb_data, fetch_suburb_summaries,
};
use sydney_property_server_models::{
    ApiErrorResponse, ApiHealth, BulkSuburbsParams, ComparisonParams, ComparisonResponse,
    MAX_BULK_SUBURBS, PropertyCountsParams, SearchParams, SuburbParams, split_suburbs,
};

use crate::AppState;

fn error_response(err: &ApiErrorResponse) -> HttpResponse {
    let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(err)
}

/// Parses and validates a comma-separated `suburbs` parameter.
fn suburb_list(param: Option<&str>, max: usize) -> Result<Vec<String>, ApiErrorResponse> {
    let param = param
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiErrorResponse::bad_request("Suburbs parameter is required"))?;

    let suburbs = split_suburbs(param);
    if suburbs.is_empty() {
        return Err(ApiErrorResponse::bad_request(
            "At least one suburb is required",
        ));
    }
    if suburbs.len() > max {
        return Err(ApiErrorResponse::bad_request(format!(
            "Maximum {max} suburbs allowed"
        )));
    }
    Ok(suburbs)
}

const fn chart_period(period: GrowthPeriod) -> TimePeriod {
    match period {
        GrowthPeriod::OneYear => TimePeriod::OneYear,
        GrowthPeriod::ThreeYears => TimePeriod::ThreeYears,
        GrowthPeriod::FiveYears => TimePeriod::FiveYears,
        GrowthPeriod::All => TimePeriod::Max,
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/suburb/{suburb_name}`
///
/// Analytics and quarterly history for one suburb, combining houses and
/// units unless `type` narrows it.
pub async fn suburb(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<SuburbParams>,
) -> HttpResponse {
    let suburb = path.into_inner();
    let suburb = suburb.trim();
    if suburb.is_empty() {
        return error_response(&ApiErrorResponse::bad_request("Suburb name is required"));
    }

    let not_found = || ApiErrorResponse::not_found(format!("No data found for suburb: {suburb}"));

    match fetch_suburb_data(state.api.as_ref(), suburb, params.property_type).await {
        Ok(Some(data)) => HttpResponse::Ok().json(data),
        Ok(None) => error_response(&not_found()),
        Err(e) if e.to_string().contains("not found") => error_response(&not_found()),
        Err(e) => {
            log::error!("Failed to load suburb data for {suburb}: {e}");
            error_response(&ApiErrorResponse::internal(
                "Failed to load suburb data",
                e.to_string(),
            ))
        }
    }
}

/// `GET /api/suburbs-analytics`
///
/// Suburb data for up to five suburbs keyed by name. Suburbs that fail to
/// load are left out.
pub async fn suburbs_analytics(
    state: web::Data<AppState>,
    params: web::Query<BulkSuburbsParams>,
) -> HttpResponse {
    let suburbs = match suburb_list(params.suburbs.as_deref(), MAX_BULK_SUBURBS) {
        Ok(suburbs) => suburbs,
        Err(e) => return error_response(&e),
    };

    let data = fetch_bulk_suburbs_data(state.api.as_ref(), &suburbs, params.property_type).await;
    HttpResponse::Ok().json(data)
}

/// `GET /api/summaries`
///
/// One headline row per suburb for the map and sidebar.
pub async fn summaries(state: web::Data<AppState>) -> HttpResponse {
    match fetch_suburb_summaries(state.api.as_ref()).await {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(e) => {
            log::error!("Failed to load suburb summaries: {e}");
            error_response(&ApiErrorResponse::from_failure(
                &e.to_string(),
                "Failed to load suburb summaries",
            ))
        }
    }
}

/// `GET /api/search`
pub async fn search(state: web::Data<AppState>, params: web::Query<SearchParams>) -> HttpResponse {
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    match state.api.search_suburbs(params.q.trim(), limit).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => {
            log::error!("Failed to search suburbs for {:?}: {e}", params.q);
            error_response(&ApiErrorResponse::from_failure(
                &e.to_string(),
                "Failed to search suburbs",
            ))
        }
    }
}

/// `GET /api/property-counts`
///
/// Current house and unit sales summed over the selected suburbs.
pub async fn property_counts(
    state: web::Data<AppState>,
    params: web::Query<PropertyCountsParams>,
) -> HttpResponse {
    let suburbs = match suburb_list(params.suburbs.as_deref(), MAX_SELECTED_SUBURBS) {
        Ok(suburbs) => suburbs,
        Err(e) => return error_response(&e),
    };

    HttpResponse::Ok().json(fetch_property_counts(state.api.as_ref(), &suburbs).await)
}

/// `GET /api/comparison`
///
/// Growth table rows, a median price time series and sales growth bars
/// for up to five suburbs.
pub async fn comparison(
    state: web::Data<AppState>,
    params: web::Query<ComparisonParams>,
) -> HttpResponse {
    let suburbs = match suburb_list(params.suburbs.as_deref(), MAX_BULK_SUBURBS) {
        Ok(suburbs) => suburbs,
        Err(e) => return error_response(&e),
    };

    let data = fetch_bulk_suburbs_data(state.api.as_ref(), &suburbs, params.property_type).await;
    let period = chart_period(params.period);

    HttpResponse::Ok().json(ComparisonResponse {
        period: params.period,
        period_label: params.period.label().to_string(),
        rows: comparison_rows(&data, params.period, params.smoothed),
        prices: comparison_chart(&data, period, params.smoothed),
        sales_growth: sales_growth_bars(&data, period),
    })
}

/// `GET /sydney_suburbs.geojson`
pub async fn boundaries(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match NamedFile::open_async(&state.boundaries_path).await {
        Ok(file) => file
            .set_content_type(mime::APPLICATION_JSON)
            .into_response(&req),
        Err(e) => {
            log::warn!(
                "Failed to open suburb boundaries at {}: {e}",
                state.boundaries_path.display()
            );
            error_response(&ApiErrorResponse::not_found("Suburb boundaries not found"))
        }
    }
}
