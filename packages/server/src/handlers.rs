//! HTTP handler functions for the street crimes API.

use actix_web::{HttpResponse, web};
use street_crimes_client::ClientError;
use street_crimes_server_models::{ApiCategorySummary, ApiErrorBody, ApiHealth, CrimesQueryParams};

use crate::AppState;

/// Message for failures the caller can do nothing about.
const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Message when the upstream rate limit held through every retry.
const RATE_LIMITED_MESSAGE: &str = "The crime data service is busy. Please try again later.";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/crimes`
///
/// Fetches street-level crimes near a point for one month, grouped by
/// category. Absent query parameters are passed through as empty text so
/// validation reports them as required fields.
pub async fn crimes(
    state: web::Data<AppState>,
    params: web::Query<CrimesQueryParams>,
) -> HttpResponse {
    let latitude = params.latitude.as_deref().unwrap_or_default();
    let longitude = params.longitude.as_deref().unwrap_or_default();
    let date = params.date.as_deref().unwrap_or_default();

    match state
        .crime_client
        .get_crime_summaries(latitude, longitude, date)
        .await
    {
        Ok(summaries) => {
            let summaries: Vec<ApiCategorySummary> = summaries
                .into_iter()
                .map(ApiCategorySummary::from)
                .collect();
            HttpResponse::Ok().json(summaries)
        }
        Err(e) => error_response(&e),
    }
}

/// Maps a client error to an HTTP response.
///
/// Validation failures name the offending field and why it was
/// rejected. Everything else is logged in full and reported with a
/// message safe to show to a user.
fn error_response(error: &ClientError) -> HttpResponse {
    match error {
        ClientError::Validation(e) => HttpResponse::BadRequest().json(ApiErrorBody::from(*e)),
        ClientError::RateLimitExhausted { attempts } => {
            log::error!("Upstream rate limit exhausted after {attempts} attempts");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": { "message": RATE_LIMITED_MESSAGE }
            }))
        }
        ClientError::UpstreamStatus { status } => {
            log::error!("Upstream returned HTTP {status}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": { "message": GENERIC_ERROR_MESSAGE }
            }))
        }
        ClientError::Transport(e) => {
            log::error!("Failed to reach upstream: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": { "message": GENERIC_ERROR_MESSAGE }
            }))
        }
        ClientError::Parse(e) => {
            log::error!("Failed to parse upstream response: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": { "message": GENERIC_ERROR_MESSAGE }
            }))
        }
    }
}
