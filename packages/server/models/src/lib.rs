#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the street crimes server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the upstream wire types to allow independent evolution of the API
//! contract (the upstream uses `snake_case`, this API uses `camelCase`).

use serde::{Deserialize, Serialize};
use street_crimes_police_models::{
    CategorySummary, CrimeIncident, Location, OutcomeStatus, QueryField, Street, ValidationError,
};

/// Query parameters for the crimes endpoint.
///
/// All three are raw text; validation happens in the client crate so
/// the API can report which field is missing or malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct CrimesQueryParams {
    /// Latitude text, e.g. `52.629729`.
    pub latitude: Option<String>,
    /// Longitude text, e.g. `-1.131592`.
    pub longitude: Option<String>,
    /// Month to query, as `YYYY-MM`.
    pub date: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Body of a validation failure response.
///
/// Serializes as `{ "error": { "field": …, "reason": …, "message": … } }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// The rejected query parameter.
    pub error: ApiFieldError,
}

impl From<ValidationError> for ApiErrorBody {
    fn from(error: ValidationError) -> Self {
        Self {
            error: ApiFieldError::from(error),
        }
    }
}

/// A query parameter that failed validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFieldError {
    /// Offending query parameter, serialized lowercase (`latitude`,
    /// `longitude`, or `date`).
    pub field: QueryField,
    /// Rejection reason slug, `required` or `invalid`.
    pub reason: String,
    /// User-facing message, e.g. `Latitude is required.`.
    pub message: String,
}

impl From<ValidationError> for ApiFieldError {
    fn from(error: ValidationError) -> Self {
        let field = error.field();
        let message = match error {
            ValidationError::Required(_) => format!("{} is required.", field.display_name()),
            ValidationError::Invalid(_) => format!("{} is invalid.", field.display_name()),
        };
        Self {
            field,
            reason: error.reason().to_string(),
            message,
        }
    }
}

/// One category of crimes as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategorySummary {
    /// Category slug shared by every incident in `crimes`.
    pub category: String,
    /// Incidents in upstream order.
    pub crimes: Vec<ApiCrimeIncident>,
}

impl From<CategorySummary> for ApiCategorySummary {
    fn from(summary: CategorySummary) -> Self {
        Self {
            category: summary.category,
            crimes: summary
                .crimes
                .into_iter()
                .map(ApiCrimeIncident::from)
                .collect(),
        }
    }
}

/// A crime incident as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrimeIncident {
    /// Crime category slug.
    pub category: Option<String>,
    /// How the location was recorded (`Force` or `BTP`).
    pub location_type: Option<String>,
    /// Approximate incident location.
    pub location: Option<ApiLocation>,
    /// Month the crime was reported, as `YYYY-MM`.
    pub month: Option<String>,
    /// Latest investigation outcome, if any.
    pub outcome_status: Option<ApiOutcomeStatus>,
}

impl From<CrimeIncident> for ApiCrimeIncident {
    fn from(incident: CrimeIncident) -> Self {
        Self {
            category: incident.category,
            location_type: incident.location_type,
            location: incident.location.map(ApiLocation::from),
            month: incident.month,
            outcome_status: incident.outcome_status.map(ApiOutcomeStatus::from),
        }
    }
}

/// Anonymized incident location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    /// Latitude as decimal text.
    pub latitude: Option<String>,
    /// Longitude as decimal text.
    pub longitude: Option<String>,
    /// Street the incident was snapped to.
    pub street: Option<ApiStreet>,
}

impl From<Location> for ApiLocation {
    fn from(location: Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            street: location.street.map(ApiStreet::from),
        }
    }
}

/// Street reference within a location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStreet {
    /// Upstream street identifier.
    pub id: Option<i64>,
    /// Human-readable street description.
    pub name: Option<String>,
}

impl From<Street> for ApiStreet {
    fn from(street: Street) -> Self {
        Self {
            id: street.id,
            name: street.name,
        }
    }
}

/// Investigation outcome attached to an incident.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOutcomeStatus {
    /// Outcome category.
    pub category: Option<String>,
    /// Month the outcome was recorded, as `YYYY-MM`.
    pub date: Option<String>,
}

impl From<OutcomeStatus> for ApiOutcomeStatus {
    fn from(outcome: OutcomeStatus) -> Self {
        Self {
            category: outcome.category,
            date: outcome.date,
        }
    }
}
