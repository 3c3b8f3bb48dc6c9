#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Record types for the UK Police street-crime API and validation of
//! query parameters.
//!
//! The wire types mirror the JSON shape of
//! `https://data.police.uk/api/crimes-street/all-crime`. Query text is
//! validated up front through [`CrimeQuery::parse`], so anything holding
//! a [`CrimeQuery`] is guaranteed to carry a usable latitude, longitude,
//! and `YYYY-MM` month.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// A single reported street-level crime as returned by the API.
///
/// Every field is optional: the upstream data set is patchy and records
/// routinely omit location or outcome details. Records carry no unique
/// identifier, so duplicates in a response stay duplicates here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeIncident {
    /// Crime category slug, e.g. `burglary`. Missing for a small number
    /// of historical records.
    pub category: Option<String>,
    /// How the location was recorded (`Force` or `BTP`).
    pub location_type: Option<String>,
    /// Approximate location of the incident.
    pub location: Option<Location>,
    /// Month the crime was reported, as `YYYY-MM`.
    pub month: Option<String>,
    /// Latest investigation outcome, if any has been recorded.
    pub outcome_status: Option<OutcomeStatus>,
}

/// Anonymized location of an incident, snapped to a street.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude as decimal text.
    pub latitude: Option<String>,
    /// Longitude as decimal text.
    pub longitude: Option<String>,
    /// Street the incident was snapped to.
    pub street: Option<Street>,
}

/// Street reference within a [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    /// Upstream street identifier.
    pub id: Option<i64>,
    /// Human-readable street description, e.g. `On or near High Street`.
    pub name: Option<String>,
}

/// Investigation outcome attached to an incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeStatus {
    /// Outcome category, e.g. `Investigation complete; no suspect identified`.
    pub category: Option<String>,
    /// Month the outcome was recorded, as `YYYY-MM`.
    pub date: Option<String>,
}

/// All incidents sharing one category.
///
/// `crimes` keeps the relative order the records had in the upstream
/// response. Incidents without a category are grouped under the empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category slug shared by every incident in `crimes`.
    pub category: String,
    /// Incidents in upstream order.
    pub crimes: Vec<CrimeIncident>,
}

/// Query parameter names, used to report which input failed validation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QueryField {
    /// The latitude parameter.
    Latitude,
    /// The longitude parameter.
    Longitude,
    /// The `YYYY-MM` month parameter.
    Date,
}

impl QueryField {
    /// Returns the capitalized field name for user-facing messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Latitude => "Latitude",
            Self::Longitude => "Longitude",
            Self::Date => "Date",
        }
    }
}

/// Error returned when a query parameter is missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field was empty or contained only whitespace.
    #[error("{} is required", .0.display_name())]
    Required(QueryField),
    /// The field was present but not a usable value.
    #[error("{} is invalid", .0.display_name())]
    Invalid(QueryField),
}

impl ValidationError {
    /// Returns the field this error refers to.
    #[must_use]
    pub const fn field(self) -> QueryField {
        match self {
            Self::Required(field) | Self::Invalid(field) => field,
        }
    }

    /// Returns the rejection reason as a lowercase slug, `required` or
    /// `invalid`.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Required(_) => "required",
            Self::Invalid(_) => "invalid",
        }
    }
}

/// A validated street-crime query.
///
/// Holds the exact text the caller supplied. [`CrimeQuery::parse`] is the
/// only way to construct one, so every instance satisfies the coordinate
/// range and date shape rules, and the text can be echoed into a request
/// URL unchanged (no reformatting, no precision loss).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrimeQuery {
    latitude: String,
    longitude: String,
    date: String,
}

impl CrimeQuery {
    /// Validates the three query inputs and captures their exact text.
    ///
    /// Fields are checked in order (latitude, longitude, date) and the
    /// first violation is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when a field is empty or
    /// whitespace-only, and [`ValidationError::Invalid`] when a field
    /// fails to parse or is out of range.
    pub fn parse(latitude: &str, longitude: &str, date: &str) -> Result<Self, ValidationError> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        validate_date(date)?;
        Ok(Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            date: date.to_string(),
        })
    }

    /// The latitude text exactly as supplied by the caller.
    #[must_use]
    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    /// The longitude text exactly as supplied by the caller.
    #[must_use]
    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    /// The `YYYY-MM` month text exactly as supplied by the caller.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }
}

/// Checks that `text` is a finite decimal latitude within `[-90, 90]`.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for blank input, otherwise
/// [`ValidationError::Invalid`].
pub fn validate_latitude(text: &str) -> Result<(), ValidationError> {
    validate_coordinate(text, QueryField::Latitude, 90.0)
}

/// Checks that `text` is a finite decimal longitude within `[-180, 180]`.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for blank input, otherwise
/// [`ValidationError::Invalid`].
pub fn validate_longitude(text: &str) -> Result<(), ValidationError> {
    validate_coordinate(text, QueryField::Longitude, 180.0)
}

fn validate_coordinate(text: &str, field: QueryField, bound: f64) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    let value: f64 = text.parse().map_err(|_| ValidationError::Invalid(field))?;
    if !value.is_finite() || value.abs() > bound {
        return Err(ValidationError::Invalid(field));
    }
    Ok(())
}

/// Checks that `text` is a strict `YYYY-MM` month.
///
/// The shape check insists on four year digits and two month digits
/// (`2024-1` is rejected even though a lenient date parser would take
/// it), then the month is checked to denote a real calendar month.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for blank input, otherwise
/// [`ValidationError::Invalid`].
pub fn validate_date(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required(QueryField::Date));
    }
    let pattern = Regex::new(r"^\d{4}-\d{2}$").unwrap_or_else(|_| unreachable!());
    if !pattern.is_match(text) {
        return Err(ValidationError::Invalid(QueryField::Date));
    }
    let (year, month) = text.split_once('-').unwrap_or_else(|| unreachable!());
    let year: i32 = year
        .parse()
        .map_err(|_| ValidationError::Invalid(QueryField::Date))?;
    let month: u32 = month
        .parse()
        .map_err(|_| ValidationError::Invalid(QueryField::Date))?;
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(ValidationError::Invalid(QueryField::Date));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_query_preserving_text() {
        let query = CrimeQuery::parse("52.629729", "-1.131592", "2024-01").unwrap();
        assert_eq!(query.latitude(), "52.629729");
        assert_eq!(query.longitude(), "-1.131592");
        assert_eq!(query.date(), "2024-01");

        // Trailing zeros are caller precision, not noise.
        let query = CrimeQuery::parse("51.50", "-0.10", "2021-12").unwrap();
        assert_eq!(query.latitude(), "51.50");
        assert_eq!(query.longitude(), "-0.10");
    }

    #[test]
    fn boundary_coordinates_are_valid() {
        assert!(validate_latitude("90").is_ok());
        assert!(validate_latitude("-90").is_ok());
        assert!(validate_latitude("90.0").is_ok());
        assert!(validate_longitude("180").is_ok());
        assert!(validate_longitude("-180").is_ok());
        assert!(validate_longitude("0").is_ok());
    }

    #[test]
    fn blank_fields_are_required() {
        assert_eq!(
            validate_latitude(""),
            Err(ValidationError::Required(QueryField::Latitude))
        );
        assert_eq!(
            validate_longitude("   "),
            Err(ValidationError::Required(QueryField::Longitude))
        );
        assert_eq!(
            validate_date("\t"),
            Err(ValidationError::Required(QueryField::Date))
        );
    }

    #[test]
    fn first_violation_wins() {
        let err = CrimeQuery::parse("", "", "").unwrap_err();
        assert_eq!(err, ValidationError::Required(QueryField::Latitude));

        let err = CrimeQuery::parse("52.6", "abc", "nope").unwrap_err();
        assert_eq!(err, ValidationError::Invalid(QueryField::Longitude));

        let err = CrimeQuery::parse("52.6", "-1.1", "2024-13").unwrap_err();
        assert_eq!(err, ValidationError::Invalid(QueryField::Date));
    }

    #[test]
    fn non_numeric_coordinates_are_invalid() {
        assert_eq!(
            validate_latitude("abc"),
            Err(ValidationError::Invalid(QueryField::Latitude))
        );
        assert_eq!(
            validate_latitude("12.3.4"),
            Err(ValidationError::Invalid(QueryField::Latitude))
        );
        assert_eq!(
            validate_longitude("1,5"),
            Err(ValidationError::Invalid(QueryField::Longitude))
        );
        // Surrounding whitespace would leak into the request URL.
        assert_eq!(
            validate_latitude(" 52.6 "),
            Err(ValidationError::Invalid(QueryField::Latitude))
        );
    }

    #[test]
    fn out_of_range_coordinates_are_invalid() {
        assert_eq!(
            validate_latitude("90.000001"),
            Err(ValidationError::Invalid(QueryField::Latitude))
        );
        assert_eq!(
            validate_latitude("-91"),
            Err(ValidationError::Invalid(QueryField::Latitude))
        );
        assert_eq!(
            validate_longitude("180.5"),
            Err(ValidationError::Invalid(QueryField::Longitude))
        );
        assert_eq!(
            validate_longitude("-200"),
            Err(ValidationError::Invalid(QueryField::Longitude))
        );
    }

    #[test]
    fn non_finite_coordinates_are_invalid() {
        // `f64::from_str` accepts all of these, the range rules do not.
        for text in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert_eq!(
                validate_latitude(text),
                Err(ValidationError::Invalid(QueryField::Latitude)),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn date_shape_must_be_strict() {
        for text in ["2024-1", "24-01", "2024-012", "2024/01", "202401", "2024-01-01"] {
            assert_eq!(
                validate_date(text),
                Err(ValidationError::Invalid(QueryField::Date)),
                "{text} should be rejected"
            );
        }
        assert!(validate_date("2024-01").is_ok());
        assert!(validate_date("1999-06").is_ok());
    }

    #[test]
    fn date_month_must_exist() {
        assert_eq!(
            validate_date("2024-00"),
            Err(ValidationError::Invalid(QueryField::Date))
        );
        assert_eq!(
            validate_date("2024-13"),
            Err(ValidationError::Invalid(QueryField::Date))
        );
        assert!(validate_date("2024-12").is_ok());
    }

    #[test]
    fn validation_error_display() {
        assert_eq!(
            ValidationError::Required(QueryField::Latitude).to_string(),
            "Latitude is required"
        );
        assert_eq!(
            ValidationError::Invalid(QueryField::Date).to_string(),
            "Date is invalid"
        );
        assert_eq!(
            ValidationError::Required(QueryField::Longitude).field(),
            QueryField::Longitude
        );
        assert_eq!(
            ValidationError::Required(QueryField::Longitude).reason(),
            "required"
        );
        assert_eq!(ValidationError::Invalid(QueryField::Date).reason(), "invalid");
    }

    #[test]
    fn query_field_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&QueryField::Latitude).unwrap(),
            "\"latitude\""
        );
        assert_eq!(QueryField::Date.to_string(), "date");
        assert_eq!("longitude".parse::<QueryField>().unwrap(), QueryField::Longitude);
    }

    #[test]
    fn incident_deserializes_full_record() {
        let body = serde_json::json!({
            "category": "anti-social-behaviour",
            "location_type": "Force",
            "location": {
                "latitude": "52.640961",
                "longitude": "-1.126371",
                "street": { "id": 884_343, "name": "On or near Wharf Street North" }
            },
            "month": "2024-01",
            "outcome_status": {
                "category": "Investigation complete; no suspect identified",
                "date": "2024-03"
            }
        });
        let incident: CrimeIncident = serde_json::from_value(body).unwrap();
        assert_eq!(incident.category.as_deref(), Some("anti-social-behaviour"));
        assert_eq!(incident.location_type.as_deref(), Some("Force"));
        let location = incident.location.unwrap();
        assert_eq!(location.latitude.as_deref(), Some("52.640961"));
        let street = location.street.unwrap();
        assert_eq!(street.id, Some(884_343));
        assert_eq!(street.name.as_deref(), Some("On or near Wharf Street North"));
        let outcome = incident.outcome_status.unwrap();
        assert_eq!(outcome.date.as_deref(), Some("2024-03"));
    }

    #[test]
    fn incident_deserializes_sparse_record() {
        // Missing keys and explicit nulls both land as `None`.
        let incident: CrimeIncident =
            serde_json::from_value(serde_json::json!({ "category": "burglary" })).unwrap();
        assert_eq!(incident.category.as_deref(), Some("burglary"));
        assert!(incident.location.is_none());
        assert!(incident.outcome_status.is_none());

        let incident: CrimeIncident = serde_json::from_value(serde_json::json!({
            "category": null,
            "outcome_status": null
        }))
        .unwrap();
        assert!(incident.category.is_none());
        assert!(incident.outcome_status.is_none());
    }
}
