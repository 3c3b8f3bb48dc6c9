//! Parsing and grouping of street-crime responses.

use std::collections::BTreeMap;

use street_crimes_police_models::{CategorySummary, CrimeIncident};

/// Parses a response body into category summaries.
///
/// An empty upstream array is a successful, empty result.
///
/// # Errors
///
/// Returns the JSON error when `body` is not an array of incident
/// records.
pub fn aggregate(body: &str) -> Result<Vec<CategorySummary>, serde_json::Error> {
    let incidents: Vec<CrimeIncident> = serde_json::from_str(body)?;
    Ok(group_by_category(incidents))
}

/// Groups incidents by category.
///
/// Groups come back in ascending byte order of the category key, and
/// within a group the incidents keep the order they had upstream.
/// Incidents without a category are collected under the empty string;
/// a record is never dropped for lacking one.
#[must_use]
pub fn group_by_category(incidents: Vec<CrimeIncident>) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<String, Vec<CrimeIncident>> = BTreeMap::new();
    for incident in incidents {
        let key = incident.category.clone().unwrap_or_default();
        groups.entry(key).or_default().push(incident);
    }
    groups
        .into_iter()
        .map(|(category, crimes)| CategorySummary { category, crimes })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(category: Option<&str>, month: &str) -> CrimeIncident {
        CrimeIncident {
            category: category.map(String::from),
            location_type: None,
            location: None,
            month: Some(month.to_string()),
            outcome_status: None,
        }
    }

    #[test]
    fn groups_sorted_by_category_keeping_source_order() {
        let summaries = group_by_category(vec![
            incident(Some("burglary"), "2024-01"),
            incident(Some("anti-social-behaviour"), "2024-01"),
            incident(Some("burglary"), "2024-02"),
        ]);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].category, "anti-social-behaviour");
        assert_eq!(summaries[1].category, "burglary");
        let months: Vec<_> = summaries[1]
            .crimes
            .iter()
            .map(|c| c.month.as_deref().unwrap())
            .collect();
        assert_eq!(months, vec!["2024-01", "2024-02"]);
    }

    #[test]
    fn missing_category_groups_under_empty_string() {
        let summaries = group_by_category(vec![
            incident(Some("burglary"), "2024-01"),
            incident(None, "2024-01"),
        ]);

        // The empty string sorts before every non-empty key.
        assert_eq!(summaries[0].category, "");
        assert_eq!(summaries[0].crimes.len(), 1);
        assert_eq!(summaries[1].category, "burglary");
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let summaries = group_by_category(vec![
            incident(Some("Burglary"), "2024-01"),
            incident(Some("burglary"), "2024-01"),
        ]);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].category, "Burglary");
        assert_eq!(summaries[1].category, "burglary");
    }

    #[test]
    fn empty_array_is_an_empty_result() {
        assert_eq!(aggregate("[]").unwrap(), Vec::new());
    }

    #[test]
    fn non_array_body_is_an_error() {
        assert!(aggregate("{\"error\":\"quota\"}").is_err());
        assert!(aggregate("not json at all").is_err());
        assert!(aggregate("null").is_err());
    }

    #[test]
    fn duplicate_records_are_kept() {
        let summaries = group_by_category(vec![
            incident(Some("drugs"), "2024-01"),
            incident(Some("drugs"), "2024-01"),
        ]);
        assert_eq!(summaries[0].crimes.len(), 2);
    }
}
