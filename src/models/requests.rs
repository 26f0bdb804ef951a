use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Lead, Property};

/// Paging over a ranked suggestion list
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SuggestionQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
    #[serde(default)]
    pub offset: usize,
}

impl SuggestionQuery {
    /// Requested page size, falling back to `default_limit` and capped at `max_limit`
    pub fn effective_limit(&self, default_limit: u16, max_limit: u16) -> usize {
        self.limit.unwrap_or(default_limit).min(max_limit) as usize
    }
}

/// Ad-hoc ranking of a caller-supplied candidate set
///
/// ```json
/// {
///   "direction": "LEAD_TO_PROPERTIES",
///   "lead": { "lead_id": 1, "bedrooms": 3, ... },
///   "candidates": [ { "property_id": 7, "price": 5500000, ... } ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreRequest {
    LeadToProperties { lead: Lead, candidates: Vec<Property> },
    PropertyToLeads { property: Property, candidates: Vec<Lead> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds() {
        let query = SuggestionQuery { limit: Some(0), offset: 0 };
        assert!(query.validate().is_err());

        let query = SuggestionQuery { limit: Some(101), offset: 0 };
        assert!(query.validate().is_err());

        let query = SuggestionQuery { limit: Some(100), offset: 0 };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(SuggestionQuery::default().effective_limit(20, 100), 20);
        let query = SuggestionQuery { limit: Some(80), offset: 0 };
        assert_eq!(query.effective_limit(20, 50), 50);
    }

    #[test]
    fn test_score_request_tagged_by_direction() {
        let request: ScoreRequest = serde_json::from_value(serde_json::json!({
            "direction": "PROPERTY_TO_LEADS",
            "property": { "property_id": 3, "price": 100.0, "bedrooms": 2, "bathrooms": 1 },
            "candidates": [{ "lead_id": 9, "budget_max": 200.0 }]
        }))
        .unwrap();

        match request {
            ScoreRequest::PropertyToLeads { property, candidates } => {
                assert_eq!(property.property_id, Some(3));
                assert_eq!(candidates.len(), 1);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }
}
