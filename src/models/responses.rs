use serde::{Deserialize, Serialize};

use crate::core::RankedMatches;
use crate::models::domain::{Direction, MatchResult};

/// One page of a ranked suggestion list
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionsResponse<C> {
    pub request_id: uuid::Uuid,
    pub direction: Direction,
    pub matches: Vec<MatchResult<C>>,
    pub total_candidates: usize,
    pub total_matches: usize,
    pub skipped: Vec<usize>,
    pub offset: usize,
    pub limit: usize,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl<C> SuggestionsResponse<C> {
    /// Cut a page out of a full ranking
    pub fn page(ranked: RankedMatches<C>, offset: usize, limit: usize) -> Self {
        let total_matches = ranked.matches.len();
        let matches = ranked.matches.into_iter().skip(offset).take(limit).collect();

        Self {
            request_id: uuid::Uuid::new_v4(),
            direction: ranked.direction,
            matches,
            total_candidates: ranked.total_candidates,
            total_matches,
            skipped: ranked.skipped,
            offset,
            limit,
            generated_at: chrono::Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
