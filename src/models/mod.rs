// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Direction, FurnishingState, Lead, LeadPriority, ListingProfile, MatchResult, PreferenceProfile,
    Property, ScoreBreakdown, ScoringWeights,
};
pub use requests::{ScoreRequest, SuggestionQuery};
pub use responses::{ErrorResponse, HealthResponse, SuggestionsResponse};
