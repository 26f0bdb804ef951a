// Core algorithm exports
pub mod amenities;
pub mod attributes;
pub mod budget;
pub mod matcher;
pub mod scoring;

pub use amenities::{amenity_points, shared_amenities};
pub use attributes::{city_points, furnishing_points, location_points, property_type_points, room_count_points};
pub use budget::{budget_points, BudgetRange};
pub use matcher::{
    merge_ranked, CandidatePolicy, CompatibilityEngine, MatchCandidate, MatchError, MatchReference,
    RankedMatches, MINIMUM_MATCH_SCORE,
};
pub use scoring::score_pair;
