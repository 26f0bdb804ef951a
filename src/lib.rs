//! Estate Match - lead/property compatibility matching for the real-estate CRM
//!
//! This library provides the scoring engine used to recommend properties to a
//! lead and, symmetrically, leads to a property. Data access and HTTP
//! transport live in `services` and `routes`; the engine itself is pure.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{CandidatePolicy, CompatibilityEngine, MatchError, RankedMatches, MINIMUM_MATCH_SCORE};
pub use models::{Direction, Lead, MatchResult, Property, ScoreBreakdown, ScoringWeights};
