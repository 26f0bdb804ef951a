use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::scoring::score_pair;
use crate::models::{
    Direction, Lead, ListingProfile, MatchResult, PreferenceProfile, Property, ScoreBreakdown,
    ScoringWeights,
};

/// Candidates scoring below this are dropped from the ranking
pub const MINIMUM_MATCH_SCORE: u32 = 37;

/// Errors for structurally invalid input. Attribute mismatches are never
/// errors, they score 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid candidate at position {position}: {reason}")]
    InvalidCandidate { position: usize, reason: String },
}

impl MatchError {
    fn shifted(self, offset: usize) -> Self {
        match self {
            MatchError::InvalidCandidate { position, reason } => MatchError::InvalidCandidate {
                position: position + offset,
                reason,
            },
            other => other,
        }
    }
}

/// What to do with a candidate that has no identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidatePolicy {
    /// Log it, record its position and keep scoring the rest
    #[default]
    Skip,
    /// Fail the whole call with `MatchError::InvalidCandidate`
    Reject,
}

/// An entity that can be ranked against a reference
pub trait MatchCandidate: Clone {
    type Profile;

    /// Direction in which this type shows up as a candidate
    const DIRECTION: Direction;

    fn candidate_id(&self) -> Option<i32>;

    fn candidate_profile(&self) -> Self::Profile;
}

/// An entity that candidates are ranked against
///
/// The reference type fixes the direction and the candidate type, so a lead
/// can only ever be matched against properties and vice versa.
pub trait MatchReference {
    type Profile;
    type Candidate: MatchCandidate;

    /// Snapshot used for scoring, or the reason it cannot be scored
    fn reference_profile(&self) -> Result<Self::Profile, MatchError>;

    fn score_against(
        profile: &Self::Profile,
        candidate: &<Self::Candidate as MatchCandidate>::Profile,
        weights: &ScoringWeights,
    ) -> (ScoreBreakdown, Vec<i32>);
}

impl MatchCandidate for Property {
    type Profile = ListingProfile;
    const DIRECTION: Direction = Direction::LeadToProperties;

    fn candidate_id(&self) -> Option<i32> {
        self.property_id
    }

    fn candidate_profile(&self) -> ListingProfile {
        self.listing_profile()
    }
}

impl MatchCandidate for Lead {
    type Profile = PreferenceProfile;
    const DIRECTION: Direction = Direction::PropertyToLeads;

    fn candidate_id(&self) -> Option<i32> {
        self.lead_id
    }

    fn candidate_profile(&self) -> PreferenceProfile {
        self.preference_profile()
    }
}

impl MatchReference for Lead {
    type Profile = PreferenceProfile;
    type Candidate = Property;

    fn reference_profile(&self) -> Result<PreferenceProfile, MatchError> {
        let profile = self.preference_profile();
        if !profile.has_scorable_fields() {
            return Err(MatchError::InvalidReference(
                "lead has no scorable preferences".to_string(),
            ));
        }
        Ok(profile)
    }

    fn score_against(
        profile: &PreferenceProfile,
        candidate: &ListingProfile,
        weights: &ScoringWeights,
    ) -> (ScoreBreakdown, Vec<i32>) {
        score_pair(profile, candidate, weights)
    }
}

impl MatchReference for Property {
    type Profile = ListingProfile;
    type Candidate = Lead;

    fn reference_profile(&self) -> Result<ListingProfile, MatchError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(MatchError::InvalidReference(format!(
                "property price must be a non-negative amount, got {}",
                self.price
            )));
        }
        Ok(self.listing_profile())
    }

    fn score_against(
        profile: &ListingProfile,
        candidate: &PreferenceProfile,
        weights: &ScoringWeights,
    ) -> (ScoreBreakdown, Vec<i32>) {
        // Same rule, roles swapped
        score_pair(candidate, profile, weights)
    }
}

/// Result of ranking one candidate set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatches<C> {
    pub direction: Direction,
    pub matches: Vec<MatchResult<C>>,
    pub total_candidates: usize,
    /// Input positions of candidates skipped as invalid
    pub skipped: Vec<usize>,
}

impl<C> RankedMatches<C> {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Bidirectional lead/property compatibility ranking
///
/// # Pipeline
/// 1. Validate the reference and build its profile
/// 2. Score every candidate with the shared comparators
/// 3. Drop candidates below the minimum score
/// 4. Sort by score descending, candidate id ascending
///
/// Stateless and pure: inputs are borrowed, never mutated, and every call
/// returns fresh results. Safe to share across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityEngine {
    weights: ScoringWeights,
    minimum_score: u32,
    candidate_policy: CandidatePolicy,
}

impl CompatibilityEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            minimum_score: MINIMUM_MATCH_SCORE,
            candidate_policy: CandidatePolicy::default(),
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn with_minimum_score(mut self, minimum_score: u32) -> Self {
        self.minimum_score = minimum_score;
        self
    }

    pub fn with_candidate_policy(mut self, policy: CandidatePolicy) -> Self {
        self.candidate_policy = policy;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn minimum_score(&self) -> u32 {
        self.minimum_score
    }

    pub fn candidate_policy(&self) -> CandidatePolicy {
        self.candidate_policy
    }

    /// Score a single pair without applying the minimum score
    pub fn score<R: MatchReference>(
        &self,
        reference: &R,
        candidate: &R::Candidate,
    ) -> Result<ScoreBreakdown, MatchError> {
        let profile = reference.reference_profile()?;
        let (breakdown, _) = R::score_against(&profile, &candidate.candidate_profile(), &self.weights);
        Ok(breakdown)
    }

    /// Rank candidates against a reference
    ///
    /// # Arguments
    /// * `reference` - A lead (ranks properties) or a property (ranks leads)
    /// * `candidates` - Pre-loaded candidates of the opposite type, amenities resolved
    ///
    /// # Returns
    /// Candidates at or above the minimum score, best first. An empty ranking
    /// is a successful result.
    pub fn rank_candidates<R: MatchReference>(
        &self,
        reference: &R,
        candidates: &[R::Candidate],
    ) -> Result<RankedMatches<R::Candidate>, MatchError> {
        let profile = reference.reference_profile()?;
        self.rank_profile::<R>(&profile, candidates)
    }

    /// Same ranking as `rank_candidates`, with fixed-size shards scored in parallel
    ///
    /// Shards are merged with `merge_ranked`, so the output is identical to
    /// the sequential run, including which invalid candidate is reported
    /// under `CandidatePolicy::Reject`.
    pub fn rank_candidates_sharded<R>(
        &self,
        reference: &R,
        candidates: &[R::Candidate],
        shard_size: usize,
    ) -> Result<RankedMatches<R::Candidate>, MatchError>
    where
        R: MatchReference,
        R::Profile: Sync,
        R::Candidate: Send + Sync,
    {
        let profile = reference.reference_profile()?;
        let shard_size = shard_size.max(1);

        let shards: Vec<Result<RankedMatches<R::Candidate>, MatchError>> = candidates
            .par_chunks(shard_size)
            .enumerate()
            .map(|(index, shard)| {
                self.rank_profile::<R>(&profile, shard)
                    .map_err(|e| e.shifted(index * shard_size))
            })
            .collect();

        let parts = shards.into_iter().collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Ranked {} candidates in {} shards of up to {}",
            candidates.len(),
            parts.len(),
            shard_size
        );

        Ok(merge_ranked(parts))
    }

    fn rank_profile<R: MatchReference>(
        &self,
        profile: &R::Profile,
        candidates: &[R::Candidate],
    ) -> Result<RankedMatches<R::Candidate>, MatchError> {
        let direction = <R::Candidate as MatchCandidate>::DIRECTION;
        let mut skipped = Vec::new();
        let mut matches = Vec::new();

        for (position, candidate) in candidates.iter().enumerate() {
            let Some(candidate_id) = candidate.candidate_id() else {
                match self.candidate_policy {
                    CandidatePolicy::Reject => {
                        return Err(MatchError::InvalidCandidate {
                            position,
                            reason: "missing identifier".to_string(),
                        });
                    }
                    CandidatePolicy::Skip => {
                        tracing::warn!(
                            "Skipping candidate at position {} ({}): missing identifier",
                            position,
                            direction
                        );
                        skipped.push(position);
                        continue;
                    }
                }
            };

            let (breakdown, shared_amenity_ids) =
                R::score_against(profile, &candidate.candidate_profile(), &self.weights);
            let match_score = breakdown.total();

            if match_score >= self.minimum_score {
                matches.push(MatchResult {
                    candidate_id,
                    match_score,
                    breakdown,
                    shared_amenity_ids,
                    candidate: candidate.clone(),
                });
            }
        }

        sort_matches(&mut matches);

        tracing::debug!(
            "{}: {} of {} candidates cleared minimum score {} ({} skipped)",
            direction,
            matches.len(),
            candidates.len(),
            self.minimum_score,
            skipped.len()
        );

        Ok(RankedMatches {
            direction,
            matches,
            total_candidates: candidates.len(),
            skipped,
        })
    }
}

impl Default for CompatibilityEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Merge rankings of consecutive shards of one candidate list
///
/// Parts must be given in input order. Skipped positions are offset by the
/// sizes of the preceding shards so they index into the combined input.
pub fn merge_ranked<C: MatchCandidate>(
    parts: impl IntoIterator<Item = RankedMatches<C>>,
) -> RankedMatches<C> {
    let mut merged = RankedMatches {
        direction: C::DIRECTION,
        matches: Vec::new(),
        total_candidates: 0,
        skipped: Vec::new(),
    };

    for part in parts {
        let offset = merged.total_candidates;
        merged.skipped.extend(part.skipped.into_iter().map(|p| p + offset));
        merged.total_candidates += part.total_candidates;
        merged.matches.extend(part.matches);
    }

    sort_matches(&mut merged.matches);
    merged
}

/// Score descending, then candidate id ascending. Stable, so equal keys keep input order.
fn sort_matches<C>(matches: &mut [MatchResult<C>]) {
    matches.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
}
