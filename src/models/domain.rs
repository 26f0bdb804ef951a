use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Which side of the CRM is asking for recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// A lead is the reference, properties are ranked
    LeadToProperties,
    /// A property is the reference, leads are ranked
    PropertyToLeads,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::LeadToProperties => f.write_str("LEAD_TO_PROPERTIES"),
            Direction::PropertyToLeads => f.write_str("PROPERTY_TO_LEADS"),
        }
    }
}

/// Furnishing state of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnishingState {
    Unfurnished,
    SemiFurnished,
    FullyFurnished,
}

impl FurnishingState {
    /// Semi and fully furnished listings both satisfy a furnished preference
    pub fn is_furnished(self) -> bool {
        matches!(self, FurnishingState::SemiFurnished | FurnishingState::FullyFurnished)
    }
}

impl FromStr for FurnishingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unfurnished" => Ok(FurnishingState::Unfurnished),
            "semi-furnished" => Ok(FurnishingState::SemiFurnished),
            "fully-furnished" => Ok(FurnishingState::FullyFurnished),
            other => Err(format!("unknown furnishing state: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for LeadPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(LeadPriority::Low),
            "medium" => Ok(LeadPriority::Medium),
            "high" => Ok(LeadPriority::High),
            other => Err(format!("unknown lead priority: {}", other)),
        }
    }
}

/// Prospective buyer or tenant as stored by the CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub lead_id: Option<i32>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub furnished: bool,
    #[serde(rename = "preferredCity", alias = "preferred_city", default)]
    pub preferred_city: Option<String>,
    #[serde(rename = "preferredLocation", alias = "preferred_location", default)]
    pub preferred_location: Option<String>,
    #[serde(rename = "preferred_type_id_fk", alias = "preferred_type_id", default)]
    pub preferred_type_id: Option<i32>,
    #[serde(default)]
    pub priority: LeadPriority,
    #[serde(rename = "isArchived", alias = "is_archived", default)]
    pub is_archived: bool,
    #[serde(default)]
    pub amenity_ids: Vec<i32>,
}

impl Lead {
    /// Snapshot of the lead's preferences used for scoring
    pub fn preference_profile(&self) -> PreferenceProfile {
        PreferenceProfile {
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            preferred_property_type: self.preferred_type_id,
            desired_bedrooms: self.bedrooms,
            desired_bathrooms: self.bathrooms,
            wants_furnished: self.furnished,
            preferred_city: non_blank(self.preferred_city.as_deref()),
            preferred_location: non_blank(self.preferred_location.as_deref()),
            desired_amenity_ids: self.amenity_ids.iter().copied().collect(),
        }
    }
}

/// Real-estate listing as stored by the CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub property_id: Option<i32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub property_type_id: Option<i32>,
    pub price: f64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[serde(default)]
    pub square_feet: Option<i32>,
    #[serde(default)]
    pub furnishing: Option<FurnishingState>,
    #[serde(rename = "isArchived", alias = "is_archived", default)]
    pub is_archived: bool,
    #[serde(default)]
    pub amenity_ids: Vec<i32>,
}

impl Property {
    /// Snapshot of the listing's attributes used for scoring
    pub fn listing_profile(&self) -> ListingProfile {
        ListingProfile {
            price: self.price,
            property_type: self.property_type_id,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            furnishing: self.furnishing,
            city: self.city.clone(),
            address: self.address.clone(),
            amenity_ids: self.amenity_ids.iter().copied().collect(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// What a lead is looking for. Read-only for the duration of a scoring call.
///
/// Budget bounds are kept as given; an absent minimum means 0 and an absent
/// maximum means unbounded (see `core::budget::BudgetRange`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreferenceProfile {
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub preferred_property_type: Option<i32>,
    pub desired_bedrooms: Option<i32>,
    pub desired_bathrooms: Option<i32>,
    pub wants_furnished: bool,
    pub preferred_city: Option<String>,
    pub preferred_location: Option<String>,
    pub desired_amenity_ids: HashSet<i32>,
}

impl PreferenceProfile {
    /// True when at least one dimension carries a stated preference
    pub fn has_scorable_fields(&self) -> bool {
        self.budget_min.is_some()
            || self.budget_max.is_some()
            || self.preferred_property_type.is_some()
            || self.desired_bedrooms.is_some()
            || self.desired_bathrooms.is_some()
            || self.wants_furnished
            || self.preferred_city.is_some()
            || self.preferred_location.is_some()
            || !self.desired_amenity_ids.is_empty()
    }
}

/// Fixed attributes of a listing. Read-only for the duration of a scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingProfile {
    pub price: f64,
    pub property_type: Option<i32>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub furnishing: Option<FurnishingState>,
    pub city: String,
    pub address: String,
    pub amenity_ids: HashSet<i32>,
}

/// Points awarded per dimension
///
/// One value for the whole weights table so tuning never touches the
/// comparator functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub property_type: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub city: u32,
    pub location: u32,
    pub furnishing: u32,
    pub budget: u32,
    pub per_amenity: u32,
}

impl ScoringWeights {
    /// Upper bound of the fixed-weight dimensions. The amenity bonus is
    /// unbounded and comes on top.
    pub fn max_fixed_score(&self) -> u32 {
        [
            self.property_type,
            self.bedrooms,
            self.bathrooms,
            self.city,
            self.location,
            self.furnishing,
            self.budget,
        ]
        .iter()
        .fold(0u32, |acc, points| acc.saturating_add(*points))
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            property_type: 15,
            bedrooms: 10,
            bathrooms: 10,
            city: 10,
            location: 5,
            furnishing: 10,
            budget: 15,
            per_amenity: 3,
        }
    }
}

/// Per-dimension contributions to a compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub property_type: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub city: u32,
    pub location: u32,
    pub furnishing: u32,
    pub budget: u32,
    pub amenities: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        [
            self.property_type,
            self.bedrooms,
            self.bathrooms,
            self.city,
            self.location,
            self.furnishing,
            self.budget,
            self.amenities,
        ]
        .iter()
        .fold(0u32, |acc, points| acc.saturating_add(*points))
    }
}

/// A candidate that cleared the minimum score, with its original record for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<C> {
    pub candidate_id: i32,
    pub match_score: u32,
    pub breakdown: ScoreBreakdown,
    pub shared_amenity_ids: Vec<i32>,
    #[serde(flatten)]
    pub candidate: C,
}
