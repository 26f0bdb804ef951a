use crate::core::{
    amenities::{amenity_points, shared_amenities},
    attributes::{city_points, furnishing_points, location_points, property_type_points, room_count_points},
    budget::{budget_points, BudgetRange},
};
use crate::models::{ListingProfile, PreferenceProfile, ScoreBreakdown, ScoringWeights};

/// Score one preference/listing pair
///
/// Scoring formula (default weights):
/// score = (
///     property_type   15   # same type id
///     bedrooms        10   # exact count
///     bathrooms       10   # exact count
///     city            10   # case-insensitive equality
///     location         5   # preferred location found in address
///     furnishing      10   # furnished wanted, listing semi/fully furnished
///     budget          15   # price within [budget_min, budget_max]
///     amenities     3 * n  # n shared amenity ids, uncapped
/// )
///
/// Both match directions go through this function with the lead on the
/// preference side, which is what keeps them symmetric.
///
/// # Returns
/// The per-dimension breakdown and the shared amenity ids (ascending)
pub fn score_pair(
    preference: &PreferenceProfile,
    listing: &ListingProfile,
    weights: &ScoringWeights,
) -> (ScoreBreakdown, Vec<i32>) {
    let budget = BudgetRange::new(preference.budget_min, preference.budget_max);
    let shared = shared_amenities(&preference.desired_amenity_ids, &listing.amenity_ids);

    let breakdown = ScoreBreakdown {
        property_type: property_type_points(
            preference.preferred_property_type,
            listing.property_type,
            weights.property_type,
        ),
        bedrooms: room_count_points(preference.desired_bedrooms, Some(listing.bedrooms), weights.bedrooms),
        bathrooms: room_count_points(
            preference.desired_bathrooms,
            Some(listing.bathrooms),
            weights.bathrooms,
        ),
        city: city_points(
            preference.preferred_city.as_deref(),
            Some(listing.city.as_str()),
            weights.city,
        ),
        location: location_points(
            preference.preferred_location.as_deref(),
            Some(listing.address.as_str()),
            weights.location,
        ),
        furnishing: furnishing_points(preference.wants_furnished, listing.furnishing, weights.furnishing),
        budget: budget_points(listing.price, &budget, weights.budget),
        amenities: amenity_points(shared.len(), weights.per_amenity),
    };

    (breakdown, shared)
}
