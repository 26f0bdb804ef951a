// Unit tests for Estate Match

use estate_match::core::{
    amenities::{amenity_points, shared_amenities},
    attributes::{city_points, furnishing_points, location_points, property_type_points, room_count_points},
    budget::{budget_points, BudgetRange},
    scoring::score_pair,
};
use estate_match::models::{FurnishingState, Lead, ListingProfile, PreferenceProfile, Property, ScoringWeights};
use std::collections::HashSet;

fn amenity_set(ids: &[i32]) -> HashSet<i32> {
    ids.iter().copied().collect()
}

fn create_test_listing() -> ListingProfile {
    ListingProfile {
        price: 7_500_000.0,
        property_type: Some(1),
        bedrooms: 2,
        bathrooms: 2,
        furnishing: Some(FurnishingState::SemiFurnished),
        city: "Mumbai".to_string(),
        address: "Plot 7, Hiranandani Gardens, Powai".to_string(),
        amenity_ids: amenity_set(&[5, 6, 7]),
    }
}

#[test]
fn test_absent_values_contribute_zero() {
    assert_eq!(property_type_points(None, None, 15), 0);
    assert_eq!(room_count_points(None, None, 10), 0);
    assert_eq!(city_points(None, None, 10), 0);
    assert_eq!(location_points(None, None, 5), 0);
    assert_eq!(furnishing_points(false, None, 10), 0);
}

#[test]
fn test_city_unicode_case_folding() {
    assert_eq!(city_points(Some("MÜNCHEN"), Some("münchen"), 10), 10);
}

#[test]
fn test_location_matches_inside_address() {
    assert_eq!(location_points(Some("powai"), Some("Plot 7, Hiranandani Gardens, Powai"), 5), 5);
    assert_eq!(location_points(Some("Andheri"), Some("Plot 7, Hiranandani Gardens, Powai"), 5), 0);
}

#[test]
fn test_budget_range_defaults() {
    let range = BudgetRange::new(Some(1_000.0), None);

    assert_eq!(budget_points(999.0, &range, 15), 0);
    assert_eq!(budget_points(1_000.0, &range, 15), 15);
    assert_eq!(budget_points(f64::MAX, &range, 15), 15);
}

#[test]
fn test_inverted_budget_never_matches() {
    let range = BudgetRange::new(Some(10.0), Some(5.0));
    assert_eq!(budget_points(7.0, &range, 15), 0);
}

#[test]
fn test_amenity_bonus_counts_intersection() {
    let shared = shared_amenities(&amenity_set(&[1, 2, 3, 4]), &amenity_set(&[3, 4, 5]));

    assert_eq!(shared, vec![3, 4]);
    assert_eq!(amenity_points(shared.len(), 3), 6);
}

#[test]
fn test_lead_amenities_deduplicated() {
    let lead: Lead = serde_json::from_value(serde_json::json!({
        "lead_id": 2,
        "amenity_ids": [5, 5, 5, 6]
    }))
    .unwrap();

    let (breakdown, shared) = score_pair(
        &lead.preference_profile(),
        &create_test_listing(),
        &ScoringWeights::default(),
    );

    assert_eq!(shared, vec![5, 6]);
    assert_eq!(breakdown.amenities, 6);
}

#[test]
fn test_budget_only_preference_scores_budget_dimension() {
    let preference = PreferenceProfile {
        budget_min: Some(5_000_000.0),
        budget_max: Some(8_000_000.0),
        ..Default::default()
    };

    let (breakdown, _) = score_pair(&preference, &create_test_listing(), &ScoringWeights::default());

    assert_eq!(breakdown.total(), 15);
}

#[test]
fn test_fixed_dimensions_bounded_by_weights() {
    let preference = PreferenceProfile {
        budget_min: None,
        budget_max: None,
        preferred_property_type: Some(1),
        desired_bedrooms: Some(2),
        desired_bathrooms: Some(2),
        wants_furnished: true,
        preferred_city: Some("mumbai".to_string()),
        preferred_location: Some("Powai".to_string()),
        desired_amenity_ids: HashSet::new(),
    };
    let weights = ScoringWeights::default();

    let (breakdown, _) = score_pair(&preference, &create_test_listing(), &weights);

    assert_eq!(breakdown.total(), weights.max_fixed_score());
    assert_eq!(breakdown.total(), 75);
}

#[test]
fn test_listing_profile_from_property_json() {
    let property: Property = serde_json::from_value(serde_json::json!({
        "property_id": 41,
        "title": "2BHK Powai",
        "address": "Hiranandani Gardens",
        "city": "Mumbai",
        "price": 7500000.0,
        "bedrooms": 2,
        "bathrooms": 2,
        "furnishing": "fully-furnished",
        "amenity_ids": [3, 3, 9]
    }))
    .unwrap();

    let listing = property.listing_profile();

    assert_eq!(listing.furnishing, Some(FurnishingState::FullyFurnished));
    assert_eq!(listing.amenity_ids, amenity_set(&[3, 9]));
    assert_eq!(listing.property_type, None);
}
