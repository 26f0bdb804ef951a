// Integration tests for Estate Match

use actix_web::{http::StatusCode, test as actix_test, web, App};
use estate_match::core::{CandidatePolicy, CompatibilityEngine, MatchError};
use estate_match::models::{Direction, ErrorResponse, FurnishingState, Lead, LeadPriority, Property};
use estate_match::routes;

fn create_test_lead() -> Lead {
    Lead {
        lead_id: Some(1),
        first_name: "Rohan".to_string(),
        last_name: "Deshmukh".to_string(),
        email: "rohan@example.com".to_string(),
        phone: "9822000000".to_string(),
        budget_min: Some(5_000_000.0),
        budget_max: Some(7_000_000.0),
        bedrooms: Some(3),
        bathrooms: Some(2),
        furnished: true,
        preferred_city: Some("Pune".to_string()),
        preferred_location: None,
        preferred_type_id: Some(2),
        priority: LeadPriority::High,
        is_archived: false,
        amenity_ids: vec![1, 2, 3],
    }
}

fn create_test_property(id: i32) -> Property {
    Property {
        property_id: Some(id),
        title: format!("Listing {}", id),
        address: "22 Aundh Road".to_string(),
        city: "pune".to_string(),
        state: "Maharashtra".to_string(),
        zip_code: "411007".to_string(),
        property_type_id: Some(2),
        price: 6_000_000.0,
        bedrooms: 3,
        bathrooms: 2,
        square_feet: Some(1450),
        furnishing: Some(FurnishingState::FullyFurnished),
        is_archived: false,
        amenity_ids: vec![1, 2, 4],
    }
}

/// Matches only on type and budget
fn create_weak_property(id: i32) -> Property {
    Property {
        bedrooms: 1,
        bathrooms: 1,
        city: "Nashik".to_string(),
        furnishing: Some(FurnishingState::Unfurnished),
        amenity_ids: vec![],
        ..create_test_property(id)
    }
}

#[test]
fn test_strong_match_ranked_above_weaker_match() {
    let engine = CompatibilityEngine::with_default_weights();
    let mut weaker = create_test_property(2);
    weaker.bathrooms = 3;

    let ranked = engine
        .rank_candidates(&create_test_lead(), &[weaker, create_test_property(1)])
        .unwrap();

    assert_eq!(ranked.matches.len(), 2);
    assert_eq!(ranked.matches[0].candidate_id, 1);
    assert_eq!(ranked.matches[0].match_score, 76);
    assert_eq!(ranked.matches[0].shared_amenity_ids, vec![1, 2]);
    assert_eq!(ranked.matches[1].candidate_id, 2);
    assert_eq!(ranked.matches[1].match_score, 66);
}

#[test]
fn test_type_and_budget_only_is_excluded() {
    let engine = CompatibilityEngine::with_default_weights();

    let score = engine
        .score(&create_test_lead(), &create_weak_property(3))
        .unwrap();
    assert_eq!(score.total(), 30);

    let ranked = engine
        .rank_candidates(&create_test_lead(), &[create_weak_property(3)])
        .unwrap();
    assert!(ranked.matches.is_empty());
    assert_eq!(ranked.total_candidates, 1);
}

#[test]
fn test_minimum_score_is_inclusive() {
    let engine = CompatibilityEngine::with_default_weights();
    let lead = Lead {
        budget_min: None,
        budget_max: None,
        bathrooms: None,
        furnished: false,
        preferred_city: None,
        amenity_ids: vec![1, 2, 3, 4],
        ..create_test_lead()
    };
    // budget 15 + bedrooms 10 + four amenities 12
    let at_cutoff = Property {
        property_type_id: Some(1),
        amenity_ids: vec![1, 2, 3, 4],
        ..create_test_property(2)
    };
    // budget 15 + type 15 + two amenities 6
    let below_cutoff = Property {
        bedrooms: 1,
        amenity_ids: vec![1, 2],
        ..create_test_property(1)
    };

    assert_eq!(engine.score(&lead, &at_cutoff).unwrap().total(), 37);
    assert_eq!(engine.score(&lead, &below_cutoff).unwrap().total(), 36);

    let ranked = engine
        .rank_candidates(&lead, &[below_cutoff.clone(), at_cutoff.clone()])
        .unwrap();
    assert_eq!(ranked.matches.len(), 1);
    assert_eq!(ranked.matches[0].candidate_id, 2);
    assert_eq!(ranked.matches[0].match_score, 37);

    let kept = engine.rank_candidates(&at_cutoff, &[lead.clone()]).unwrap();
    assert_eq!(kept.matches[0].match_score, 37);
    assert!(engine.rank_candidates(&below_cutoff, &[lead]).unwrap().is_empty());
}

#[test]
fn test_empty_candidate_list_is_not_an_error() {
    let engine = CompatibilityEngine::with_default_weights();

    let ranked = engine.rank_candidates(&create_test_lead(), &[]).unwrap();

    assert!(ranked.is_empty());
    assert_eq!(ranked.total_candidates, 0);
    assert!(ranked.skipped.is_empty());
}

#[test]
fn test_both_directions_agree() {
    let engine = CompatibilityEngine::with_default_weights();
    let lead = create_test_lead();
    let property = create_test_property(9);

    let forward = engine.rank_candidates(&lead, &[property.clone()]).unwrap();
    let backward = engine.rank_candidates(&property, &[lead.clone()]).unwrap();

    assert_eq!(forward.direction, Direction::LeadToProperties);
    assert_eq!(backward.direction, Direction::PropertyToLeads);
    assert_eq!(forward.matches[0].match_score, backward.matches[0].match_score);
    assert_eq!(forward.matches[0].breakdown, backward.matches[0].breakdown);
    assert_eq!(backward.matches[0].candidate_id, 1);
    assert_eq!(backward.matches[0].candidate, lead);
}

#[test]
fn test_property_to_leads_scores_budget_instead_of_filtering() {
    let engine = CompatibilityEngine::with_default_weights();
    let property = create_test_property(9);
    let mut over_budget = create_test_lead();
    over_budget.lead_id = Some(2);
    over_budget.budget_max = Some(5_500_000.0);

    let ranked = engine
        .rank_candidates(&property, &[over_budget, create_test_lead()])
        .unwrap();

    // Out-of-budget lead loses 15 points but still clears the minimum score
    let ids: Vec<i32> = ranked.matches.iter().map(|m| m.candidate_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(ranked.matches[1].match_score, 61);
    assert_eq!(ranked.matches[1].breakdown.budget, 0);
}

#[test]
fn test_leads_without_identifier_are_skipped() {
    let engine = CompatibilityEngine::with_default_weights();
    let mut anonymous = create_test_lead();
    anonymous.lead_id = None;

    let ranked = engine
        .rank_candidates(&create_test_property(1), &[create_test_lead(), anonymous])
        .unwrap();

    assert_eq!(ranked.skipped, vec![1]);
    assert_eq!(ranked.matches.len(), 1);
}

#[test]
fn test_reject_policy_fails_whole_batch() {
    let engine = CompatibilityEngine::with_default_weights().with_candidate_policy(CandidatePolicy::Reject);
    let mut anonymous = create_test_property(1);
    anonymous.property_id = None;

    let result = engine.rank_candidates(&create_test_lead(), &[anonymous]);

    assert!(matches!(result, Err(MatchError::InvalidCandidate { position: 0, .. })));
}

#[test]
fn test_inputs_are_not_mutated() {
    let engine = CompatibilityEngine::with_default_weights();
    let lead = create_test_lead();
    let candidates = vec![create_test_property(1), create_weak_property(2)];
    let lead_before = lead.clone();
    let candidates_before = candidates.clone();

    let first = engine.rank_candidates(&lead, &candidates).unwrap();
    let second = engine.rank_candidates(&lead, &candidates).unwrap();

    assert_eq!(first, second);
    assert_eq!(lead, lead_before);
    assert_eq!(candidates, candidates_before);
}

#[actix_web::test]
async fn test_score_endpoint_ranks_properties() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(CompatibilityEngine::with_default_weights()))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .set_json(serde_json::json!({
            "direction": "LEAD_TO_PROPERTIES",
            "lead": create_test_lead(),
            "candidates": [create_weak_property(3), create_test_property(1)]
        }))
        .to_request();

    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["direction"], "LEAD_TO_PROPERTIES");
    assert_eq!(body["total_candidates"], 2);
    assert_eq!(body["total_matches"], 1);
    assert_eq!(body["matches"][0]["candidate_id"], 1);
    assert_eq!(body["matches"][0]["match_score"], 76);
    assert_eq!(body["matches"][0]["furnishing"], "fully-furnished");
}

#[actix_web::test]
async fn test_score_endpoint_rejects_reference_without_preferences() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(CompatibilityEngine::with_default_weights()))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .set_json(serde_json::json!({
            "direction": "LEAD_TO_PROPERTIES",
            "lead": { "lead_id": 5 },
            "candidates": [create_test_property(1)]
        }))
        .to_request();

    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: ErrorResponse = actix_test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_reference");
}

#[actix_web::test]
async fn test_score_endpoint_malformed_json() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(CompatibilityEngine::with_default_weights()))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"direction": "SIDEWAYS"}"#)
        .to_request();

    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = actix_test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_json");
}
