use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{CompatibilityEngine, MatchError, RankedMatches};
use crate::models::{ErrorResponse, HealthResponse, ScoreRequest, SuggestionQuery, SuggestionsResponse};
use crate::services::{PostgresClient, PostgresError};

/// Application state shared across all handlers
///
/// The engine is registered on its own as `web::Data<CompatibilityEngine>`.
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/leads/{lead_id}/suggested-properties", web::get().to(suggest_properties))
        .route("/property/{property_id}/suggested-leads", web::get().to(suggest_leads))
        .route("/matches/score", web::post().to(score_candidates));
}

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = healthy_within(state.postgres.health_check(), HEALTH_CHECK_TIMEOUT).await;

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Properties ranked for a lead
///
/// GET /api/v1/leads/{lead_id}/suggested-properties?limit=20&offset=0
async fn suggest_properties(
    state: web::Data<AppState>,
    engine: web::Data<CompatibilityEngine>,
    path: web::Path<i32>,
    query: web::Query<SuggestionQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let lead_id = path.into_inner();
    let limit = query.effective_limit(state.matching.default_limit, state.matching.max_limit);

    tracing::info!("Suggesting properties for lead {}, limit: {}", lead_id, limit);

    let lead = match state.postgres.get_lead(lead_id).await {
        Ok(lead) => lead,
        Err(e) => return lookup_error("Lead", e),
    };

    let candidates = match state.postgres.candidate_properties(state.matching.max_candidates).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidate properties for lead {}: {}", lead_id, e);
            return internal_error("Failed to load candidate properties", e);
        }
    };

    let engine = *engine.get_ref();
    let shard_size = state.matching.shard_size;
    let ranked = web::block(move || engine.rank_candidates_sharded(&lead, &candidates, shard_size)).await;

    match ranked {
        Ok(Ok(ranked)) if ranked.is_empty() => no_matches("No matching properties found"),
        Ok(Ok(ranked)) => {
            tracing::info!(
                "Returning {} of {} matching properties for lead {}",
                ranked.matches.len().saturating_sub(query.offset).min(limit),
                ranked.matches.len(),
                lead_id
            );
            HttpResponse::Ok().json(SuggestionsResponse::page(ranked, query.offset, limit))
        }
        Ok(Err(e)) => match_error(e),
        Err(e) => internal_error("Ranking failed", e),
    }
}

/// Leads ranked for a property
///
/// GET /api/v1/property/{property_id}/suggested-leads?limit=20&offset=0
async fn suggest_leads(
    state: web::Data<AppState>,
    engine: web::Data<CompatibilityEngine>,
    path: web::Path<i32>,
    query: web::Query<SuggestionQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let property_id = path.into_inner();
    let limit = query.effective_limit(state.matching.default_limit, state.matching.max_limit);

    tracing::info!("Suggesting leads for property {}, limit: {}", property_id, limit);

    let property = match state.postgres.get_property(property_id).await {
        Ok(property) => property,
        Err(e) => return lookup_error("Property", e),
    };

    let candidates = match state.postgres.candidate_leads(state.matching.max_candidates).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidate leads for property {}: {}", property_id, e);
            return internal_error("Failed to load candidate leads", e);
        }
    };

    let engine = *engine.get_ref();
    let shard_size = state.matching.shard_size;
    let ranked =
        web::block(move || engine.rank_candidates_sharded(&property, &candidates, shard_size)).await;

    match ranked {
        Ok(Ok(ranked)) if ranked.is_empty() => no_matches("No matching leads found"),
        Ok(Ok(ranked)) => {
            tracing::info!(
                "Returning {} of {} matching leads for property {}",
                ranked.matches.len().saturating_sub(query.offset).min(limit),
                ranked.matches.len(),
                property_id
            );
            HttpResponse::Ok().json(SuggestionsResponse::page(ranked, query.offset, limit))
        }
        Ok(Err(e)) => match_error(e),
        Err(e) => internal_error("Ranking failed", e),
    }
}

/// Rank a caller-supplied candidate set
///
/// POST /api/v1/matches/score
///
/// Unlike the suggestion endpoints, an empty ranking is a 200 with no matches.
async fn score_candidates(
    engine: web::Data<CompatibilityEngine>,
    req: web::Json<ScoreRequest>,
) -> impl Responder {
    match req.into_inner() {
        ScoreRequest::LeadToProperties { lead, candidates } => {
            full_ranking(engine.rank_candidates(&lead, &candidates))
        }
        ScoreRequest::PropertyToLeads { property, candidates } => {
            full_ranking(engine.rank_candidates(&property, &candidates))
        }
    }
}

/// A check that errors or outlives `limit` counts as unhealthy
async fn healthy_within<F, E>(check: F, limit: Duration) -> bool
where
    F: Future<Output = Result<bool, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(limit, check).await {
        Ok(Ok(healthy)) => healthy,
        Ok(Err(e)) => {
            tracing::warn!("Health check failed: {}", e);
            false
        }
        Err(_) => {
            tracing::warn!("Health check timed out after {:?}", limit);
            false
        }
    }
}

fn full_ranking<C: Serialize>(ranked: Result<RankedMatches<C>, MatchError>) -> HttpResponse {
    match ranked {
        Ok(ranked) => {
            let limit = ranked.matches.len();
            HttpResponse::Ok().json(SuggestionsResponse::page(ranked, 0, limit))
        }
        Err(e) => match_error(e),
    }
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "Validation failed",
        errors.to_string(),
        400,
    ))
}

fn match_error(e: MatchError) -> HttpResponse {
    tracing::info!("Rejected ranking request: {}", e);
    let error = match e {
        MatchError::InvalidReference(_) => "invalid_reference",
        MatchError::InvalidCandidate { .. } => "invalid_candidate",
    };
    HttpResponse::UnprocessableEntity().json(ErrorResponse::new(error, e.to_string(), 422))
}

fn lookup_error(entity: &str, e: PostgresError) -> HttpResponse {
    match e {
        PostgresError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse::new(
            format!("{} not found", entity),
            e.to_string(),
            404,
        )),
        e => {
            tracing::error!("Failed to fetch {}: {}", entity.to_lowercase(), e);
            internal_error(&format!("Failed to fetch {}", entity.to_lowercase()), e)
        }
    }
}

fn no_matches(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("no_matches", message, 404))
}

fn internal_error(error: &str, e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(error, e.to_string(), 500))
}
