//! API routes for triagemd.

use crate::resolver::ResolveError;
use crate::server::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use triagem_common::{FindServiceRequest, FindServiceResponse, HealthResponse, Resolution};

type AppStateArc = Arc<AppState>;

/// Per-request classification deadline; the resolver enforces its own
/// hard bound on top, and the shorter of the two governs.
const REQUEST_DEADLINE: Duration = Duration::from_secs(8);

/// User-facing messages. Upstream detail never leaves the logs.
const MSG_NOT_FOUND: &str = "Serviço não encontrado";
const MSG_CLASSIFICATION_FAILED: &str = "erro ao consultar IA";

// ============================================================================
// Service Routes
// ============================================================================

pub fn service_routes() -> Router<AppStateArc> {
    Router::new().route("/api/find-service", post(find_service))
}

async fn find_service(
    State(state): State<AppStateArc>,
    Json(req): Json<FindServiceRequest>,
) -> Json<FindServiceResponse> {
    let start = Instant::now();
    info!("[Q]  Classifying: {}", req.intent);

    let outcome = state.resolver.resolve(&req.intent, REQUEST_DEADLINE).await;
    let response = to_wire_response(outcome);

    info!(
        "[A]  POST /api/find-service processed in {}ms",
        start.elapsed().as_millis()
    );
    Json(response)
}

/// Collapse the three-way outcome onto the wire envelope. Resolver errors
/// are logged with their cause and surfaced as one generic message.
fn to_wire_response(outcome: Result<Resolution, ResolveError>) -> FindServiceResponse {
    match outcome {
        Ok(Resolution::Matched { id, label }) => FindServiceResponse::matched(id, label),
        Ok(Resolution::NoMatch) => FindServiceResponse::failed(MSG_NOT_FOUND),
        Err(e) => {
            error!("[-]  Classification failed: {}", e);
            FindServiceResponse::failed(MSG_CLASSIFICATION_FAILED)
        }
    }
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/healthz", get(healthz))
}

async fn healthz(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_outcome_maps_to_success_envelope() {
        let response = to_wire_response(Ok(Resolution::Matched {
            id: 12,
            label: "Consulta do Saldo".to_string(),
        }));
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.service_id, 12);
        assert_eq!(data.service_name, "Consulta do Saldo");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_no_match_maps_to_not_found_message() {
        let response = to_wire_response(Ok(Resolution::NoMatch));
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some(MSG_NOT_FOUND));
    }

    #[test]
    fn test_errors_map_to_one_generic_message() {
        for outcome in [
            Err(ResolveError::MissingCredential),
            Err(ResolveError::Timeout(REQUEST_DEADLINE)),
            Err(ResolveError::Transport(anyhow::anyhow!("dns failure"))),
            Err(ResolveError::MalformedAnswer("not json".to_string())),
        ] {
            let response = to_wire_response(outcome);
            assert!(!response.success);
            assert!(response.data.is_none());
            assert_eq!(response.error.as_deref(), Some(MSG_CLASSIFICATION_FAILED));
        }
    }
}
