use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::Json;
use governance_cache::{ProposalDetail, ProposalIndexer, ProposalSummary, VoteAggregator, VoteTally};

use super::types::{ApiError, HealthResponse};

#[derive(Clone)]
pub struct AppState {
    pub indexer: Arc<ProposalIndexer>,
    pub votes: Arc<VoteAggregator>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn list_proposals(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<ProposalSummary>>, ApiError> {
    state
        .indexer
        .list_proposals()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_governance(e, uri.path()))
}

pub async fn get_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Json<ProposalDetail>, ApiError> {
    state
        .indexer
        .get_proposal(&id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_governance(e, uri.path()))
}

pub async fn get_votes(
    State(state): State<AppState>,
    Path(proposal_id): Path<String>,
    uri: Uri,
) -> Result<Json<VoteTally>, ApiError> {
    state
        .votes
        .get_total_votes(&proposal_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_governance(e, uri.path()))
}
