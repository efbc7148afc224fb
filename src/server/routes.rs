//! Route handlers for the mention server.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use super::MentionServerState;
use crate::names::LOOKUP_LIMIT;

/// Query string for `GET /mentions`.
#[derive(Debug, Default, Deserialize)]
pub struct MentionParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub names: usize,
}

/// `GET /mentions?q=<substring>`: up to 10 matching names, `[]` when `q` is
/// missing or empty.
pub async fn mentions_handler(
    State(state): State<MentionServerState>,
    Query(params): Query<MentionParams>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();
    if query.is_empty() {
        return Json(Vec::<String>::new());
    }
    let names = state.names.query_owned(&query, LOOKUP_LIMIT);
    tracing::debug!(query = %query, hits = names.len(), "Mention lookup");
    Json(names)
}

/// `GET /health`
pub async fn health_handler(State(state): State<MentionServerState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        names: state.names.len(),
    })
}
