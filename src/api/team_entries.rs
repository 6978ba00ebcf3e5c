//! Team entries relationship endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::api::middleware::Authenticated;
use crate::api::state::AppState;
use crate::api::types::document::hack_resource;
use crate::api::types::{ApiError, RelationshipDocument};

/// GET /teams/{team_id}/entries
pub async fn get_team_entries(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let entries = state
        .team_service
        .entries(&team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team not found"))?;

    Ok(Json(json!({
        "links": { "self": format!("/teams/{}/entries", team_id) },
        "data": entries
            .iter()
            .map(|h| json!({"type": "hacks", "id": h.slug().as_str()}))
            .collect::<Vec<_>>(),
        "included": entries
            .iter()
            .map(|h| hack_resource(h, &[]))
            .collect::<Vec<_>>(),
    })))
}

/// POST /teams/{team_id}/entries
pub async fn add_team_entries(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(team_id): Path<String>,
    Json(document): Json<RelationshipDocument>,
) -> Result<StatusCode, ApiError> {
    debug!(team = %team_id, count = document.data.len(), "Adding team entries");

    state
        .team_entries
        .add(&team_id, &document.ids(), &actor)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /teams/{team_id}/entries
pub async fn delete_team_entries(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(team_id): Path<String>,
    Json(document): Json<RelationshipDocument>,
) -> Result<StatusCode, ApiError> {
    debug!(team = %team_id, count = document.data.len(), "Removing team entries");

    state
        .team_entries
        .remove(&team_id, &document.ids(), &actor)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
