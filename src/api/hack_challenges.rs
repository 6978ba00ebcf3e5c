//! Hack challenges relationship endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::api::middleware::Authenticated;
use crate::api::state::AppState;
use crate::api::types::{ApiError, RelationshipDocument};

/// POST /hacks/{hack_id}/challenges
pub async fn add_hack_challenges(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(hack_id): Path<String>,
    Json(document): Json<RelationshipDocument>,
) -> Result<StatusCode, ApiError> {
    debug!(hack = %hack_id, count = document.data.len(), "Adding hack challenges");

    state
        .hack_challenges
        .add(&hack_id, &document.ids(), &actor)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /hacks/{hack_id}/challenges
pub async fn delete_hack_challenges(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(hack_id): Path<String>,
    Json(document): Json<RelationshipDocument>,
) -> Result<StatusCode, ApiError> {
    debug!(hack = %hack_id, count = document.data.len(), "Removing hack challenges");

    state
        .hack_challenges
        .remove(&hack_id, &document.ids(), &actor)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
