//! Challenge resource endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::middleware::Authenticated;
use crate::api::state::AppState;
use crate::api::types::document::challenge_resource;
use crate::api::types::ApiError;

/// Request payload for creating a challenge
#[derive(Debug, Deserialize)]
pub struct CreateChallengeDocument {
    pub data: CreateChallengeData,
}

#[derive(Debug, Deserialize)]
pub struct CreateChallengeData {
    pub attributes: CreateChallengeAttributes,
}

#[derive(Debug, Deserialize)]
pub struct CreateChallengeAttributes {
    pub name: String,
}

/// POST /challenges
pub async fn create_challenge(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Json(document): Json<CreateChallengeDocument>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    debug!(name = %document.data.attributes.name, "Creating challenge");

    let challenge = state
        .challenge_service
        .create(&document.data.attributes.name)
        .await?;

    let body = json!({
        "links": { "self": format!("/challenges/{}", challenge.slug) },
        "data": challenge_resource(&challenge),
    });

    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /challenges/{challenge_id}
pub async fn get_challenge(
    State(state): State<AppState>,
    Path(challenge_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let challenge = state
        .challenge_service
        .get(&challenge_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Challenge not found"))?;

    Ok(Json(json!({
        "links": { "self": format!("/challenges/{}", challenge.slug) },
        "data": challenge_resource(&challenge),
    })))
}

/// GET /challenges
pub async fn list_challenges(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let challenges = state.challenge_service.list().await?;

    Ok(Json(json!({
        "links": { "self": "/challenges" },
        "data": challenges
            .iter()
            .map(challenge_resource)
            .collect::<Vec<_>>(),
    })))
}
