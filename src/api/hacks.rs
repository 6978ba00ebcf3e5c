//! Hack resource endpoints

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
use crate::api::types::document::{challenge_resource, hack_resource};
use crate::api::types::{ApiError, ResourceIdentifier};

/// Request payload for creating a hack
#[derive(Debug, Deserialize)]
pub struct CreateHackDocument {
    pub data: CreateHackData,
}

#[derive(Debug, Deserialize)]
pub struct CreateHackData {
    pub attributes: CreateHackAttributes,
    pub relationships: CreateHackRelationships,
}

#[derive(Debug, Deserialize)]
pub struct CreateHackAttributes {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateHackRelationships {
    pub team: TeamRelationship,
}

#[derive(Debug, Deserialize)]
pub struct TeamRelationship {
    pub data: ResourceIdentifier,
}

/// POST /hacks
pub async fn create_hack(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Json(document): Json<CreateHackDocument>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    debug!(name = %document.data.attributes.name, "Creating hack");

    let hack = state
        .hack_service
        .create(
            &document.data.attributes.name,
            &document.data.relationships.team.data.id,
            &actor,
        )
        .await?;

    let body = json!({
        "links": { "self": format!("/hacks/{}", hack.slug()) },
        "data": hack_resource(&hack, &[]),
    });

    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /hacks/{hack_id}
pub async fn get_hack(
    State(state): State<AppState>,
    Path(hack_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let found = state
        .hack_service
        .get(&hack_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Hack not found"))?;

    Ok(Json(json!({
        "links": { "self": format!("/hacks/{}", found.hack.slug()) },
        "data": hack_resource(&found.hack, &found.challenges),
        "included": found
            .challenges
            .iter()
            .map(challenge_resource)
            .collect::<Vec<_>>(),
    })))
}

/// GET /hacks
pub async fn list_hacks(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let hacks = state.hack_service.list().await?;

    Ok(Json(json!({
        "links": { "self": "/hacks" },
        "data": hacks
            .iter()
            .map(|h| hack_resource(h, &[]))
            .collect::<Vec<_>>(),
    })))
}

/// DELETE /hacks/{hack_id}
pub async fn delete_hack(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(hack_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(hack = %hack_id, "Deleting hack");

    state.hack_service.delete(&hack_id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
