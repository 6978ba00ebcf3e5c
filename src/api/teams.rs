//! Team resource endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::middleware::Authenticated;
use crate::api::state::AppState;
use crate::api::types::document::{team_resource, user_resource};
use crate::api::types::{ApiError, ResourceIdentifier};
use crate::infrastructure::CreateTeamRequest;

/// Request payload for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamDocument {
    pub data: CreateTeamData,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamData {
    pub attributes: CreateTeamAttributes,
    #[serde(default)]
    pub relationships: Option<CreateTeamRelationships>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamAttributes {
    pub name: String,
    #[serde(default)]
    pub motto: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRelationships {
    #[serde(default)]
    pub members: Option<MembersRelationship>,
}

#[derive(Debug, Deserialize)]
pub struct MembersRelationship {
    pub data: Vec<ResourceIdentifier>,
}

/// Query parameters for listing teams
#[derive(Debug, Deserialize)]
pub struct ListTeamsQuery {
    #[serde(rename = "filter[name]")]
    pub name: Option<String>,
}

/// POST /teams
pub async fn create_team(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Json(document): Json<CreateTeamDocument>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    debug!(name = %document.data.attributes.name, "Creating team");

    let member_handles = document
        .data
        .relationships
        .and_then(|r| r.members)
        .map(|m| m.data.into_iter().map(|id| id.id).collect())
        .unwrap_or_default();

    let request = CreateTeamRequest {
        name: document.data.attributes.name,
        motto: document.data.attributes.motto,
        member_handles,
    };

    let created = state.team_service.create(request, &actor).await?;

    let body = json!({
        "links": { "self": format!("/teams/{}", created.team.slug()) },
        "data": team_resource(&created.team, &created.members),
        "included": created.members.iter().map(user_resource).collect::<Vec<_>>(),
    });

    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /teams/{team_id}
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let found = state
        .team_service
        .get(&team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team not found"))?;

    Ok(Json(json!({
        "links": { "self": format!("/teams/{}", found.team.slug()) },
        "data": team_resource(&found.team, &found.members),
        "included": found.members.iter().map(user_resource).collect::<Vec<_>>(),
    })))
}

/// GET /teams
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<ListTeamsQuery>,
) -> Result<Json<Value>, ApiError> {
    let teams = state.team_service.list(query.name.as_deref()).await?;

    let data: Vec<Value> = teams
        .iter()
        .map(|t| team_resource(&t.team, &t.members))
        .collect();

    let included: Vec<Value> = teams
        .iter()
        .flat_map(|t| t.members.iter().map(user_resource))
        .collect();

    Ok(Json(json!({
        "links": { "self": "/teams" },
        "data": data,
        "included": included,
    })))
}
