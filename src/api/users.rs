//! User resource endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::api::types::document::{team_resource, user_resource};
use crate::api::types::ApiError;

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let found = state
        .user_service
        .get(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let mut data = user_resource(&found.user);
    let mut included: Vec<Value> = Vec::new();

    data["relationships"] = json!({
        "team": {
            "links": { "self": format!("/users/{}/team", found.user.handle()) },
            "data": Value::Null,
        },
    });

    if let Some(team) = &found.team {
        data["relationships"]["team"]["data"] =
            json!({"type": "teams", "id": team.team.slug().as_str()});

        included.push(team_resource(&team.team, &team.members));
        included.extend(
            team.members
                .iter()
                .filter(|member| member.handle() != found.user.handle())
                .map(user_resource),
        );
    }

    Ok(Json(json!({
        "links": { "self": format!("/users/{}", found.user.handle()) },
        "data": data,
        "included": included,
    })))
}
