//! Resource document shaping
//!
//! Builders for the `{links, data, included}` documents the API responds
//! with, and the identifier payloads relationship endpoints accept.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::challenge::Challenge;
use crate::domain::hack::Hack;
use crate::domain::team::Team;
use crate::domain::user::User;

/// A `{type, id}` pair addressing one resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Request payload for relationship mutations: a list of identifiers
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipDocument {
    pub data: Vec<ResourceIdentifier>,
}

impl RelationshipDocument {
    /// The requested ids in request order
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().map(|r| r.id.clone()).collect()
    }
}

pub fn user_resource(user: &User) -> Value {
    json!({
        "links": { "self": format!("/users/{}", user.handle()) },
        "type": "users",
        "id": user.handle().as_str(),
        "attributes": { "name": user.name() },
    })
}

pub fn team_resource(team: &Team, members: &[User]) -> Value {
    json!({
        "links": { "self": format!("/teams/{}", team.slug()) },
        "type": "teams",
        "id": team.slug().as_str(),
        "attributes": {
            "name": team.name(),
            "motto": team.motto(),
        },
        "relationships": {
            "members": {
                "links": { "self": format!("/teams/{}/members", team.slug()) },
                "data": members
                    .iter()
                    .map(|u| json!({"type": "users", "id": u.handle().as_str()}))
                    .collect::<Vec<_>>(),
            },
            "entries": {
                "links": { "self": format!("/teams/{}/entries", team.slug()) },
            },
        },
    })
}

pub fn hack_resource(hack: &Hack, challenges: &[Challenge]) -> Value {
    json!({
        "links": { "self": format!("/hacks/{}", hack.slug()) },
        "type": "hacks",
        "id": hack.slug().as_str(),
        "attributes": { "name": hack.name() },
        "relationships": {
            "challenges": {
                "links": { "self": format!("/hacks/{}/challenges", hack.slug()) },
                "data": challenges
                    .iter()
                    .map(|c| json!({"type": "challenges", "id": c.slug.as_str()}))
                    .collect::<Vec<_>>(),
            },
        },
    })
}

pub fn challenge_resource(challenge: &Challenge) -> Value {
    json!({
        "links": { "self": format!("/challenges/{}", challenge.slug) },
        "type": "challenges",
        "id": challenge.slug.as_str(),
        "attributes": { "name": challenge.name },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directory::DirectoryHandle;
    use crate::domain::team::TeamSlug;

    #[test]
    fn test_relationship_document_ids_preserve_order() {
        let doc: RelationshipDocument = serde_json::from_value(json!({
            "data": [
                {"type": "challenges", "id": "best-iot"},
                {"type": "challenges", "id": "best-ai"},
            ]
        }))
        .unwrap();

        assert_eq!(doc.ids(), vec!["best-iot", "best-ai"]);
    }

    #[test]
    fn test_team_resource_shape() {
        let user = User::new(DirectoryHandle::new("UAAAA1111").unwrap(), "ada");
        let team = Team::new(TeamSlug::new("rust-crew").unwrap(), "Rust Crew")
            .with_members(vec![*user.id()]);

        let resource = team_resource(&team, &[user]);

        assert_eq!(resource["type"], "teams");
        assert_eq!(resource["id"], "rust-crew");
        assert_eq!(resource["links"]["self"], "/teams/rust-crew");
        assert_eq!(
            resource["relationships"]["members"]["data"][0]["id"],
            "UAAAA1111"
        );
    }

    #[test]
    fn test_team_resource_null_motto() {
        let team = Team::new(TeamSlug::new("rust-crew").unwrap(), "Rust Crew");
        let resource = team_resource(&team, &[]);
        assert!(resource["attributes"]["motto"].is_null());
    }
}
