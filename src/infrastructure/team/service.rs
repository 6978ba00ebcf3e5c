//! Team service

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::credentials::Credentials;
use crate::domain::directory::DirectoryHandle;
use crate::domain::event::{EventEmitter, EventName};
use crate::domain::hack::{Hack, HackRepository};
use crate::domain::slug::slugify;
use crate::domain::team::{Team, TeamRepository, TeamSlug};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// Request for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    pub motto: Option<String>,
    /// Directory handles of the initial members; the requesting user is
    /// always included
    pub member_handles: Vec<String>,
}

/// A team together with its resolved member records
#[derive(Debug, Clone)]
pub struct TeamWithMembers {
    pub team: Team,
    pub members: Vec<User>,
}

/// Team service
#[derive(Debug)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    hacks: Arc<dyn HackRepository>,
    events: Arc<dyn EventEmitter>,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        hacks: Arc<dyn HackRepository>,
        events: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            teams,
            users,
            hacks,
            events,
        }
    }

    /// Create a team. The acting user becomes a member whether or not the
    /// request listed them.
    pub async fn create(
        &self,
        request: CreateTeamRequest,
        actor: &Credentials,
    ) -> Result<TeamWithMembers, DomainError> {
        info!(name = %request.name, "Creating team");

        let slug = TeamSlug::new(slugify(&request.name))
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let mut handles: Vec<DirectoryHandle> = request
            .member_handles
            .iter()
            .filter_map(|h| DirectoryHandle::new(h).ok())
            .collect();

        if !handles.contains(&actor.user.handle) {
            handles.push(actor.user.handle.clone());
        }

        let members = self.users.find_by_handles(&handles).await?;

        let mut team = Team::new(slug, &request.name)
            .with_members(members.iter().map(|u| *u.id()).collect());

        if let Some(motto) = request.motto {
            team = team.with_motto(motto);
        }

        let team = match self.teams.create(team).await {
            Ok(team) => team,
            Err(err) if err.is_conflict() => {
                return Err(DomainError::conflict("Team already exists"));
            }
            Err(err) => return Err(err),
        };

        self.events.trigger(
            EventName::TeamsAdd,
            json!({
                "teamid": team.slug().as_str(),
                "name": team.name(),
                "motto": team.motto(),
                "members": members
                    .iter()
                    .map(|u| json!({"userid": u.handle().as_str(), "name": u.name()}))
                    .collect::<Vec<_>>(),
            }),
        );

        Ok(TeamWithMembers { team, members })
    }

    /// Get a team by slug with its members resolved
    pub async fn get(&self, slug: &str) -> Result<Option<TeamWithMembers>, DomainError> {
        let Ok(slug) = TeamSlug::new(slug) else {
            return Ok(None);
        };

        let Some(team) = self.teams.find_by_slug(&slug).await? else {
            return Ok(None);
        };

        let members = self.resolve_members(&team).await?;
        Ok(Some(TeamWithMembers { team, members }))
    }

    /// List teams, optionally filtered by exact display name
    pub async fn list(&self, name: Option<&str>) -> Result<Vec<TeamWithMembers>, DomainError> {
        let teams = self.teams.list(name).await?;

        let mut result = Vec::with_capacity(teams.len());
        for team in teams {
            let members = self.resolve_members(&team).await?;
            result.push(TeamWithMembers { team, members });
        }

        Ok(result)
    }

    /// A team's entries in stored order
    pub async fn entries(&self, slug: &str) -> Result<Option<Vec<Hack>>, DomainError> {
        let Ok(slug) = TeamSlug::new(slug) else {
            return Ok(None);
        };

        let Some(team) = self.teams.find_by_slug(&slug).await? else {
            return Ok(None);
        };

        let records = self.hacks.find_by_ids(team.entries()).await?;
        let ordered = team
            .entries()
            .iter()
            .filter_map(|id| records.iter().find(|h| h.id() == id))
            .cloned()
            .collect();

        Ok(Some(ordered))
    }

    /// Delete a team. Permitted only once every member has left.
    pub async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        let parsed =
            TeamSlug::new(slug).map_err(|_| DomainError::not_found("Team not found"))?;

        let team = self
            .teams
            .find_by_slug(&parsed)
            .await?
            .ok_or_else(|| DomainError::not_found("Team not found"))?;

        if !team.members().is_empty() {
            return Err(DomainError::validation(
                "Only teams with no members can be deleted",
            ));
        }

        info!(team = %slug, "Deleting team");
        self.teams.delete(team.id()).await?;
        Ok(())
    }

    async fn resolve_members(&self, team: &Team) -> Result<Vec<User>, DomainError> {
        let records = self.users.find_by_ids(team.members()).await?;

        // preserve the stored membership order
        Ok(team
            .members()
            .iter()
            .filter_map(|id| records.iter().find(|u| u.id() == id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::{AttendeeIdentity, UserIdentity};
    use crate::domain::event::mock::RecordingEmitter;
    use crate::domain::id::RecordId;
    use crate::infrastructure::storage::{
        InMemoryHackRepository, InMemoryTeamRepository, InMemoryUserRepository,
    };

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        events: Arc<RecordingEmitter>,
        service: TeamService,
    }

    fn fixture() -> Fixture {
        let teams = Arc::new(InMemoryTeamRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let hacks = Arc::new(InMemoryHackRepository::new());
        let events = Arc::new(RecordingEmitter::new());

        let service = TeamService::new(teams, users.clone(), hacks, events.clone());

        Fixture {
            users,
            events,
            service,
        }
    }

    async fn seed_user(fx: &Fixture, handle: &str, name: &str) -> User {
        fx.users
            .create(User::new(DirectoryHandle::new(handle).unwrap(), name))
            .await
            .unwrap()
    }

    fn actor_for(user: &User) -> Credentials {
        Credentials {
            attendee: AttendeeIdentity {
                id: RecordId::new(),
                registration_email: format!("{}@example.com", user.name()),
            },
            user: UserIdentity {
                id: *user.id(),
                handle: user.handle().clone(),
                name: user.name().to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_create_team_includes_the_actor() {
        let fx = fixture();
        let ada = seed_user(&fx, "UAAAA1111", "ada").await;

        let created = fx
            .service
            .create(
                CreateTeamRequest {
                    name: "Rust Crew".to_string(),
                    motto: Some("Fearless".to_string()),
                    member_handles: vec![],
                },
                &actor_for(&ada),
            )
            .await
            .unwrap();

        assert_eq!(created.team.slug().as_str(), "rust-crew");
        assert_eq!(created.team.members(), &[*ada.id()]);
        assert_eq!(created.members.len(), 1);

        let events = fx.events.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, EventName::TeamsAdd);
        assert_eq!(events[0].1["teamid"], "rust-crew");
        assert_eq!(events[0].1["members"][0]["userid"], "UAAAA1111");
    }

    #[tokio::test]
    async fn test_create_team_resolves_listed_members() {
        let fx = fixture();
        let ada = seed_user(&fx, "UAAAA1111", "ada").await;
        let bob = seed_user(&fx, "UBBBB2222", "bob").await;

        let created = fx
            .service
            .create(
                CreateTeamRequest {
                    name: "Rust Crew".to_string(),
                    motto: None,
                    member_handles: vec!["UBBBB2222".to_string(), "UMISSING1".to_string()],
                },
                &actor_for(&ada),
            )
            .await
            .unwrap();

        // bob, the actor, unknown handles dropped
        assert_eq!(created.members.len(), 2);
        assert!(created.team.has_member(bob.id()));
        assert!(created.team.has_member(ada.id()));
    }

    #[tokio::test]
    async fn test_create_duplicate_team_conflicts() {
        let fx = fixture();
        let ada = seed_user(&fx, "UAAAA1111", "ada").await;
        let actor = actor_for(&ada);

        let request = CreateTeamRequest {
            name: "Rust Crew".to_string(),
            motto: None,
            member_handles: vec![],
        };

        fx.service.create(request.clone(), &actor).await.unwrap();
        let err = fx.service.create(request, &actor).await.unwrap_err();

        assert_eq!(err.to_string(), "Conflict: Team already exists");
        // only the first creation broadcast
        assert_eq!(fx.events.events().len(), 1);
    }

    #[tokio::test]
    async fn test_get_team_resolves_members_in_order() {
        let fx = fixture();
        let ada = seed_user(&fx, "UAAAA1111", "ada").await;
        let bob = seed_user(&fx, "UBBBB2222", "bob").await;

        fx.service
            .create(
                CreateTeamRequest {
                    name: "Rust Crew".to_string(),
                    motto: None,
                    member_handles: vec!["UBBBB2222".to_string(), "UAAAA1111".to_string()],
                },
                &actor_for(&ada),
            )
            .await
            .unwrap();

        let fetched = fx.service.get("rust-crew").await.unwrap().unwrap();
        let names: Vec<_> = fetched.members.iter().map(|u| u.name()).collect();

        // stored order follows the repository's resolution of the request
        assert_eq!(fetched.members.len(), 2);
        assert!(names.contains(&"ada") && names.contains(&"bob"));
        assert!(fetched.team.has_member(bob.id()));
    }

    #[tokio::test]
    async fn test_get_unknown_team() {
        let fx = fixture();
        assert!(fx.service.get("nobody").await.unwrap().is_none());
        assert!(fx.service.get("Not A Slug").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_empty_member_list() {
        let fx = fixture();
        let ada = seed_user(&fx, "UAAAA1111", "ada").await;

        fx.service
            .create(
                CreateTeamRequest {
                    name: "Rust Crew".to_string(),
                    motto: None,
                    member_handles: vec![],
                },
                &actor_for(&ada),
            )
            .await
            .unwrap();

        let err = fx.service.delete("rust-crew").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(fx.service.get("rust-crew").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_with_name_filter() {
        let fx = fixture();
        let ada = seed_user(&fx, "UAAAA1111", "ada").await;
        let actor = actor_for(&ada);

        for name in ["Rust Crew", "Go Gophers"] {
            fx.service
                .create(
                    CreateTeamRequest {
                        name: name.to_string(),
                        motto: None,
                        member_handles: vec![],
                    },
                    &actor,
                )
                .await
                .ok();
        }

        assert_eq!(fx.service.list(None).await.unwrap().len(), 2);
        let filtered = fx.service.list(Some("Rust Crew")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].team.name(), "Rust Crew");
    }
}
