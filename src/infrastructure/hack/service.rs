//! Hack service

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::challenge::{Challenge, ChallengeRepository};
use crate::domain::credentials::Credentials;
use crate::domain::event::{EventEmitter, EventName};
use crate::domain::hack::{Hack, HackRepository, HackSlug};
use crate::domain::slug::slugify;
use crate::domain::team::{TeamRepository, TeamSlug};
use crate::domain::DomainError;

/// A hack together with its resolved challenge records
#[derive(Debug, Clone)]
pub struct HackWithChallenges {
    pub hack: Hack,
    pub challenges: Vec<Challenge>,
}

/// Hack service
#[derive(Debug)]
pub struct HackService {
    hacks: Arc<dyn HackRepository>,
    teams: Arc<dyn TeamRepository>,
    challenges: Arc<dyn ChallengeRepository>,
    events: Arc<dyn EventEmitter>,
}

impl HackService {
    pub fn new(
        hacks: Arc<dyn HackRepository>,
        teams: Arc<dyn TeamRepository>,
        challenges: Arc<dyn ChallengeRepository>,
        events: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            hacks,
            teams,
            challenges,
            events,
        }
    }

    /// Create a hack owned by a team the actor belongs to
    pub async fn create(
        &self,
        name: &str,
        team_slug: &str,
        actor: &Credentials,
    ) -> Result<Hack, DomainError> {
        info!(name = %name, team = %team_slug, "Creating hack");

        let team = match TeamSlug::new(team_slug) {
            Ok(slug) => self.teams.find_by_slug(&slug).await?,
            Err(_) => None,
        };
        let Some(team) = team else {
            return Err(DomainError::validation("Team does not exist"));
        };

        if !team.has_member(actor.user_id()) {
            return Err(DomainError::forbidden(
                "Only team members can create a hack",
            ));
        }

        let slug = HackSlug::new(slugify(name))
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let hack = Hack::new(slug, name, *team.id());

        let hack = match self.hacks.create(hack).await {
            Ok(hack) => hack,
            Err(err) if err.is_conflict() => {
                return Err(DomainError::conflict("Hack already exists"));
            }
            Err(err) => return Err(err),
        };

        self.events.trigger(
            EventName::HacksAdd,
            json!({
                "hackid": hack.slug().as_str(),
                "name": hack.name(),
                "team": {
                    "teamid": team.slug().as_str(),
                    "name": team.name(),
                    "motto": team.motto(),
                },
            }),
        );

        Ok(hack)
    }

    /// Get a hack by slug with its challenges resolved in stored order
    pub async fn get(&self, slug: &str) -> Result<Option<HackWithChallenges>, DomainError> {
        let Ok(slug) = HackSlug::new(slug) else {
            return Ok(None);
        };

        let Some(hack) = self.hacks.find_by_slug(&slug).await? else {
            return Ok(None);
        };

        let records = self.challenges.find_by_ids(hack.challenges()).await?;
        let challenges = hack
            .challenges()
            .iter()
            .filter_map(|id| records.iter().find(|c| &c.id == id))
            .cloned()
            .collect();

        Ok(Some(HackWithChallenges { hack, challenges }))
    }

    /// List all hacks
    pub async fn list(&self) -> Result<Vec<Hack>, DomainError> {
        self.hacks.list().await
    }

    /// Delete a hack. Only members of the owning team may do this.
    pub async fn delete(&self, slug: &str, actor: &Credentials) -> Result<(), DomainError> {
        let parsed =
            HackSlug::new(slug).map_err(|_| DomainError::not_found("Hack not found"))?;

        let hack = self
            .hacks
            .find_by_slug(&parsed)
            .await?
            .ok_or_else(|| DomainError::not_found("Hack not found"))?;

        let is_member = match self.teams.get(hack.team()).await? {
            Some(team) => team.has_member(actor.user_id()),
            None => false,
        };

        if !is_member {
            return Err(DomainError::forbidden(
                "Only team members can delete a hack",
            ));
        }

        info!(hack = %slug, "Deleting hack");
        self.hacks.delete(hack.id()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::{AttendeeIdentity, UserIdentity};
    use crate::domain::directory::DirectoryHandle;
    use crate::domain::event::mock::RecordingEmitter;
    use crate::domain::id::RecordId;
    use crate::domain::team::Team;
    use crate::infrastructure::storage::{
        InMemoryChallengeRepository, InMemoryHackRepository, InMemoryTeamRepository,
    };

    struct Fixture {
        events: Arc<RecordingEmitter>,
        service: HackService,
        actor: Credentials,
    }

    fn fixture() -> Fixture {
        let member = RecordId::new();
        let team = Team::new(TeamSlug::new("rust-crew").unwrap(), "Rust Crew")
            .with_motto("Fearless")
            .with_members(vec![member]);

        let teams = Arc::new(InMemoryTeamRepository::with_teams(vec![team]));
        let hacks = Arc::new(InMemoryHackRepository::new());
        let challenges = Arc::new(InMemoryChallengeRepository::new());
        let events = Arc::new(RecordingEmitter::new());

        let service = HackService::new(hacks, teams, challenges, events.clone());

        let actor = Credentials {
            attendee: AttendeeIdentity {
                id: RecordId::new(),
                registration_email: "ada@example.com".to_string(),
            },
            user: UserIdentity {
                id: member,
                handle: DirectoryHandle::new("UABCD1234").unwrap(),
                name: "ada".to_string(),
            },
        };

        Fixture {
            events,
            service,
            actor,
        }
    }

    fn outsider(actor: &Credentials) -> Credentials {
        Credentials {
            user: UserIdentity {
                id: RecordId::new(),
                ..actor.user.clone()
            },
            ..actor.clone()
        }
    }

    #[tokio::test]
    async fn test_create_hack_broadcasts_with_team() {
        let fx = fixture();

        let hack = fx
            .service
            .create("Jetpack 9000", "rust-crew", &fx.actor)
            .await
            .unwrap();

        assert_eq!(hack.slug().as_str(), "jetpack-9000");

        let events = fx.events.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, EventName::HacksAdd);
        assert_eq!(events[0].1["hackid"], "jetpack-9000");
        assert_eq!(events[0].1["team"]["teamid"], "rust-crew");
        assert_eq!(events[0].1["team"]["motto"], "Fearless");
    }

    #[tokio::test]
    async fn test_create_hack_unknown_team() {
        let fx = fixture();

        let err = fx
            .service
            .create("Jetpack", "no-such-team", &fx.actor)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Validation error: Team does not exist");
    }

    #[tokio::test]
    async fn test_create_hack_requires_membership() {
        let fx = fixture();

        let err = fx
            .service
            .create("Jetpack", "rust-crew", &outsider(&fx.actor))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden { .. }));
        assert!(fx.events.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_hack_conflicts() {
        let fx = fixture();

        fx.service
            .create("Jetpack", "rust-crew", &fx.actor)
            .await
            .unwrap();
        let err = fx
            .service
            .create("Jetpack", "rust-crew", &fx.actor)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Conflict: Hack already exists");
    }

    #[tokio::test]
    async fn test_delete_hack_guards_membership() {
        let fx = fixture();
        fx.service
            .create("Jetpack", "rust-crew", &fx.actor)
            .await
            .unwrap();

        let err = fx
            .service
            .delete("jetpack", &outsider(&fx.actor))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));

        fx.service.delete("jetpack", &fx.actor).await.unwrap();
        assert!(fx.service.get("jetpack").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_hack() {
        let fx = fixture();

        let err = fx.service.delete("ghost", &fx.actor).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
