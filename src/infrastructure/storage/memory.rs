//! In-memory repository implementations
//!
//! Thread-safe and useful for development and tests. Data is lost when the
//! process terminates. Unique business keys are enforced at insert time so
//! the backends agree on conflict semantics.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::attendee::{Attendee, AttendeeRepository};
use crate::domain::challenge::{Challenge, ChallengeRepository, ChallengeSlug};
use crate::domain::directory::DirectoryHandle;
use crate::domain::hack::{Hack, HackRepository, HackSlug};
use crate::domain::id::RecordId;
use crate::domain::team::{Team, TeamRepository, TeamSlug};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// In-memory attendee repository
#[derive(Debug, Default)]
pub struct InMemoryAttendeeRepository {
    attendees: RwLock<HashMap<RecordId, Attendee>>,
}

impl InMemoryAttendeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with attendees
    pub fn with_attendees(attendees: Vec<Attendee>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.attendees.write().unwrap();
            for attendee in attendees {
                map.insert(attendee.id, attendee);
            }
        }
        repo
    }
}

#[async_trait]
impl AttendeeRepository for InMemoryAttendeeRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Attendee>, DomainError> {
        let attendees = self
            .attendees
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(attendees
            .values()
            .find(|a| a.registration_email == email)
            .cloned())
    }

    async fn find_by_handle(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<Option<Attendee>, DomainError> {
        let attendees = self
            .attendees
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(attendees
            .values()
            .find(|a| a.directory_handle.as_ref() == Some(handle))
            .cloned())
    }

    async fn create(&self, attendee: Attendee) -> Result<Attendee, DomainError> {
        let mut attendees = self
            .attendees
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if attendees
            .values()
            .any(|a| a.registration_email == attendee.registration_email)
        {
            return Err(DomainError::conflict(format!(
                "Attendee '{}' already exists",
                attendee.registration_email
            )));
        }

        if let Some(ref handle) = attendee.directory_handle {
            if attendees
                .values()
                .any(|a| a.directory_handle.as_ref() == Some(handle))
            {
                return Err(DomainError::conflict(format!(
                    "Attendee with handle '{}' already exists",
                    handle
                )));
            }
        }

        attendees.insert(attendee.id, attendee.clone());
        Ok(attendee)
    }
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<RecordId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.users.write().unwrap();
            for user in users {
                map.insert(*user.id(), user);
            }
        }
        repo
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &RecordId) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users.get(id).cloned())
    }

    async fn find_by_handle(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users.values().find(|u| u.handle() == handle).cloned())
    }

    async fn find_by_handles(
        &self,
        handles: &[DirectoryHandle],
    ) -> Result<Vec<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users
            .values()
            .filter(|u| handles.contains(u.handle()))
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users
            .values()
            .filter(|u| ids.contains(u.id()))
            .cloned()
            .collect())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if users.values().any(|u| u.handle() == user.handle()) {
            return Err(DomainError::conflict(format!(
                "User with handle '{}' already exists",
                user.handle()
            )));
        }

        users.insert(*user.id(), user.clone());
        Ok(user)
    }
}

/// In-memory team repository
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<RecordId, Team>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teams(teams: Vec<Team>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.teams.write().unwrap();
            for team in teams {
                map.insert(*team.id(), team);
            }
        }
        repo
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &RecordId) -> Result<Option<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(teams.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &TeamSlug) -> Result<Option<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(teams.values().find(|t| t.slug() == slug).cloned())
    }

    async fn find_by_member(&self, user_id: &RecordId) -> Result<Option<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(teams.values().find(|t| t.has_member(user_id)).cloned())
    }

    async fn find_containing_entries(
        &self,
        hack_ids: &[RecordId],
    ) -> Result<Vec<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(teams
            .values()
            .filter(|t| t.entries().iter().any(|e| hack_ids.contains(e)))
            .cloned()
            .collect())
    }

    async fn list(&self, name: Option<&str>) -> Result<Vec<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result: Vec<Team> = teams
            .values()
            .filter(|t| name.is_none_or(|n| t.name() == n))
            .cloned()
            .collect();

        result.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(result)
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if teams
            .values()
            .any(|t| t.slug() == team.slug() || t.name() == team.name())
        {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.slug()
            )));
        }

        teams.insert(*team.id(), team.clone());
        Ok(team)
    }

    async fn update_entries(
        &self,
        id: &RecordId,
        entries: Vec<RecordId>,
    ) -> Result<(), DomainError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let team = teams
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", id)))?;

        team.set_entries(entries);
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, DomainError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(teams.remove(id).is_some())
    }
}

/// In-memory hack repository
#[derive(Debug, Default)]
pub struct InMemoryHackRepository {
    hacks: RwLock<HashMap<RecordId, Hack>>,
}

impl InMemoryHackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hacks(hacks: Vec<Hack>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.hacks.write().unwrap();
            for hack in hacks {
                map.insert(*hack.id(), hack);
            }
        }
        repo
    }
}

#[async_trait]
impl HackRepository for InMemoryHackRepository {
    async fn get(&self, id: &RecordId) -> Result<Option<Hack>, DomainError> {
        let hacks = self
            .hacks
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(hacks.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &HackSlug) -> Result<Option<Hack>, DomainError> {
        let hacks = self
            .hacks
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(hacks.values().find(|h| h.slug() == slug).cloned())
    }

    async fn find_by_slugs(&self, slugs: &[HackSlug]) -> Result<Vec<Hack>, DomainError> {
        let hacks = self
            .hacks
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(hacks
            .values()
            .filter(|h| slugs.contains(h.slug()))
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Hack>, DomainError> {
        let hacks = self
            .hacks
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(hacks
            .values()
            .filter(|h| ids.contains(h.id()))
            .cloned()
            .collect())
    }

    async fn find_containing_challenges(
        &self,
        challenge_ids: &[RecordId],
    ) -> Result<Vec<Hack>, DomainError> {
        let hacks = self
            .hacks
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(hacks
            .values()
            .filter(|h| h.challenges().iter().any(|c| challenge_ids.contains(c)))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Hack>, DomainError> {
        let hacks = self
            .hacks
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result: Vec<Hack> = hacks.values().cloned().collect();
        result.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(result)
    }

    async fn create(&self, hack: Hack) -> Result<Hack, DomainError> {
        let mut hacks = self
            .hacks
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if hacks
            .values()
            .any(|h| h.slug() == hack.slug() || h.name() == hack.name())
        {
            return Err(DomainError::conflict(format!(
                "Hack '{}' already exists",
                hack.slug()
            )));
        }

        hacks.insert(*hack.id(), hack.clone());
        Ok(hack)
    }

    async fn update_challenges(
        &self,
        id: &RecordId,
        challenges: Vec<RecordId>,
    ) -> Result<(), DomainError> {
        let mut hacks = self
            .hacks
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let hack = hacks
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Hack '{}' not found", id)))?;

        hack.set_challenges(challenges);
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, DomainError> {
        let mut hacks = self
            .hacks
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(hacks.remove(id).is_some())
    }
}

/// In-memory challenge repository
#[derive(Debug, Default)]
pub struct InMemoryChallengeRepository {
    challenges: RwLock<HashMap<RecordId, Challenge>>,
}

impl InMemoryChallengeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_challenges(challenges: Vec<Challenge>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.challenges.write().unwrap();
            for challenge in challenges {
                map.insert(challenge.id, challenge);
            }
        }
        repo
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryChallengeRepository {
    async fn find_by_slug(
        &self,
        slug: &ChallengeSlug,
    ) -> Result<Option<Challenge>, DomainError> {
        let challenges = self
            .challenges
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(challenges.values().find(|c| &c.slug == slug).cloned())
    }

    async fn find_by_slugs(
        &self,
        slugs: &[ChallengeSlug],
    ) -> Result<Vec<Challenge>, DomainError> {
        let challenges = self
            .challenges
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(challenges
            .values()
            .filter(|c| slugs.contains(&c.slug))
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Challenge>, DomainError> {
        let challenges = self
            .challenges
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(challenges
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Challenge>, DomainError> {
        let challenges = self
            .challenges
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result: Vec<Challenge> = challenges.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn create(&self, challenge: Challenge) -> Result<Challenge, DomainError> {
        let mut challenges = self
            .challenges
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if challenges
            .values()
            .any(|c| c.slug == challenge.slug || c.name == challenge.name)
        {
            return Err(DomainError::conflict(format!(
                "Challenge '{}' already exists",
                challenge.slug
            )));
        }

        challenges.insert(challenge.id, challenge.clone());
        Ok(challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_create_and_lookup() {
        let repo = InMemoryUserRepository::new();
        let handle = DirectoryHandle::new("UABCD1234").unwrap();
        let user = repo
            .create(User::new(handle.clone(), "Ada"))
            .await
            .unwrap();

        let by_handle = repo.find_by_handle(&handle).await.unwrap().unwrap();
        assert_eq!(by_handle.id(), user.id());

        let by_id = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(by_id.name(), "Ada");
    }

    #[tokio::test]
    async fn test_user_duplicate_handle_conflicts() {
        let repo = InMemoryUserRepository::new();
        let handle = DirectoryHandle::new("UABCD1234").unwrap();

        repo.create(User::new(handle.clone(), "Ada")).await.unwrap();
        let result = repo.create(User::new(handle, "Imposter")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_team_unique_slug_and_name() {
        let repo = InMemoryTeamRepository::new();
        repo.create(Team::new(TeamSlug::new("crew").unwrap(), "Crew"))
            .await
            .unwrap();

        let same_slug = repo
            .create(Team::new(TeamSlug::new("crew").unwrap(), "Other Name"))
            .await;
        assert!(matches!(same_slug, Err(DomainError::Conflict { .. })));

        let same_name = repo
            .create(Team::new(TeamSlug::new("other-slug").unwrap(), "Crew"))
            .await;
        assert!(matches!(same_name, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_team_find_by_member() {
        let member = RecordId::new();
        let team = Team::new(TeamSlug::new("crew").unwrap(), "Crew").with_members(vec![member]);
        let repo = InMemoryTeamRepository::with_teams(vec![team]);

        assert!(repo.find_by_member(&member).await.unwrap().is_some());
        assert!(repo.find_by_member(&RecordId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hack_exclusivity_scan() {
        let challenge_id = RecordId::new();
        let mut hack = Hack::new(
            HackSlug::new("jetpack").unwrap(),
            "Jetpack",
            RecordId::new(),
        );
        hack.set_challenges(vec![challenge_id]);
        let repo = InMemoryHackRepository::with_hacks(vec![hack]);

        let hits = repo
            .find_containing_challenges(&[challenge_id])
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let misses = repo
            .find_containing_challenges(&[RecordId::new()])
            .await
            .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_team_update_entries() {
        let team = Team::new(TeamSlug::new("crew").unwrap(), "Crew");
        let id = *team.id();
        let repo = InMemoryTeamRepository::with_teams(vec![team]);

        let entry = RecordId::new();
        repo.update_entries(&id, vec![entry]).await.unwrap();

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.entries(), &[entry]);
    }

    #[tokio::test]
    async fn test_attendee_lookup_paths() {
        let handle = DirectoryHandle::new("UABCD1234").unwrap();
        let attendee =
            Attendee::new("ada@example.com").with_directory_handle(handle.clone());
        let repo = InMemoryAttendeeRepository::with_attendees(vec![attendee]);

        assert!(repo
            .find_by_email("ada@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(repo.find_by_email("nope@example.com").await.unwrap().is_none());
        assert!(repo.find_by_handle(&handle).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_challenge_batch_resolution() {
        let a = Challenge::new(ChallengeSlug::new("best-iot").unwrap(), "Best IoT");
        let b = Challenge::new(ChallengeSlug::new("best-ai").unwrap(), "Best AI");
        let repo = InMemoryChallengeRepository::with_challenges(vec![a, b]);

        let found = repo
            .find_by_slugs(&[
                ChallengeSlug::new("best-iot").unwrap(),
                ChallengeSlug::new("missing").unwrap(),
            ])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
