//! User service

use std::sync::Arc;

use crate::domain::directory::DirectoryHandle;
use crate::domain::team::TeamRepository;
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::team::TeamWithMembers;

/// A user together with the team they belong to, if any
#[derive(Debug, Clone)]
pub struct UserWithTeam {
    pub user: User,
    pub team: Option<TeamWithMembers>,
}

/// User service
#[derive(Debug)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self { users, teams }
    }

    /// Get a user by directory handle, with the team relationship resolved
    /// through a reverse member lookup
    pub async fn get(&self, handle: &str) -> Result<Option<UserWithTeam>, DomainError> {
        let Ok(handle) = DirectoryHandle::new(handle) else {
            return Ok(None);
        };

        let Some(user) = self.users.find_by_handle(&handle).await? else {
            return Ok(None);
        };

        let team = match self.teams.find_by_member(user.id()).await? {
            Some(team) => {
                let records = self.users.find_by_ids(team.members()).await?;
                let members = team
                    .members()
                    .iter()
                    .filter_map(|id| records.iter().find(|u| u.id() == id))
                    .cloned()
                    .collect();
                Some(TeamWithMembers { team, members })
            }
            None => None,
        };

        Ok(Some(UserWithTeam { user, team }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::{Team, TeamSlug};
    use crate::infrastructure::storage::{InMemoryTeamRepository, InMemoryUserRepository};

    #[tokio::test]
    async fn test_get_user_with_team() {
        let users = Arc::new(InMemoryUserRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new());

        let ada = users
            .create(User::new(
                DirectoryHandle::new("UAAAA1111").unwrap(),
                "ada",
            ))
            .await
            .unwrap();

        teams
            .create(
                Team::new(TeamSlug::new("rust-crew").unwrap(), "Rust Crew")
                    .with_members(vec![*ada.id()]),
            )
            .await
            .unwrap();

        let service = UserService::new(users, teams);
        let found = service.get("UAAAA1111").await.unwrap().unwrap();

        assert_eq!(found.user.name(), "ada");
        let team = found.team.expect("user has a team");
        assert_eq!(team.team.slug().as_str(), "rust-crew");
        assert_eq!(team.members.len(), 1);
    }

    #[tokio::test]
    async fn test_get_user_without_team() {
        let users = Arc::new(InMemoryUserRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new());

        users
            .create(User::new(
                DirectoryHandle::new("UAAAA1111").unwrap(),
                "ada",
            ))
            .await
            .unwrap();

        let service = UserService::new(users, teams);
        let found = service.get("UAAAA1111").await.unwrap().unwrap();

        assert!(found.team.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_or_malformed_handle() {
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTeamRepository::new()),
        );

        assert!(service.get("UZZZZ9999").await.unwrap().is_none());
        assert!(service.get("not-a-handle").await.unwrap().is_none());
    }
}
