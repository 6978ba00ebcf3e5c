//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamSlug};
use crate::domain::id::RecordId;
use crate::domain::DomainError;

/// Repository for teams
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by internal id
    async fn get(&self, id: &RecordId) -> Result<Option<Team>, DomainError>;

    /// Look up a team by slug
    async fn find_by_slug(&self, slug: &TeamSlug) -> Result<Option<Team>, DomainError>;

    /// Find the team a user belongs to, if any
    async fn find_by_member(&self, user_id: &RecordId) -> Result<Option<Team>, DomainError>;

    /// Find every team whose entry list references any of the given hacks.
    /// This is the exclusivity scan for the team-entries relationship.
    async fn find_containing_entries(
        &self,
        hack_ids: &[RecordId],
    ) -> Result<Vec<Team>, DomainError>;

    /// List teams, optionally filtered by exact display name
    async fn list(&self, name: Option<&str>) -> Result<Vec<Team>, DomainError>;

    /// Insert a team. Rejects duplicate slugs and duplicate names with a
    /// conflict.
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Replace a team's entry list in a single-document update
    async fn update_entries(
        &self,
        id: &RecordId,
        entries: Vec<RecordId>,
    ) -> Result<(), DomainError>;

    /// Delete a team by internal id
    async fn delete(&self, id: &RecordId) -> Result<bool, DomainError>;
}
