//! Challenge repository trait

use async_trait::async_trait;

use super::entity::{Challenge, ChallengeSlug};
use crate::domain::id::RecordId;
use crate::domain::DomainError;

/// Repository for challenges
#[async_trait]
pub trait ChallengeRepository: Send + Sync + std::fmt::Debug {
    /// Look up a challenge by slug
    async fn find_by_slug(&self, slug: &ChallengeSlug)
        -> Result<Option<Challenge>, DomainError>;

    /// Resolve a batch of slugs, silently dropping unknown ones
    async fn find_by_slugs(
        &self,
        slugs: &[ChallengeSlug],
    ) -> Result<Vec<Challenge>, DomainError>;

    /// Resolve a batch of internal ids, silently dropping unknown ones
    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Challenge>, DomainError>;

    /// List all challenges
    async fn list(&self) -> Result<Vec<Challenge>, DomainError>;

    /// Insert a challenge. Rejects duplicate slugs and duplicate names with
    /// a conflict.
    async fn create(&self, challenge: Challenge) -> Result<Challenge, DomainError>;
}
