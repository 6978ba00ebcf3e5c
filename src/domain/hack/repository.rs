//! Hack repository trait

use async_trait::async_trait;

use super::entity::{Hack, HackSlug};
use crate::domain::id::RecordId;
use crate::domain::DomainError;

/// Repository for hacks
#[async_trait]
pub trait HackRepository: Send + Sync + std::fmt::Debug {
    /// Get a hack by internal id
    async fn get(&self, id: &RecordId) -> Result<Option<Hack>, DomainError>;

    /// Look up a hack by slug
    async fn find_by_slug(&self, slug: &HackSlug) -> Result<Option<Hack>, DomainError>;

    /// Resolve a batch of slugs. Unknown slugs are silently absent from the
    /// result; callers compare counts to detect them.
    async fn find_by_slugs(&self, slugs: &[HackSlug]) -> Result<Vec<Hack>, DomainError>;

    /// Resolve a batch of internal ids, silently dropping unknown ones
    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Hack>, DomainError>;

    /// Find every hack whose challenge list references any of the given
    /// challenges. This is the exclusivity scan for the hack-challenges
    /// relationship.
    async fn find_containing_challenges(
        &self,
        challenge_ids: &[RecordId],
    ) -> Result<Vec<Hack>, DomainError>;

    /// List all hacks
    async fn list(&self) -> Result<Vec<Hack>, DomainError>;

    /// Insert a hack. Rejects duplicate slugs and duplicate names with a
    /// conflict.
    async fn create(&self, hack: Hack) -> Result<Hack, DomainError>;

    /// Replace a hack's challenge list in a single-document update
    async fn update_challenges(
        &self,
        id: &RecordId,
        challenges: Vec<RecordId>,
    ) -> Result<(), DomainError>;

    /// Delete a hack by internal id
    async fn delete(&self, id: &RecordId) -> Result<bool, DomainError>;
}
