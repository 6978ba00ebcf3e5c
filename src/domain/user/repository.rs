//! User repository trait

use async_trait::async_trait;

use super::entity::User;
use crate::domain::directory::DirectoryHandle;
use crate::domain::id::RecordId;
use crate::domain::DomainError;

/// Repository for user records
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Get a user by internal id
    async fn get(&self, id: &RecordId) -> Result<Option<User>, DomainError>;

    /// Look up a user by directory handle
    async fn find_by_handle(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<Option<User>, DomainError>;

    /// Resolve a batch of handles. Unknown handles are silently absent from
    /// the result; order follows the stored records, not the request.
    async fn find_by_handles(
        &self,
        handles: &[DirectoryHandle],
    ) -> Result<Vec<User>, DomainError>;

    /// Resolve a batch of internal ids, silently dropping unknown ones
    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<User>, DomainError>;

    /// Insert a user record.
    ///
    /// Fails with a conflict when the handle is already taken. This is the
    /// one hard uniqueness guarantee authentication relies on: two
    /// concurrent first-time logins race to insert, the loser re-fetches.
    async fn create(&self, user: User) -> Result<User, DomainError>;
}
