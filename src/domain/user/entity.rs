//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::directory::DirectoryHandle;
use crate::domain::id::RecordId;

/// A platform user.
///
/// Users are materialized lazily the first time an attendee authenticates;
/// the directory handle is the unique business key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: RecordId,
    /// Directory handle, unique
    handle: DirectoryHandle,
    /// Display name, taken from the directory profile at creation
    name: String,
    /// Last modification timestamp
    modified: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(handle: DirectoryHandle, name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            handle,
            name: name.into(),
            modified: Utc::now(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn handle(&self) -> &DirectoryHandle {
        &self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let handle = DirectoryHandle::new("UABCD1234").unwrap();
        let user = User::new(handle.clone(), "Ada Lovelace");

        assert_eq!(user.handle(), &handle);
        assert_eq!(user.name(), "Ada Lovelace");
    }

    #[test]
    fn test_users_get_distinct_ids() {
        let a = User::new(DirectoryHandle::new("UAAAA1111").unwrap(), "A");
        let b = User::new(DirectoryHandle::new("UBBBB2222").unwrap(), "B");
        assert_ne!(a.id(), b.id());
    }
}
