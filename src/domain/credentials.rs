//! Authenticated caller identity

use serde::{Deserialize, Serialize};

use crate::domain::directory::DirectoryHandle;
use crate::domain::id::RecordId;

/// Minimal attendee identity carried by [`Credentials`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeIdentity {
    pub id: RecordId,
    pub registration_email: String,
}

/// Minimal user identity carried by [`Credentials`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: RecordId,
    pub handle: DirectoryHandle,
    pub name: String,
}

/// Resolved caller identity, produced by authentication and consumed as the
/// actor of every guarded mutation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub attendee: AttendeeIdentity,
    pub user: UserIdentity,
}

impl Credentials {
    pub fn user_id(&self) -> &RecordId {
        &self.user.id
    }
}
