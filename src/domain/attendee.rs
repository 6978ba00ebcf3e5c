//! Attendee records
//!
//! Attendees are provisioned by an out-of-band registration import; the API
//! only ever reads them. An attendee is keyed by the email used to register
//! and may carry the directory handle that was matched to that email.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::directory::DirectoryHandle;
use crate::domain::id::RecordId;
use crate::domain::DomainError;

/// A registered event attendee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub id: RecordId,
    /// Registration email, the attendee's unique business key
    pub registration_email: String,
    /// Directory handle, unique when present
    pub directory_handle: Option<DirectoryHandle>,
}

impl Attendee {
    pub fn new(registration_email: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            registration_email: registration_email.into(),
            directory_handle: None,
        }
    }

    pub fn with_directory_handle(mut self, handle: DirectoryHandle) -> Self {
        self.directory_handle = Some(handle);
        self
    }
}

/// Repository for attendee records
#[async_trait]
pub trait AttendeeRepository: Send + Sync + std::fmt::Debug {
    /// Look up an attendee by registration email
    async fn find_by_email(&self, email: &str) -> Result<Option<Attendee>, DomainError>;

    /// Look up an attendee by directory handle
    async fn find_by_handle(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<Option<Attendee>, DomainError>;

    /// Insert an attendee record. Rejects duplicate registration emails and
    /// duplicate handles with a conflict. Used by the registration import,
    /// never by request handling.
    async fn create(&self, attendee: Attendee) -> Result<Attendee, DomainError>;
}
