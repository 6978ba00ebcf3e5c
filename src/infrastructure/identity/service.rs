//! Identity resolution
//!
//! Authenticates a basic-credential pair into an internal attendee/user
//! identity. The username is either a registration email or a directory
//! handle; the password is a single shared secret for all attendees.
//!
//! Every "not found" or "directory unusable" condition resolves to
//! `Ok(None)` (unauthenticated). Only unexpected repository failures
//! propagate as errors.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::attendee::{Attendee, AttendeeRepository};
use crate::domain::credentials::{AttendeeIdentity, Credentials, UserIdentity};
use crate::domain::directory::{DirectoryClient, DirectoryHandle, DirectoryProfile};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// Resolves basic credentials into a caller identity
#[derive(Debug)]
pub struct IdentityService {
    attendees: Arc<dyn AttendeeRepository>,
    users: Arc<dyn UserRepository>,
    directory: Arc<dyn DirectoryClient>,
    shared_password: String,
}

impl IdentityService {
    pub fn new(
        attendees: Arc<dyn AttendeeRepository>,
        users: Arc<dyn UserRepository>,
        directory: Arc<dyn DirectoryClient>,
        shared_password: impl Into<String>,
    ) -> Self {
        Self {
            attendees,
            users,
            directory,
            shared_password: shared_password.into(),
        }
    }

    /// Authenticate a basic-credential pair.
    ///
    /// Returns `Ok(None)` for anything that should map to an
    /// unauthenticated response: wrong password, malformed username,
    /// unknown attendee, or a directory that cannot resolve the handle.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Credentials>, DomainError> {
        // an unset shared secret disables authentication outright
        if self.shared_password.is_empty() || password != self.shared_password {
            return Ok(None);
        }

        if username.contains('@') {
            self.authenticate_by_email(username).await
        } else {
            self.authenticate_by_handle(username).await
        }
    }

    async fn authenticate_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, DomainError> {
        info!(email = %email, "Finding attendee by registration email");

        let Some(attendee) = self.attendees.find_by_email(email).await? else {
            return Ok(None);
        };

        let Some(handle) = attendee.directory_handle.clone() else {
            warn!(email = %email, "Attendee has no directory handle");
            return Ok(None);
        };

        let Some(user) = self.find_or_create_user(&handle, None).await? else {
            return Ok(None);
        };

        Ok(Some(build_credentials(&attendee, &user)))
    }

    async fn authenticate_by_handle(
        &self,
        username: &str,
    ) -> Result<Option<Credentials>, DomainError> {
        let Ok(handle) = DirectoryHandle::new(username) else {
            info!(username = %username, "Invalid directory handle");
            return Ok(None);
        };

        info!(handle = %handle, "Finding attendee by directory handle");

        let mut fetched_profile = None;

        let attendee = match self.attendees.find_by_handle(&handle).await? {
            Some(attendee) => attendee,
            None => {
                // The import may not have matched this handle yet; fall back
                // to the directory profile's email.
                let profile = match self.directory.lookup(&handle).await {
                    Ok(profile) => profile,
                    Err(err) => {
                        warn!(handle = %handle, error = %err, "Directory lookup failed");
                        return Ok(None);
                    }
                };

                let Some(attendee) = self.attendees.find_by_email(&profile.email).await? else {
                    warn!(
                        handle = %handle,
                        email = %profile.email,
                        "No attendee registered with the directory profile's email"
                    );
                    return Ok(None);
                };

                info!(
                    handle = %handle,
                    email = %attendee.registration_email,
                    "Matched directory handle to attendee"
                );

                fetched_profile = Some(profile);
                attendee
            }
        };

        let Some(user) = self.find_or_create_user(&handle, fetched_profile).await? else {
            return Ok(None);
        };

        Ok(Some(build_credentials(&attendee, &user)))
    }

    /// Resolve a user by handle, creating it on first authentication.
    ///
    /// A profile is only fetched from the directory when the user does not
    /// exist yet and no pre-fetched profile was supplied. A duplicate-key
    /// rejection means a concurrent resolver created the user first; the
    /// persisted row is re-fetched and used.
    async fn find_or_create_user(
        &self,
        handle: &DirectoryHandle,
        profile: Option<DirectoryProfile>,
    ) -> Result<Option<User>, DomainError> {
        if let Some(user) = self.users.find_by_handle(handle).await? {
            return Ok(Some(user));
        }

        let profile = match profile {
            Some(profile) => profile,
            None => match self.directory.lookup(handle).await {
                Ok(profile) => profile,
                Err(err) => {
                    warn!(handle = %handle, error = %err, "Directory lookup failed");
                    return Ok(None);
                }
            },
        };

        let user = User::new(handle.clone(), profile.name);

        match self.users.create(user).await {
            Ok(user) => Ok(Some(user)),
            Err(err) if err.is_conflict() => {
                info!(handle = %handle, "Lost user creation race, using existing record");
                self.users.find_by_handle(handle).await
            }
            Err(err) => Err(err),
        }
    }
}

fn build_credentials(attendee: &Attendee, user: &User) -> Credentials {
    Credentials {
        attendee: AttendeeIdentity {
            id: attendee.id,
            registration_email: attendee.registration_email.clone(),
        },
        user: UserIdentity {
            id: *user.id(),
            handle: user.handle().clone(),
            name: user.name().to_string(),
        },
    }
}
