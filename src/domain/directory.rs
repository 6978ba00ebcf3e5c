//! External directory boundary
//!
//! Attendees and users are keyed by a handle issued by an external user
//! directory. The directory is reached through [`DirectoryClient`]; lookup
//! failures carry their own error type so callers can treat them as soft
//! authentication failures without swallowing storage errors.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static HANDLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^U[A-Z0-9]{8}$").expect("handle pattern is a valid regex")
});

/// Validation error for directory handles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a valid directory handle")]
pub struct InvalidHandle(pub String);

/// Directory-issued user handle: `U` followed by 8 uppercase alphanumerics
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DirectoryHandle(String);

impl DirectoryHandle {
    /// Create a new handle after validation
    pub fn new(handle: impl Into<String>) -> Result<Self, InvalidHandle> {
        let handle = handle.into();
        if !HANDLE_PATTERN.is_match(&handle) {
            return Err(InvalidHandle(handle));
        }
        Ok(Self(handle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DirectoryHandle {
    type Error = InvalidHandle;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DirectoryHandle> for String {
    fn from(handle: DirectoryHandle) -> Self {
        handle.0
    }
}

impl std::fmt::Display for DirectoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Profile returned by a successful directory lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryProfile {
    /// Directory-side identifier, equal to the handle that was looked up
    pub id: String,
    /// Display name
    pub name: String,
    /// Email the directory account was registered with
    pub email: String,
}

/// Errors raised by the directory boundary.
///
/// These never propagate out of authentication: every variant is a soft
/// failure that maps to an unauthenticated result.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("could not look up \"{handle}\" in the directory: {message}")]
    Request { handle: String, message: String },

    #[error("directory has no user \"{handle}\"")]
    UnknownHandle { handle: String },

    #[error("directory returned an unusable profile for \"{handle}\": {message}")]
    UnusableProfile { handle: String, message: String },
}

/// Client for the external user directory
#[async_trait]
pub trait DirectoryClient: Send + Sync + std::fmt::Debug {
    /// Resolve a handle to a profile
    async fn lookup(&self, handle: &DirectoryHandle) -> Result<DirectoryProfile, DirectoryError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_handles() {
        assert!(DirectoryHandle::new("UABCD1234").is_ok());
        assert!(DirectoryHandle::new("U00000000").is_ok());
    }

    #[test]
    fn test_invalid_handles() {
        assert!(DirectoryHandle::new("").is_err());
        assert!(DirectoryHandle::new("uabcd1234").is_err());
        assert!(DirectoryHandle::new("UABCD123").is_err());
        assert!(DirectoryHandle::new("UABCD12345").is_err());
        assert!(DirectoryHandle::new("XABCD1234").is_err());
        // the pattern is anchored, a handle embedded in a longer string is not a handle
        assert!(DirectoryHandle::new("xxUABCD1234").is_err());
    }

    #[test]
    fn test_handle_round_trips_through_serde() {
        let handle = DirectoryHandle::new("UABCD1234").unwrap();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, "\"UABCD1234\"");
        let back: DirectoryHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(handle, back);
    }
}
