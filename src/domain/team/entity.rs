//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::RecordId;
use crate::domain::slug::{validate_slug, SlugError};

/// Team slug - unique, URL-safe business key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamSlug(String);

impl TeamSlug {
    /// Create a new TeamSlug after validation
    pub fn new(slug: impl Into<String>) -> Result<Self, SlugError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamSlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamSlug> for String {
    fn from(slug: TeamSlug) -> Self {
        slug.0
    }
}

impl std::fmt::Display for TeamSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Internal identifier
    id: RecordId,
    /// Unique slug
    slug: TeamSlug,
    /// Display name, unique
    name: String,
    /// Optional motto
    #[serde(skip_serializing_if = "Option::is_none")]
    motto: Option<String>,
    /// Member user references, insertion order preserved
    members: Vec<RecordId>,
    /// Entry hack references, insertion order preserved
    entries: Vec<RecordId>,
    /// Last modification timestamp
    modified: DateTime<Utc>,
}

impl Team {
    /// Create a new team with no members or entries
    pub fn new(slug: TeamSlug, name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            slug,
            name: name.into(),
            motto: None,
            members: Vec::new(),
            entries: Vec::new(),
            modified: Utc::now(),
        }
    }

    /// Set the motto (builder pattern)
    pub fn with_motto(mut self, motto: impl Into<String>) -> Self {
        self.motto = Some(motto.into());
        self
    }

    /// Set the initial member list (builder pattern)
    pub fn with_members(mut self, members: Vec<RecordId>) -> Self {
        self.members = members;
        self
    }

    // Getters

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn slug(&self) -> &TeamSlug {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn motto(&self) -> Option<&str> {
        self.motto.as_deref()
    }

    pub fn members(&self) -> &[RecordId] {
        &self.members
    }

    pub fn entries(&self) -> &[RecordId] {
        &self.entries
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Check whether a user is a member of this team
    pub fn has_member(&self, user_id: &RecordId) -> bool {
        self.members.contains(user_id)
    }

    /// Replace the entry list
    pub fn set_entries(&mut self, entries: Vec<RecordId>) {
        self.entries = entries;
        self.modified = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_slug_valid() {
        let slug = TeamSlug::new("rust-crew").unwrap();
        assert_eq!(slug.as_str(), "rust-crew");
    }

    #[test]
    fn test_team_slug_invalid() {
        assert!(TeamSlug::new("").is_err());
        assert!(TeamSlug::new("Rust Crew").is_err());
        assert!(TeamSlug::new("-crew").is_err());
    }

    #[test]
    fn test_team_creation() {
        let team = Team::new(TeamSlug::new("rust-crew").unwrap(), "Rust Crew")
            .with_motto("Fearless concurrency");

        assert_eq!(team.name(), "Rust Crew");
        assert_eq!(team.motto(), Some("Fearless concurrency"));
        assert!(team.members().is_empty());
        assert!(team.entries().is_empty());
    }

    #[test]
    fn test_team_membership() {
        let member = RecordId::new();
        let team = Team::new(TeamSlug::new("rust-crew").unwrap(), "Rust Crew")
            .with_members(vec![member]);

        assert!(team.has_member(&member));
        assert!(!team.has_member(&RecordId::new()));
    }
}
