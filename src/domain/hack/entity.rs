//! Hack entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::RecordId;
use crate::domain::slug::{validate_slug, SlugError};

/// Hack slug - unique, URL-safe business key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HackSlug(String);

impl HackSlug {
    /// Create a new HackSlug after validation
    pub fn new(slug: impl Into<String>) -> Result<Self, SlugError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HackSlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HackSlug> for String {
    fn from(slug: HackSlug) -> Self {
        slug.0
    }
}

impl std::fmt::Display for HackSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hack entity.
///
/// A hack belongs to exactly one team, fixed at creation. Its challenge
/// list is mutated only through the relationship engine, which enforces
/// that a challenge is referenced by at most one hack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hack {
    id: RecordId,
    slug: HackSlug,
    /// Display name, unique
    name: String,
    /// Owning team
    team: RecordId,
    /// Challenge references, insertion order preserved
    challenges: Vec<RecordId>,
    modified: DateTime<Utc>,
}

impl Hack {
    /// Create a new hack for a team, with no challenges
    pub fn new(slug: HackSlug, name: impl Into<String>, team: RecordId) -> Self {
        Self {
            id: RecordId::new(),
            slug,
            name: name.into(),
            team,
            challenges: Vec::new(),
            modified: Utc::now(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn slug(&self) -> &HackSlug {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> &RecordId {
        &self.team
    }

    pub fn challenges(&self) -> &[RecordId] {
        &self.challenges
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Replace the challenge list
    pub fn set_challenges(&mut self, challenges: Vec<RecordId>) {
        self.challenges = challenges;
        self.modified = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hack_slug_validation() {
        assert!(HackSlug::new("jetpack-9000").is_ok());
        assert!(HackSlug::new("Jetpack 9000").is_err());
    }

    #[test]
    fn test_hack_creation() {
        let team = RecordId::new();
        let hack = Hack::new(HackSlug::new("jetpack-9000").unwrap(), "Jetpack 9000", team);

        assert_eq!(hack.name(), "Jetpack 9000");
        assert_eq!(hack.team(), &team);
        assert!(hack.challenges().is_empty());
    }
}
