//! Challenge entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::RecordId;
use crate::domain::slug::{validate_slug, SlugError};

/// Challenge slug - unique, URL-safe business key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChallengeSlug(String);

impl ChallengeSlug {
    pub fn new(slug: impl Into<String>) -> Result<Self, SlugError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChallengeSlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChallengeSlug> for String {
    fn from(slug: ChallengeSlug) -> Self {
        slug.0
    }
}

impl std::fmt::Display for ChallengeSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sponsor challenge hacks can enter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: RecordId,
    pub slug: ChallengeSlug,
    /// Display name, unique
    pub name: String,
    pub modified: DateTime<Utc>,
}

impl Challenge {
    pub fn new(slug: ChallengeSlug, name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            slug,
            name: name.into(),
            modified: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_creation() {
        let challenge = Challenge::new(
            ChallengeSlug::new("best-iot-hack").unwrap(),
            "Best IoT Hack",
        );
        assert_eq!(challenge.slug.as_str(), "best-iot-hack");
        assert_eq!(challenge.name, "Best IoT Hack");
    }
}
