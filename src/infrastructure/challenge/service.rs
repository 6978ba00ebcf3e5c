//! Challenge service

use std::sync::Arc;

use tracing::info;

use crate::domain::challenge::{Challenge, ChallengeRepository, ChallengeSlug};
use crate::domain::slug::slugify;
use crate::domain::DomainError;

/// Challenge service
#[derive(Debug)]
pub struct ChallengeService {
    challenges: Arc<dyn ChallengeRepository>,
}

impl ChallengeService {
    pub fn new(challenges: Arc<dyn ChallengeRepository>) -> Self {
        Self { challenges }
    }

    /// Create a challenge
    pub async fn create(&self, name: &str) -> Result<Challenge, DomainError> {
        info!(name = %name, "Creating challenge");

        let slug = ChallengeSlug::new(slugify(name))
            .map_err(|e| DomainError::validation(e.to_string()))?;

        match self.challenges.create(Challenge::new(slug, name)).await {
            Ok(challenge) => Ok(challenge),
            Err(err) if err.is_conflict() => {
                Err(DomainError::conflict("Challenge already exists"))
            }
            Err(err) => Err(err),
        }
    }

    /// Get a challenge by slug
    pub async fn get(&self, slug: &str) -> Result<Option<Challenge>, DomainError> {
        let Ok(slug) = ChallengeSlug::new(slug) else {
            return Ok(None);
        };

        self.challenges.find_by_slug(&slug).await
    }

    /// List all challenges
    pub async fn list(&self) -> Result<Vec<Challenge>, DomainError> {
        self.challenges.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryChallengeRepository;

    fn service() -> ChallengeService {
        ChallengeService::new(Arc::new(InMemoryChallengeRepository::new()))
    }

    #[tokio::test]
    async fn test_create_and_get_challenge() {
        let service = service();

        let created = service.create("Best IoT Hack").await.unwrap();
        assert_eq!(created.slug.as_str(), "best-iot-hack");

        let fetched = service.get("best-iot-hack").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Best IoT Hack");
    }

    #[tokio::test]
    async fn test_create_duplicate_challenge() {
        let service = service();

        service.create("Best IoT Hack").await.unwrap();
        let err = service.create("Best IoT Hack").await.unwrap_err();

        assert_eq!(err.to_string(), "Conflict: Challenge already exists");
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let service = service();

        let err = service.create("  !! ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
