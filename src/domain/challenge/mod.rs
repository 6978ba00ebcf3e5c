//! Challenge entity and repository

mod entity;
mod repository;

pub use entity::{Challenge, ChallengeSlug};
pub use repository::ChallengeRepository;
