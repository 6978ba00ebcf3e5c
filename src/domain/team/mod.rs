//! Team entity and repository

mod entity;
mod repository;

pub use entity::{Team, TeamSlug};
pub use repository::TeamRepository;
