//! Hack entity and repository

mod entity;
mod repository;

pub use entity::{Hack, HackSlug};
pub use repository::HackRepository;
