//! User entity and repository

mod entity;
mod repository;

pub use entity::User;
pub use repository::UserRepository;
