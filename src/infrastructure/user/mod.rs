//! User resource service

mod service;

pub use service::{UserService, UserWithTeam};
