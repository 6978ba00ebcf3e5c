//! Team resource service

mod service;

pub use service::{CreateTeamRequest, TeamService, TeamWithMembers};
