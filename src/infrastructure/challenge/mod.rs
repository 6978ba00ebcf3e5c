//! Challenge resource service

mod service;

pub use service::ChallengeService;
