//! Hack resource service

mod service;

pub use service::{HackService, HackWithChallenges};
