//! HTTP API layer

pub mod challenges;
pub mod hack_challenges;
pub mod hacks;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod team_entries;
pub mod teams;
pub mod types;
pub mod users;

pub use router::create_router;
pub use state::AppState;
