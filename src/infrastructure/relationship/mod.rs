//! Guarded mutation of parent/child links
//!
//! One engine implements the add/remove protocol shared by the two
//! relationship endpoints; a [`RelationshipSource`] adapts it to a concrete
//! parent/child pair and its exclusivity scope.

mod engine;
mod hack_challenges;
mod team_entries;

pub use engine::{
    ChildRecord, ParentRecord, RelationshipEngine, RelationshipMessages, RelationshipSource,
};
pub use hack_challenges::HackChallengesSource;
pub use team_entries::TeamEntriesSource;
